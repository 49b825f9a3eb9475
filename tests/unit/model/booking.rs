use chrono::Local as LocalTime;

use fieldmart::model::{BookingModel, BookingStatus, DAILY_SLOT_LABELS};

pub(crate) fn ut_booking(sub_field_id: u64, day: &str, duration: &str) -> BookingModel {
    BookingModel {
        id_: BookingModel::generate_id(1),
        sub_field_id,
        owner_id: 124,
        day: day.to_string(),
        duration: duration.to_string(),
        total_price: 250_000,
        status: BookingStatus::Pending,
        create_time: LocalTime::now().fixed_offset(),
    }
}

#[test]
fn day_format_check() {
    assert!(BookingModel::validate_day("2025-10-10").is_ok());
    assert!(BookingModel::validate_day("2025-13-40").is_err());
    assert!(BookingModel::validate_day("10/10/2025").is_err());
    assert!(BookingModel::validate_day("").is_err());
}

#[test]
fn duration_nonempty() {
    assert!(BookingModel::validate_duration("5:00 - 6:30").is_ok());
    assert!(BookingModel::validate_duration("  ").is_err());
}

#[test]
fn conflict_key_layout() {
    let k = BookingModel::conflict_key(810, "2025-10-10", "5:00 - 6:30");
    assert_eq!(k.as_str(), "810/2025-10-10/5:00 - 6:30");
}

#[test]
fn tag_slots_marks_taken_labels() {
    let existing = vec![
        ut_booking(810, "2025-10-10", DAILY_SLOT_LABELS[0]),
        ut_booking(810, "2025-10-10", DAILY_SLOT_LABELS[2]),
    ];
    let tagged = BookingModel::tag_slots(&existing);
    assert_eq!(tagged.len(), DAILY_SLOT_LABELS.len());
    assert!(tagged[0].is_booked);
    assert!(!tagged[1].is_booked);
    assert!(tagged[2].is_booked);
    assert!(!tagged[3].is_booked);
}

#[test]
fn tag_slots_all_free() {
    let tagged = BookingModel::tag_slots(&[]);
    assert!(tagged.iter().all(|s| !s.is_booked));
}
