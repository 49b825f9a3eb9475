use std::sync::Arc;

use fieldmart::api::web::dto::BookingCreateReqDto;
use fieldmart::model::DAILY_SLOT_LABELS;
use fieldmart::repository::{app_repo_booking, app_repo_field};
use fieldmart::usecase::{
    BookingSlotsUcOutput, CreateBookingUcOutput, CreateBookingUseCase, ListSlotsUseCase,
};
use fieldmart::{AppAuthRole, AppDataStoreContext};

use super::super::{ut_authed_claim, ut_logctx, ut_setup_datastore};
use super::ut_seed_subfield;

async fn ut_booking_uc(ds: Arc<AppDataStoreContext>, owner: u32) -> CreateBookingUseCase {
    CreateBookingUseCase {
        repo_booking: app_repo_booking(ds.clone()).await.unwrap(),
        repo_field: app_repo_field(ds).await.unwrap(),
        auth_claim: ut_authed_claim(owner, AppAuthRole::Customer),
        logctx: ut_logctx(),
    }
}

fn ut_req(day: &str, duration: &str) -> BookingCreateReqDto {
    BookingCreateReqDto {
        day: day.to_string(),
        duration: duration.to_string(),
        total_price: 250_000,
    }
}

#[tokio::test]
async fn create_ok() {
    let ds = ut_setup_datastore(64);
    ut_seed_subfield(ds.clone(), 55, 810).await;
    let uc = ut_booking_uc(ds, 124).await;
    let output = uc
        .execute(810, ut_req("2025-10-10", "5:00 - 6:30"))
        .await
        .unwrap();
    let dto = match output {
        CreateBookingUcOutput::Success(d) => d,
        _others => panic!("expect success"),
    };
    assert_eq!(dto.sub_field_id, 810);
    assert_eq!(dto.status.as_str(), "pending");
    assert_eq!(dto.day.as_str(), "2025-10-10");
}

#[tokio::test]
async fn second_identical_slot_conflicts() {
    let ds = ut_setup_datastore(64);
    ut_seed_subfield(ds.clone(), 55, 810).await;
    let uc = ut_booking_uc(ds.clone(), 124).await;
    let output = uc
        .execute(810, ut_req("2025-10-10", "5:00 - 6:30"))
        .await
        .unwrap();
    assert!(matches!(output, CreateBookingUcOutput::Success(_)));
    // another buyer, same (sub-field, day, duration) triple
    let uc = ut_booking_uc(ds, 125).await;
    let output = uc
        .execute(810, ut_req("2025-10-10", "5:00 - 6:30"))
        .await
        .unwrap();
    assert!(matches!(output, CreateBookingUcOutput::SlotTaken));
}

#[tokio::test]
async fn unknown_subfield() {
    let ds = ut_setup_datastore(64);
    let uc = ut_booking_uc(ds, 124).await;
    let output = uc
        .execute(999, ut_req("2025-10-10", "5:00 - 6:30"))
        .await
        .unwrap();
    assert!(matches!(output, CreateBookingUcOutput::SubFieldNotFound));
}

#[tokio::test]
async fn malformed_day_rejected() {
    let ds = ut_setup_datastore(64);
    ut_seed_subfield(ds.clone(), 55, 810).await;
    let uc = ut_booking_uc(ds, 124).await;
    let output = uc
        .execute(810, ut_req("10/10/2025", "5:00 - 6:30"))
        .await
        .unwrap();
    assert!(matches!(output, CreateBookingUcOutput::InvalidInput(_)));
}

#[tokio::test]
async fn slot_listing_tags_taken_ones() {
    let ds = ut_setup_datastore(64);
    ut_seed_subfield(ds.clone(), 55, 810).await;
    let uc = ut_booking_uc(ds.clone(), 124).await;
    let _output = uc
        .execute(810, ut_req("2025-10-10", DAILY_SLOT_LABELS[1]))
        .await
        .unwrap();
    let uc = ListSlotsUseCase {
        repo_booking: app_repo_booking(ds.clone()).await.unwrap(),
        repo_field: app_repo_field(ds.clone()).await.unwrap(),
    };
    let output = uc.execute(810, "2025-10-10".to_string()).await.unwrap();
    let slots = match output {
        BookingSlotsUcOutput::Success(s) => s,
        _others => panic!("expect slots"),
    };
    assert_eq!(slots.len(), DAILY_SLOT_LABELS.len());
    assert!(!slots[0].is_booked);
    assert!(slots[1].is_booked);
    assert!(!slots[2].is_booked);
    assert!(!slots[3].is_booked);

    // another day stays free
    let uc = ListSlotsUseCase {
        repo_booking: app_repo_booking(ds.clone()).await.unwrap(),
        repo_field: app_repo_field(ds).await.unwrap(),
    };
    let output = uc.execute(810, "2025-10-11".to_string()).await.unwrap();
    let slots = match output {
        BookingSlotsUcOutput::Success(s) => s,
        _others => panic!("expect slots"),
    };
    assert!(slots.iter().all(|s| !s.is_booked));
}
