use std::result::Result as DefaultResult;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::error::{AppError, AppErrorCode};
use crate::generate_custom_uid;

// the venue runs fixed 90-minute slots each day, slot labels double as the
// `duration` column of saved bookings
pub const DAILY_SLOT_LABELS: [&str; 4] = [
    "5:00 - 6:30",
    "6:30 - 8:00",
    "8:00 - 9:30",
    "9:30 - 11:00",
];

#[derive(Debug, Eq, Clone, PartialEq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}
impl FromStr for BookingStatus {
    type Err = AppError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _others => Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("booking-status, actual:{}", s)),
            }),
        }
    }
}

#[derive(Debug)]
pub struct BookingModel {
    pub id_: String,
    pub sub_field_id: u64,
    pub owner_id: u32,
    // calendar date the slot belongs to, `YYYY-MM-DD`
    pub day: String,
    // time-range label, e.g. `5:00 - 6:30`
    pub duration: String,
    pub total_price: u32,
    pub status: BookingStatus,
    pub create_time: DateTime<FixedOffset>,
}

impl Clone for BookingModel {
    fn clone(&self) -> Self {
        Self {
            id_: self.id_.clone(),
            sub_field_id: self.sub_field_id,
            owner_id: self.owner_id,
            day: self.day.clone(),
            duration: self.duration.clone(),
            total_price: self.total_price,
            status: self.status.clone(),
            create_time: self.create_time,
        }
    }
}

/// one entry per daily slot label, tagged whether a persisted booking
/// already occupies it
pub struct SlotOccupancyModel {
    pub duration: String,
    pub is_booked: bool,
}

impl BookingModel {
    pub fn generate_id(machine_code: u8) -> String {
        let uid = generate_custom_uid(machine_code);
        let bs = uid.into_bytes();
        bs.iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<String>>()
            .join("")
    }

    /// the (sub-field, day, duration) triple, the storage layer keeps it
    /// unique so two buyers can never hold the same slot
    pub fn conflict_key(sub_field_id: u64, day: &str, duration: &str) -> String {
        format!("{}/{}/{}", sub_field_id, day, duration)
    }

    pub fn validate_day(day: &str) -> DefaultResult<(), AppError> {
        NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map(|_d| ())
            .map_err(|e| AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("booking-day:{}, error:{}", day, e)),
            })
    }

    pub fn validate_duration(duration: &str) -> DefaultResult<(), AppError> {
        if duration.trim().is_empty() {
            Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some("booking-duration-empty".to_string()),
            })
        } else {
            Ok(())
        }
    }

    /// cross-reference saved bookings of one sub-field / day against the
    /// fixed slot table
    pub fn tag_slots(existing: &[BookingModel]) -> Vec<SlotOccupancyModel> {
        DAILY_SLOT_LABELS
            .iter()
            .map(|label| {
                let is_booked = existing.iter().any(|b| b.duration.as_str() == *label);
                SlotOccupancyModel {
                    duration: label.to_string(),
                    is_booked,
                }
            })
            .collect()
    }
} // end of impl BookingModel
