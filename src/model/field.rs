use std::str::FromStr;

use crate::error::{AppError, AppErrorCode};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldModel {
    pub id_: u64,
    pub name: String,
    pub location: String,
    pub is_deleted: bool,
    pub is_create: bool,
}

// descriptive label only, booking state is owned by the booking collection
// and never written back here
#[derive(Debug, Eq, Clone, PartialEq)]
pub enum SubFieldStatus {
    Available,
    Maintenance,
    Booked,
}

impl SubFieldStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Maintenance => "maintenance",
            Self::Booked => "booked",
        }
    }
}
impl FromStr for SubFieldStatus {
    type Err = AppError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "maintenance" => Ok(Self::Maintenance),
            "booked" => Ok(Self::Booked),
            _others => Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("subfield-status, actual:{}", s)),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubFieldModel {
    pub id_: u64,
    pub field_id: u64,
    pub name: String,
    // price charged per booked slot
    pub slot_price: u32,
    pub status: SubFieldStatus,
}
