use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use chrono::Local as LocalTime;

use crate::api::web::dto::{BookingCreateReqDto, BookingPresentDto, SlotPresentDto};
use crate::constant::app_meta;
use crate::error::{AppError, AppErrorCode};
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::{BookingModel, BookingStatus};
use crate::repository::{AbsBookingRepo, AbsFieldRepo};
use crate::AppAuthedClaim;

fn booking_present_dto(m: BookingModel) -> BookingPresentDto {
    BookingPresentDto {
        booking_id: m.id_,
        sub_field_id: m.sub_field_id,
        owner_id: m.owner_id,
        day: m.day,
        duration: m.duration,
        total_price: m.total_price,
        status: m.status.as_str().to_string(),
    }
}

pub enum CreateBookingUcOutput {
    Success(BookingPresentDto),
    SubFieldNotFound,
    SlotTaken,
    InvalidInput(String),
}

pub struct CreateBookingUseCase {
    pub repo_booking: Box<dyn AbsBookingRepo>,
    pub repo_field: Box<dyn AbsFieldRepo>,
    pub auth_claim: AppAuthedClaim,
    pub logctx: Arc<AppLogContext>,
}

impl CreateBookingUseCase {
    pub async fn execute(
        self,
        sub_field_id: u64,
        req: BookingCreateReqDto,
    ) -> DefaultResult<CreateBookingUcOutput, AppError> {
        if let Err(e) = BookingModel::validate_day(req.day.as_str()) {
            return Ok(CreateBookingUcOutput::InvalidInput(
                e.detail.unwrap_or_default(),
            ));
        }
        if let Err(e) = BookingModel::validate_duration(req.duration.as_str()) {
            return Ok(CreateBookingUcOutput::InvalidInput(
                e.detail.unwrap_or_default(),
            ));
        }
        match self.repo_field.fetch_subfield(sub_field_id).await {
            Ok(_subfield) => {}
            Err(e) if e.code == AppErrorCode::SubFieldNotExist => {
                return Ok(CreateBookingUcOutput::SubFieldNotFound);
            }
            Err(e) => {
                return Err(e);
            }
        }
        // advisory pre-check, the authoritative guard is the key constraint
        // inside the repository insert below
        let existing = self
            .repo_booking
            .fetch_by_subfield_day(sub_field_id, req.day.as_str())
            .await?;
        if existing.iter().any(|b| b.duration == req.duration) {
            return Ok(CreateBookingUcOutput::SlotTaken);
        }
        let saved = BookingModel {
            id_: BookingModel::generate_id(app_meta::MACHINE_CODE),
            sub_field_id,
            owner_id: self.auth_claim.profile,
            day: req.day,
            duration: req.duration,
            total_price: req.total_price,
            status: BookingStatus::Pending,
            create_time: LocalTime::now().fixed_offset(),
        };
        match self.repo_booking.create(saved.clone()).await {
            Ok(()) => Ok(CreateBookingUcOutput::Success(booking_present_dto(saved))),
            Err(e) if e.code == AppErrorCode::DuplicateKey => {
                // lost the race after the advisory check passed
                let logctx_p = &self.logctx;
                app_log_event!(
                    logctx_p,
                    AppLogLevel::INFO,
                    "slot taken by concurrent request, {:?}",
                    e.detail
                );
                Ok(CreateBookingUcOutput::SlotTaken)
            }
            Err(e) => Err(e),
        }
    } // end of fn execute
} // end of impl CreateBookingUseCase

pub enum BookingSlotsUcOutput {
    Success(Vec<SlotPresentDto>),
    SubFieldNotFound,
    InvalidInput(String),
}

pub struct ListSlotsUseCase {
    pub repo_booking: Box<dyn AbsBookingRepo>,
    pub repo_field: Box<dyn AbsFieldRepo>,
}

impl ListSlotsUseCase {
    pub async fn execute(
        self,
        sub_field_id: u64,
        day: String,
    ) -> DefaultResult<BookingSlotsUcOutput, AppError> {
        if let Err(e) = BookingModel::validate_day(day.as_str()) {
            return Ok(BookingSlotsUcOutput::InvalidInput(
                e.detail.unwrap_or_default(),
            ));
        }
        match self.repo_field.fetch_subfield(sub_field_id).await {
            Ok(_subfield) => {}
            Err(e) if e.code == AppErrorCode::SubFieldNotExist => {
                return Ok(BookingSlotsUcOutput::SubFieldNotFound);
            }
            Err(e) => {
                return Err(e);
            }
        }
        let existing = self
            .repo_booking
            .fetch_by_subfield_day(sub_field_id, day.as_str())
            .await?;
        let tagged = BookingModel::tag_slots(&existing)
            .into_iter()
            .map(|s| SlotPresentDto {
                duration: s.duration,
                is_booked: s.is_booked,
            })
            .collect();
        Ok(BookingSlotsUcOutput::Success(tagged))
    }
} // end of impl ListSlotsUseCase
