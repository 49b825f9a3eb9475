use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::str::FromStr;

use crate::api::web::dto::{
    FieldCreateReqDto, FieldPresentDto, SubFieldCreateReqDto, SubFieldPresentDto,
};
use crate::constant::app_meta;
use crate::error::{AppError, AppErrorCode};
use crate::generate_numeric_id;
use crate::model::{FieldModel, SubFieldModel, SubFieldStatus};
use crate::repository::AbsFieldRepo;
use crate::{AppAuthRole, AppAuthedClaim};

fn subfield_present_dto(m: SubFieldModel) -> SubFieldPresentDto {
    SubFieldPresentDto {
        sub_field_id: m.id_,
        field_id: m.field_id,
        name: m.name,
        slot_price: m.slot_price,
        status: m.status.as_str().to_string(),
    }
}

fn field_present_dto(m: FieldModel, subs: Vec<SubFieldModel>) -> FieldPresentDto {
    FieldPresentDto {
        field_id: m.id_,
        name: m.name,
        location: m.location,
        sub_fields: subs.into_iter().map(subfield_present_dto).collect(),
    }
}

pub enum FacilityUcOutput {
    Success(FieldPresentDto),
    Collection(Vec<FieldPresentDto>),
    PermissionDeny,
    NotFound,
}

pub enum SubFieldUcOutput {
    Success(SubFieldPresentDto),
    PermissionDeny,
    FieldNotFound,
    SubFieldNotFound,
    BadStatusLabel(String),
}

pub struct CreateFieldUseCase {
    pub repo_field: Box<dyn AbsFieldRepo>,
    pub auth_claim: AppAuthedClaim,
}

impl CreateFieldUseCase {
    pub async fn execute(self, req: FieldCreateReqDto) -> DefaultResult<FacilityUcOutput, AppError> {
        if !self.auth_claim.contain_role(AppAuthRole::Admin) {
            return Ok(FacilityUcOutput::PermissionDeny);
        }
        let saved = FieldModel {
            id_: generate_numeric_id(app_meta::MACHINE_CODE),
            name: req.name,
            location: req.location,
            is_deleted: false,
            is_create: true,
        };
        self.repo_field.create(saved.clone()).await?;
        Ok(FacilityUcOutput::Success(field_present_dto(saved, vec![])))
    }
}

pub struct ListFieldsUseCase {
    pub repo_field: Box<dyn AbsFieldRepo>,
}

impl ListFieldsUseCase {
    pub async fn execute(self) -> DefaultResult<FacilityUcOutput, AppError> {
        let found = self.repo_field.fetch_all().await?;
        let mut out = Vec::new();
        for f in found.into_iter().filter(|m| !m.is_deleted) {
            let subs = self.repo_field.fetch_subfields_of(f.id_).await?;
            out.push(field_present_dto(f, subs));
        }
        Ok(FacilityUcOutput::Collection(out))
    }
}

pub struct FieldDetailUseCase {
    pub repo_field: Box<dyn AbsFieldRepo>,
}

impl FieldDetailUseCase {
    pub async fn execute(self, field_id: u64) -> DefaultResult<FacilityUcOutput, AppError> {
        let field = match self.repo_field.fetch(field_id).await {
            Ok(v) if !v.is_deleted => v,
            Ok(_gone) => {
                return Ok(FacilityUcOutput::NotFound);
            }
            Err(e) if e.code == AppErrorCode::FieldNotExist => {
                return Ok(FacilityUcOutput::NotFound);
            }
            Err(e) => {
                return Err(e);
            }
        };
        let subs = self.repo_field.fetch_subfields_of(field.id_).await?;
        Ok(FacilityUcOutput::Success(field_present_dto(field, subs)))
    }
}

pub struct DiscardFieldUseCase {
    pub repo_field: Box<dyn AbsFieldRepo>,
    pub auth_claim: AppAuthedClaim,
}

impl DiscardFieldUseCase {
    pub async fn execute(self, field_id: u64) -> DefaultResult<FacilityUcOutput, AppError> {
        if !self.auth_claim.contain_role(AppAuthRole::Admin) {
            return Ok(FacilityUcOutput::PermissionDeny);
        }
        let mut field = match self.repo_field.fetch(field_id).await {
            Ok(v) if !v.is_deleted => v,
            Ok(_gone) => {
                return Ok(FacilityUcOutput::NotFound);
            }
            Err(e) if e.code == AppErrorCode::FieldNotExist => {
                return Ok(FacilityUcOutput::NotFound);
            }
            Err(e) => {
                return Err(e);
            }
        };
        field.is_deleted = true;
        self.repo_field.save(field.clone()).await?;
        Ok(FacilityUcOutput::Success(field_present_dto(field, vec![])))
    }
}

pub struct CreateSubFieldUseCase {
    pub repo_field: Box<dyn AbsFieldRepo>,
    pub auth_claim: AppAuthedClaim,
}

impl CreateSubFieldUseCase {
    pub async fn execute(
        self,
        field_id: u64,
        req: SubFieldCreateReqDto,
    ) -> DefaultResult<SubFieldUcOutput, AppError> {
        if !self.auth_claim.contain_role(AppAuthRole::Admin) {
            return Ok(SubFieldUcOutput::PermissionDeny);
        }
        match self.repo_field.fetch(field_id).await {
            Ok(_found) if !_found.is_deleted => {}
            Ok(_gone) => {
                return Ok(SubFieldUcOutput::FieldNotFound);
            }
            Err(e) if e.code == AppErrorCode::FieldNotExist => {
                return Ok(SubFieldUcOutput::FieldNotFound);
            }
            Err(e) => {
                return Err(e);
            }
        }
        let saved = SubFieldModel {
            id_: generate_numeric_id(app_meta::MACHINE_CODE),
            field_id,
            name: req.name,
            slot_price: req.slot_price,
            status: SubFieldStatus::Available,
        };
        self.repo_field.create_subfield(saved.clone()).await?;
        Ok(SubFieldUcOutput::Success(subfield_present_dto(saved)))
    } // end of fn execute
}

pub struct UpdateSubFieldStatusUseCase {
    pub repo_field: Box<dyn AbsFieldRepo>,
    pub auth_claim: AppAuthedClaim,
}

impl UpdateSubFieldStatusUseCase {
    pub async fn execute(
        self,
        sub_field_id: u64,
        status_label: String,
    ) -> DefaultResult<SubFieldUcOutput, AppError> {
        if !self.auth_claim.contain_role(AppAuthRole::Admin) {
            return Ok(SubFieldUcOutput::PermissionDeny);
        }
        let next = match SubFieldStatus::from_str(status_label.as_str()) {
            Ok(v) => v,
            Err(_e) => {
                return Ok(SubFieldUcOutput::BadStatusLabel(status_label));
            }
        };
        let mut item = match self.repo_field.fetch_subfield(sub_field_id).await {
            Ok(v) => v,
            Err(e) if e.code == AppErrorCode::SubFieldNotExist => {
                return Ok(SubFieldUcOutput::SubFieldNotFound);
            }
            Err(e) => {
                return Err(e);
            }
        };
        // descriptive only, bookings never read or enforce this label
        item.status = next;
        self.repo_field.save_subfield(item.clone()).await?;
        Ok(SubFieldUcOutput::Success(subfield_present_dto(item)))
    } // end of fn execute
}
