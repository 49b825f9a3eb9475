use std::boxed::Box;
use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::adapter::datastore::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppInMemFetchedSingleRow,
};
use crate::error::{AppError, AppErrorCode};
use crate::model::{FieldModel, SubFieldModel, SubFieldStatus};

use super::super::AbsFieldRepo;
use super::AcceptAllFilterOp;

mod _field {
    pub(super) const TABLE_LABEL: &str = "facility_field";

    pub(super) enum InMemColIdx {
        Name,
        Location,
        IsDeleted,
        TotNumColumns,
    }
    impl From<InMemColIdx> for usize {
        fn from(value: InMemColIdx) -> usize {
            match value {
                InMemColIdx::Name => 0,
                InMemColIdx::Location => 1,
                InMemColIdx::IsDeleted => 2,
                InMemColIdx::TotNumColumns => 3,
            }
        }
    }
}

mod _subfield {
    pub(super) const TABLE_LABEL: &str = "facility_subfield";

    pub(super) enum InMemColIdx {
        FieldId,
        Name,
        SlotPrice,
        Status,
        TotNumColumns,
    }
    impl From<InMemColIdx> for usize {
        fn from(value: InMemColIdx) -> usize {
            match value {
                InMemColIdx::FieldId => 0,
                InMemColIdx::Name => 1,
                InMemColIdx::SlotPrice => 2,
                InMemColIdx::Status => 3,
                InMemColIdx::TotNumColumns => 4,
            }
        }
    }
}

struct ParentFieldFilterOp {
    expect: String,
}
impl AbsDStoreFilterKeyOp for ParentFieldFilterOp {
    fn filter(&self, _k: &String, v: &Vec<String>) -> bool {
        let idx: usize = _subfield::InMemColIdx::FieldId.into();
        v.get(idx).map(|s| s == &self.expect).unwrap_or(false)
    }
}

fn field_to_row(m: &FieldModel) -> AppInMemFetchedSingleRow {
    let mut row = (0.._field::InMemColIdx::TotNumColumns.into())
        .map(|_n| String::new())
        .collect::<Vec<String>>();
    let _ = [
        (_field::InMemColIdx::Name, m.name.clone()),
        (_field::InMemColIdx::Location, m.location.clone()),
        (
            _field::InMemColIdx::IsDeleted,
            (m.is_deleted as u8).to_string(),
        ),
    ]
    .into_iter()
    .map(|(idx, val)| {
        let idx: usize = idx.into();
        row[idx] = val;
    })
    .collect::<Vec<()>>();
    row
}

fn field_from_row(key: &str, row: &AppInMemFetchedSingleRow) -> FieldModel {
    FieldModel {
        id_: key.parse().unwrap(),
        name: row
            .get::<usize>(_field::InMemColIdx::Name.into())
            .unwrap()
            .clone(),
        location: row
            .get::<usize>(_field::InMemColIdx::Location.into())
            .unwrap()
            .clone(),
        is_deleted: row
            .get::<usize>(_field::InMemColIdx::IsDeleted.into())
            .unwrap()
            .as_str()
            == "1",
        is_create: false,
    }
}

fn subfield_to_row(m: &SubFieldModel) -> AppInMemFetchedSingleRow {
    let mut row = (0.._subfield::InMemColIdx::TotNumColumns.into())
        .map(|_n| String::new())
        .collect::<Vec<String>>();
    let _ = [
        (_subfield::InMemColIdx::FieldId, m.field_id.to_string()),
        (_subfield::InMemColIdx::Name, m.name.clone()),
        (_subfield::InMemColIdx::SlotPrice, m.slot_price.to_string()),
        (
            _subfield::InMemColIdx::Status,
            m.status.as_str().to_string(),
        ),
    ]
    .into_iter()
    .map(|(idx, val)| {
        let idx: usize = idx.into();
        row[idx] = val;
    })
    .collect::<Vec<()>>();
    row
}

fn subfield_from_row(
    key: &str,
    row: &AppInMemFetchedSingleRow,
) -> DefaultResult<SubFieldModel, AppError> {
    let status_raw = row
        .get::<usize>(_subfield::InMemColIdx::Status.into())
        .unwrap();
    let status = SubFieldStatus::from_str(status_raw.as_str())?;
    Ok(SubFieldModel {
        id_: key.parse().unwrap(),
        field_id: row
            .get::<usize>(_subfield::InMemColIdx::FieldId.into())
            .unwrap()
            .parse()
            .unwrap(),
        name: row
            .get::<usize>(_subfield::InMemColIdx::Name.into())
            .unwrap()
            .clone(),
        slot_price: row
            .get::<usize>(_subfield::InMemColIdx::SlotPrice.into())
            .unwrap()
            .parse()
            .unwrap(),
        status,
    })
}

pub struct FieldInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl FieldInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(_field::TABLE_LABEL).await?;
        m.create_table(_subfield::TABLE_LABEL).await?;
        Ok(Self { datastore: m })
    }

    async fn _fetch_fields(&self, ids: Vec<String>) -> DefaultResult<Vec<FieldModel>, AppError> {
        let info = HashMap::from([(_field::TABLE_LABEL.to_string(), ids)]);
        let resultset = self.datastore.fetch(info).await?;
        let out = resultset
            .get(_field::TABLE_LABEL)
            .map(|t| {
                t.iter()
                    .map(|(key, row)| field_from_row(key, row))
                    .collect()
            })
            .unwrap_or_default();
        Ok(out)
    }

    async fn _fetch_subfields(
        &self,
        ids: Vec<String>,
    ) -> DefaultResult<Vec<SubFieldModel>, AppError> {
        let info = HashMap::from([(_subfield::TABLE_LABEL.to_string(), ids)]);
        let resultset = self.datastore.fetch(info).await?;
        let mut out = Vec::new();
        if let Some(t) = resultset.get(_subfield::TABLE_LABEL) {
            for (key, row) in t.iter() {
                out.push(subfield_from_row(key, row)?);
            }
        }
        Ok(out)
    }
} // end of impl FieldInMemRepo

#[async_trait]
impl AbsFieldRepo for FieldInMemRepo {
    async fn create(&self, field: FieldModel) -> DefaultResult<(), AppError> {
        self.save(field).await
    }

    async fn fetch(&self, id: u64) -> DefaultResult<FieldModel, AppError> {
        let mut found = self._fetch_fields(vec![id.to_string()]).await?;
        if found.is_empty() {
            Err(AppError {
                code: AppErrorCode::FieldNotExist,
                detail: Some(format!("id:{}", id)),
            })
        } else {
            Ok(found.remove(0))
        }
    }

    async fn fetch_all(&self) -> DefaultResult<Vec<FieldModel>, AppError> {
        let keys = self
            .datastore
            .filter_keys(_field::TABLE_LABEL.to_string(), &AcceptAllFilterOp)
            .await?;
        self._fetch_fields(keys).await
    }

    async fn save(&self, field: FieldModel) -> DefaultResult<(), AppError> {
        let rows = HashMap::from([(field.id_.to_string(), field_to_row(&field))]);
        let data = HashMap::from([(_field::TABLE_LABEL.to_string(), rows)]);
        let _num = self.datastore.save(data).await?;
        Ok(())
    }

    async fn create_subfield(&self, item: SubFieldModel) -> DefaultResult<(), AppError> {
        self.save_subfield(item).await
    }

    async fn fetch_subfield(&self, id: u64) -> DefaultResult<SubFieldModel, AppError> {
        let mut found = self._fetch_subfields(vec![id.to_string()]).await?;
        if found.is_empty() {
            Err(AppError {
                code: AppErrorCode::SubFieldNotExist,
                detail: Some(format!("id:{}", id)),
            })
        } else {
            Ok(found.remove(0))
        }
    }

    async fn fetch_subfields_of(
        &self,
        field_id: u64,
    ) -> DefaultResult<Vec<SubFieldModel>, AppError> {
        let op = ParentFieldFilterOp {
            expect: field_id.to_string(),
        };
        let keys = self
            .datastore
            .filter_keys(_subfield::TABLE_LABEL.to_string(), &op)
            .await?;
        self._fetch_subfields(keys).await
    }

    async fn save_subfield(&self, item: SubFieldModel) -> DefaultResult<(), AppError> {
        let rows = HashMap::from([(item.id_.to_string(), subfield_to_row(&item))]);
        let data = HashMap::from([(_subfield::TABLE_LABEL.to_string(), rows)]);
        let _num = self.datastore.save(data).await?;
        Ok(())
    }
} // end of impl AbsFieldRepo for FieldInMemRepo
