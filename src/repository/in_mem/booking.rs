use std::boxed::Box;
use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;

use crate::adapter::datastore::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppInMemFetchedSingleRow,
};
use crate::error::{AppError, AppErrorCode};
use crate::model::{BookingModel, BookingStatus};

use super::super::AbsBookingRepo;

mod _booking {
    pub(super) const TABLE_LABEL: &str = "booking_slot";

    pub(super) enum InMemColIdx {
        BookingId,
        SubFieldId,
        OwnerId,
        Day,
        Duration,
        TotalPrice,
        Status,
        CreateTime,
        TotNumColumns,
    }
    impl From<InMemColIdx> for usize {
        fn from(value: InMemColIdx) -> usize {
            match value {
                InMemColIdx::BookingId => 0,
                InMemColIdx::SubFieldId => 1,
                InMemColIdx::OwnerId => 2,
                InMemColIdx::Day => 3,
                InMemColIdx::Duration => 4,
                InMemColIdx::TotalPrice => 5,
                InMemColIdx::Status => 6,
                InMemColIdx::CreateTime => 7,
                InMemColIdx::TotNumColumns => 8,
            }
        }
    }
} // end of inner module _booking

// row keys are the `{sub-field}/{day}/{duration}` triple, so key equality at
// the storage layer IS the slot-exclusivity constraint
struct SlotPrefixFilterOp {
    pattern_prefix: String,
}
impl AbsDStoreFilterKeyOp for SlotPrefixFilterOp {
    fn filter(&self, k: &String, _v: &Vec<String>) -> bool {
        if let Some(pos) = k.find(self.pattern_prefix.as_str()) {
            pos == 0
        } else {
            false
        }
    }
}
impl SlotPrefixFilterOp {
    fn new(sub_field_id: u64, day: &str) -> Self {
        let patt = format!("{}/{}/", sub_field_id, day);
        Self {
            pattern_prefix: patt,
        }
    }
}

struct BookingIdFilterOp {
    expect: String,
}
impl AbsDStoreFilterKeyOp for BookingIdFilterOp {
    fn filter(&self, _k: &String, v: &Vec<String>) -> bool {
        let idx: usize = _booking::InMemColIdx::BookingId.into();
        v.get(idx).map(|s| s == &self.expect).unwrap_or(false)
    }
}

fn to_row(m: &BookingModel) -> AppInMemFetchedSingleRow {
    let mut row = (0.._booking::InMemColIdx::TotNumColumns.into())
        .map(|_n| String::new())
        .collect::<Vec<String>>();
    let _ = [
        (_booking::InMemColIdx::BookingId, m.id_.clone()),
        (_booking::InMemColIdx::SubFieldId, m.sub_field_id.to_string()),
        (_booking::InMemColIdx::OwnerId, m.owner_id.to_string()),
        (_booking::InMemColIdx::Day, m.day.clone()),
        (_booking::InMemColIdx::Duration, m.duration.clone()),
        (_booking::InMemColIdx::TotalPrice, m.total_price.to_string()),
        (_booking::InMemColIdx::Status, m.status.as_str().to_string()),
        (
            _booking::InMemColIdx::CreateTime,
            m.create_time.to_rfc3339(),
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

fn from_row(row: &AppInMemFetchedSingleRow) -> DefaultResult<BookingModel, AppError> {
    fn col(row: &AppInMemFetchedSingleRow, idx: _booking::InMemColIdx) -> &String {
        row.get::<usize>(idx.into()).unwrap()
    }
    let status = BookingStatus::from_str(col(row, _booking::InMemColIdx::Status).as_str())?;
    let create_time = DateTime::parse_from_rfc3339(col(row, _booking::InMemColIdx::CreateTime))
        .map_err(|e| AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some(format!("booking-ctime, {}", e)),
        })?;
    Ok(BookingModel {
        id_: col(row, _booking::InMemColIdx::BookingId).clone(),
        sub_field_id: col(row, _booking::InMemColIdx::SubFieldId).parse().unwrap(),
        owner_id: col(row, _booking::InMemColIdx::OwnerId).parse().unwrap(),
        day: col(row, _booking::InMemColIdx::Day).clone(),
        duration: col(row, _booking::InMemColIdx::Duration).clone(),
        total_price: col(row, _booking::InMemColIdx::TotalPrice).parse().unwrap(),
        status,
        create_time,
    })
}

pub struct BookingInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl BookingInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(_booking::TABLE_LABEL).await?;
        Ok(Self { datastore: m })
    }

    async fn _fetch_by_keys(&self, ids: Vec<String>) -> DefaultResult<Vec<BookingModel>, AppError> {
        let info = HashMap::from([(_booking::TABLE_LABEL.to_string(), ids)]);
        let resultset = self.datastore.fetch(info).await?;
        let mut out = Vec::new();
        if let Some(t) = resultset.get(_booking::TABLE_LABEL) {
            for (_key, row) in t.iter() {
                out.push(from_row(row)?);
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl AbsBookingRepo for BookingInMemRepo {
    async fn create(&self, booking: BookingModel) -> DefaultResult<(), AppError> {
        let key =
            BookingModel::conflict_key(booking.sub_field_id, &booking.day, &booking.duration);
        let info = HashMap::from([(_booking::TABLE_LABEL.to_string(), vec![key.clone()])]);
        let (tableset, d_lock) = self.datastore.fetch_acquire(info).await?;
        let occupied = tableset
            .get(_booking::TABLE_LABEL)
            .map(|t| !t.is_empty())
            .unwrap_or(false);
        if occupied {
            // a concurrent request won the slot between the caller's
            // advisory check and this insert
            drop(d_lock);
            return Err(AppError {
                code: AppErrorCode::DuplicateKey,
                detail: Some(key),
            });
        }
        let rows = HashMap::from([(key, to_row(&booking))]);
        let data = HashMap::from([(_booking::TABLE_LABEL.to_string(), rows)]);
        let _num = self.datastore.save_release(data, d_lock)?;
        Ok(())
    } // end of fn create

    async fn fetch(&self, id: &str) -> DefaultResult<BookingModel, AppError> {
        let op = BookingIdFilterOp {
            expect: id.to_string(),
        };
        let keys = self
            .datastore
            .filter_keys(_booking::TABLE_LABEL.to_string(), &op)
            .await?;
        let mut found = self._fetch_by_keys(keys).await?;
        if found.is_empty() {
            Err(AppError {
                code: AppErrorCode::BookingNotExist,
                detail: Some(format!("id:{}", id)),
            })
        } else {
            Ok(found.remove(0))
        }
    }

    async fn fetch_by_subfield_day(
        &self,
        sub_field_id: u64,
        day: &str,
    ) -> DefaultResult<Vec<BookingModel>, AppError> {
        let op = SlotPrefixFilterOp::new(sub_field_id, day);
        let keys = self
            .datastore
            .filter_keys(_booking::TABLE_LABEL.to_string(), &op)
            .await?;
        self._fetch_by_keys(keys).await
    }

    async fn save(&self, booking: BookingModel) -> DefaultResult<(), AppError> {
        let key =
            BookingModel::conflict_key(booking.sub_field_id, &booking.day, &booking.duration);
        let rows = HashMap::from([(key, to_row(&booking))]);
        let data = HashMap::from([(_booking::TABLE_LABEL.to_string(), rows)]);
        let _num = self.datastore.save(data).await?;
        Ok(())
    }
} // end of impl AbsBookingRepo for BookingInMemRepo
