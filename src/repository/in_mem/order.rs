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
use crate::model::{OrderLineModel, OrderModel, OrderPaymentMethod, OrderStatus, ProductKind};

use super::super::AbsOrderRepo;

mod _order {
    pub(super) const TABLE_LABEL: &str = "order_toplvl";

    pub(super) enum InMemColIdx {
        Code,
        OwnerId,
        Status,
        TotalAmount,
        PaymentMethod,
        Note,
        CreateTime,
        Lines,
        TotNumColumns,
    }
    impl From<InMemColIdx> for usize {
        fn from(value: InMemColIdx) -> usize {
            match value {
                InMemColIdx::Code => 0,
                InMemColIdx::OwnerId => 1,
                InMemColIdx::Status => 2,
                InMemColIdx::TotalAmount => 3,
                InMemColIdx::PaymentMethod => 4,
                InMemColIdx::Note => 5,
                InMemColIdx::CreateTime => 6,
                InMemColIdx::Lines => 7,
                InMemColIdx::TotNumColumns => 8,
            }
        }
    }
} // end of inner module _order

struct OwnerEqualFilterOp {
    expect: String,
}
impl AbsDStoreFilterKeyOp for OwnerEqualFilterOp {
    fn filter(&self, _k: &String, v: &Vec<String>) -> bool {
        let idx: usize = _order::InMemColIdx::OwnerId.into();
        v.get(idx).map(|s| s == &self.expect).unwrap_or(false)
    }
}

// every line packed as `product-id/kind/quantity/unit-price`, lines joined
// with single spaces into one column
fn encode_lines(lines: &[OrderLineModel]) -> String {
    lines
        .iter()
        .map(|l| {
            let kind_num: u8 = l.kind.clone().into();
            format!("{}/{}/{}/{}", l.product_id, kind_num, l.quantity, l.unit_price)
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn decode_lines(raw: &str) -> Vec<OrderLineModel> {
    raw.split(' ')
        .filter_map(|tok| {
            let elms = tok.split('/').collect::<Vec<&str>>();
            if elms.len() == 4 {
                let kind_num: u8 = elms[1].parse().unwrap();
                Some(OrderLineModel {
                    product_id: elms[0].parse().unwrap(),
                    kind: ProductKind::from(kind_num),
                    quantity: elms[2].parse().unwrap(),
                    unit_price: elms[3].parse().unwrap(),
                })
            } else {
                None
            }
        })
        .collect()
}

fn to_row(m: &OrderModel) -> AppInMemFetchedSingleRow {
    let mut row = (0.._order::InMemColIdx::TotNumColumns.into())
        .map(|_n| String::new())
        .collect::<Vec<String>>();
    let _ = [
        (_order::InMemColIdx::Code, m.code.clone()),
        (_order::InMemColIdx::OwnerId, m.owner_id.to_string()),
        (_order::InMemColIdx::Status, m.status.as_str().to_string()),
        (_order::InMemColIdx::TotalAmount, m.total_amount.to_string()),
        (
            _order::InMemColIdx::PaymentMethod,
            m.payment_method.as_str().to_string(),
        ),
        (
            _order::InMemColIdx::Note,
            m.note.clone().unwrap_or_default(),
        ),
        (
            _order::InMemColIdx::CreateTime,
            m.create_time.to_rfc3339(),
        ),
        (_order::InMemColIdx::Lines, encode_lines(&m.lines)),
    ]
    .into_iter()
    .map(|(idx, val)| {
        let idx: usize = idx.into();
        row[idx] = val;
    })
    .collect::<Vec<()>>();
    row
}

fn from_row(key: &str, row: &AppInMemFetchedSingleRow) -> DefaultResult<OrderModel, AppError> {
    let status_raw = row.get::<usize>(_order::InMemColIdx::Status.into()).unwrap();
    let status = OrderStatus::from_str(status_raw.as_str())?;
    let method_raw = row
        .get::<usize>(_order::InMemColIdx::PaymentMethod.into())
        .unwrap();
    let payment_method = OrderPaymentMethod::from_str(method_raw.as_str())?;
    let ctime_raw = row
        .get::<usize>(_order::InMemColIdx::CreateTime.into())
        .unwrap();
    let create_time = DateTime::parse_from_rfc3339(ctime_raw).map_err(|e| AppError {
        code: AppErrorCode::DataCorruption,
        detail: Some(format!("order-ctime, {}", e)),
    })?;
    let note = row.get::<usize>(_order::InMemColIdx::Note.into()).unwrap();
    let note = if note.is_empty() {
        None
    } else {
        Some(note.clone())
    };
    Ok(OrderModel {
        id_: key.to_string(),
        code: row
            .get::<usize>(_order::InMemColIdx::Code.into())
            .unwrap()
            .clone(),
        owner_id: row
            .get::<usize>(_order::InMemColIdx::OwnerId.into())
            .unwrap()
            .parse()
            .unwrap(),
        lines: decode_lines(row.get::<usize>(_order::InMemColIdx::Lines.into()).unwrap()),
        status,
        total_amount: row
            .get::<usize>(_order::InMemColIdx::TotalAmount.into())
            .unwrap()
            .parse()
            .unwrap(),
        payment_method,
        note,
        create_time,
    })
} // end of fn from_row

pub struct OrderInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl OrderInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(_order::TABLE_LABEL).await?;
        Ok(Self { datastore: m })
    }

    async fn _fetch_by_keys(&self, ids: Vec<String>) -> DefaultResult<Vec<OrderModel>, AppError> {
        let info = HashMap::from([(_order::TABLE_LABEL.to_string(), ids)]);
        let resultset = self.datastore.fetch(info).await?;
        let mut out = Vec::new();
        if let Some(t) = resultset.get(_order::TABLE_LABEL) {
            for (key, row) in t.iter() {
                out.push(from_row(key, row)?);
            }
        }
        Ok(out)
    }
} // end of impl OrderInMemRepo

#[async_trait]
impl AbsOrderRepo for OrderInMemRepo {
    async fn create(&self, order: OrderModel) -> DefaultResult<(), AppError> {
        self.save(order).await
    }

    async fn fetch(&self, oid: &str) -> DefaultResult<OrderModel, AppError> {
        let mut found = self._fetch_by_keys(vec![oid.to_string()]).await?;
        if found.is_empty() {
            Err(AppError {
                code: AppErrorCode::OrderNotExist,
                detail: Some(format!("id:{}", oid)),
            })
        } else {
            Ok(found.remove(0))
        }
    }

    async fn fetch_all_by_owner(&self, owner_id: u32) -> DefaultResult<Vec<OrderModel>, AppError> {
        let op = OwnerEqualFilterOp {
            expect: owner_id.to_string(),
        };
        let keys = self
            .datastore
            .filter_keys(_order::TABLE_LABEL.to_string(), &op)
            .await?;
        self._fetch_by_keys(keys).await
    }

    async fn save(&self, order: OrderModel) -> DefaultResult<(), AppError> {
        let rows = HashMap::from([(order.id_.clone(), to_row(&order))]);
        let data = HashMap::from([(_order::TABLE_LABEL.to_string(), rows)]);
        let _num = self.datastore.save(data).await?;
        Ok(())
    }

    async fn delete(&self, oid: &str) -> DefaultResult<(), AppError> {
        let info = HashMap::from([(_order::TABLE_LABEL.to_string(), vec![oid.to_string()])]);
        let _num = self.datastore.delete(info).await?;
        Ok(())
    }
} // end of impl AbsOrderRepo for OrderInMemRepo
