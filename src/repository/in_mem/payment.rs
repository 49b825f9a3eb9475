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
use crate::model::{PaymentModel, PaymentStatus};

use super::super::AbsPaymentRepo;

mod _payment {
    pub(super) const TABLE_LABEL: &str = "payment_record";

    pub(super) enum InMemColIdx {
        OrderId,
        OwnerId,
        Amount,
        Status,
        LinkId,
        CheckoutUrl,
        QrCode,
        ExpiredTime,
        TransactionRef,
        WebhookSnapshot,
        PaidTime,
        CreateTime,
        TotNumColumns,
    }
    impl From<InMemColIdx> for usize {
        fn from(value: InMemColIdx) -> usize {
            match value {
                InMemColIdx::OrderId => 0,
                InMemColIdx::OwnerId => 1,
                InMemColIdx::Amount => 2,
                InMemColIdx::Status => 3,
                InMemColIdx::LinkId => 4,
                InMemColIdx::CheckoutUrl => 5,
                InMemColIdx::QrCode => 6,
                InMemColIdx::ExpiredTime => 7,
                InMemColIdx::TransactionRef => 8,
                InMemColIdx::WebhookSnapshot => 9,
                InMemColIdx::PaidTime => 10,
                InMemColIdx::CreateTime => 11,
                InMemColIdx::TotNumColumns => 12,
            }
        }
    }
} // end of inner module _payment

struct OrderIdFilterOp {
    expect: String,
}
impl AbsDStoreFilterKeyOp for OrderIdFilterOp {
    fn filter(&self, _k: &String, v: &Vec<String>) -> bool {
        let idx: usize = _payment::InMemColIdx::OrderId.into();
        v.get(idx).map(|s| s == &self.expect).unwrap_or(false)
    }
}

fn opt_time_col(raw: &str) -> DefaultResult<Option<chrono::DateTime<chrono::FixedOffset>>, AppError> {
    if raw.is_empty() {
        Ok(None)
    } else {
        DateTime::parse_from_rfc3339(raw)
            .map(Some)
            .map_err(|e| AppError {
                code: AppErrorCode::DataCorruption,
                detail: Some(format!("payment-time, {}", e)),
            })
    }
}

fn to_row(m: &PaymentModel) -> AppInMemFetchedSingleRow {
    let mut row = (0.._payment::InMemColIdx::TotNumColumns.into())
        .map(|_n| String::new())
        .collect::<Vec<String>>();
    let _ = [
        (_payment::InMemColIdx::OrderId, m.order_id.clone()),
        (_payment::InMemColIdx::OwnerId, m.owner_id.to_string()),
        (_payment::InMemColIdx::Amount, m.amount.to_string()),
        (_payment::InMemColIdx::Status, m.status.as_str().to_string()),
        (_payment::InMemColIdx::LinkId, m.link_id.clone()),
        (_payment::InMemColIdx::CheckoutUrl, m.checkout_url.clone()),
        (_payment::InMemColIdx::QrCode, m.qr_code.clone()),
        (
            _payment::InMemColIdx::ExpiredTime,
            m.expired_time.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ),
        (
            _payment::InMemColIdx::TransactionRef,
            m.transaction_ref.clone().unwrap_or_default(),
        ),
        (
            _payment::InMemColIdx::WebhookSnapshot,
            m.webhook_snapshot.clone().unwrap_or_default(),
        ),
        (
            _payment::InMemColIdx::PaidTime,
            m.paid_time.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ),
        (
            _payment::InMemColIdx::CreateTime,
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

fn from_row(key: &str, row: &AppInMemFetchedSingleRow) -> DefaultResult<PaymentModel, AppError> {
    fn col(row: &AppInMemFetchedSingleRow, idx: _payment::InMemColIdx) -> &String {
        row.get::<usize>(idx.into()).unwrap()
    }
    let status = PaymentStatus::from_str(col(row, _payment::InMemColIdx::Status).as_str())?;
    let create_time = DateTime::parse_from_rfc3339(col(row, _payment::InMemColIdx::CreateTime))
        .map_err(|e| AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some(format!("payment-ctime, {}", e)),
        })?;
    let tx_ref = col(row, _payment::InMemColIdx::TransactionRef);
    let snapshot = col(row, _payment::InMemColIdx::WebhookSnapshot);
    Ok(PaymentModel {
        gateway_code: key.parse().unwrap(),
        order_id: col(row, _payment::InMemColIdx::OrderId).clone(),
        owner_id: col(row, _payment::InMemColIdx::OwnerId).parse().unwrap(),
        amount: col(row, _payment::InMemColIdx::Amount).parse().unwrap(),
        status,
        link_id: col(row, _payment::InMemColIdx::LinkId).clone(),
        checkout_url: col(row, _payment::InMemColIdx::CheckoutUrl).clone(),
        qr_code: col(row, _payment::InMemColIdx::QrCode).clone(),
        expired_time: opt_time_col(col(row, _payment::InMemColIdx::ExpiredTime))?,
        transaction_ref: (!tx_ref.is_empty()).then(|| tx_ref.clone()),
        webhook_snapshot: (!snapshot.is_empty()).then(|| snapshot.clone()),
        paid_time: opt_time_col(col(row, _payment::InMemColIdx::PaidTime))?,
        create_time,
    })
} // end of fn from_row

pub struct PaymentInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl PaymentInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(_payment::TABLE_LABEL).await?;
        Ok(Self { datastore: m })
    }

    async fn _fetch_by_keys(&self, ids: Vec<String>) -> DefaultResult<Vec<PaymentModel>, AppError> {
        let info = HashMap::from([(_payment::TABLE_LABEL.to_string(), ids)]);
        let resultset = self.datastore.fetch(info).await?;
        let mut out = Vec::new();
        if let Some(t) = resultset.get(_payment::TABLE_LABEL) {
            for (key, row) in t.iter() {
                out.push(from_row(key, row)?);
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl AbsPaymentRepo for PaymentInMemRepo {
    async fn create(&self, payment: PaymentModel) -> DefaultResult<(), AppError> {
        // gateway codes are the row key, insert under the table lock so two
        // payments can never share one code
        let key = payment.gateway_code.to_string();
        let info = HashMap::from([(_payment::TABLE_LABEL.to_string(), vec![key.clone()])]);
        let (tableset, d_lock) = self.datastore.fetch_acquire(info).await?;
        let occupied = tableset
            .get(_payment::TABLE_LABEL)
            .map(|t| !t.is_empty())
            .unwrap_or(false);
        if occupied {
            drop(d_lock);
            return Err(AppError {
                code: AppErrorCode::DuplicateKey,
                detail: Some(format!("gateway-code:{}", payment.gateway_code)),
            });
        }
        let rows = HashMap::from([(key, to_row(&payment))]);
        let data = HashMap::from([(_payment::TABLE_LABEL.to_string(), rows)]);
        let _num = self.datastore.save_release(data, d_lock)?;
        Ok(())
    } // end of fn create

    async fn fetch_by_code(&self, gateway_code: i64) -> DefaultResult<PaymentModel, AppError> {
        let mut found = self._fetch_by_keys(vec![gateway_code.to_string()]).await?;
        if found.is_empty() {
            Err(AppError {
                code: AppErrorCode::PaymentNotExist,
                detail: Some(format!("gateway-code:{}", gateway_code)),
            })
        } else {
            Ok(found.remove(0))
        }
    }

    async fn fetch_by_order(&self, oid: &str) -> DefaultResult<Option<PaymentModel>, AppError> {
        let op = OrderIdFilterOp {
            expect: oid.to_string(),
        };
        let keys = self
            .datastore
            .filter_keys(_payment::TABLE_LABEL.to_string(), &op)
            .await?;
        let mut found = self._fetch_by_keys(keys).await?;
        if found.is_empty() {
            Ok(None)
        } else {
            Ok(Some(found.remove(0)))
        }
    }

    async fn save(&self, payment: PaymentModel) -> DefaultResult<(), AppError> {
        let rows = HashMap::from([(payment.gateway_code.to_string(), to_row(&payment))]);
        let data = HashMap::from([(_payment::TABLE_LABEL.to_string(), rows)]);
        let _num = self.datastore.save(data).await?;
        Ok(())
    }
} // end of impl AbsPaymentRepo for PaymentInMemRepo
