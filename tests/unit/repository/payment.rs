use chrono::Local as LocalTime;

use fieldmart::error::AppErrorCode;
use fieldmart::model::PaymentStatus;
use fieldmart::repository::app_repo_payment;

use super::super::model::payment::ut_payment;
use super::super::ut_setup_datastore;

#[tokio::test]
async fn create_fetch_roundtrip() {
    let ds = ut_setup_datastore(64);
    let repo = app_repo_payment(ds).await.unwrap();
    let p = ut_payment(99001, "bee1a5", 124, 180_000);
    repo.create(p.clone()).await.unwrap();
    let readback = repo.fetch_by_code(99001).await.unwrap();
    assert_eq!(readback.order_id.as_str(), "bee1a5");
    assert_eq!(readback.amount, 180_000);
    assert_eq!(readback.status, PaymentStatus::Pending);
    assert_eq!(readback.link_id, p.link_id);

    let e = repo.fetch_by_code(55555).await.unwrap_err();
    assert_eq!(e.code, AppErrorCode::PaymentNotExist);
}

#[tokio::test]
async fn gateway_code_unique() {
    let ds = ut_setup_datastore(64);
    let repo = app_repo_payment(ds).await.unwrap();
    repo.create(ut_payment(99001, "bee1a5", 124, 180_000))
        .await
        .unwrap();
    let e = repo
        .create(ut_payment(99001, "bee1a6", 125, 90_000))
        .await
        .unwrap_err();
    assert_eq!(e.code, AppErrorCode::DuplicateKey);
}

#[tokio::test]
async fn lookup_by_order() {
    let ds = ut_setup_datastore(64);
    let repo = app_repo_payment(ds).await.unwrap();
    repo.create(ut_payment(99001, "bee1a5", 124, 180_000))
        .await
        .unwrap();
    let found = repo.fetch_by_order("bee1a5").await.unwrap();
    assert_eq!(found.unwrap().gateway_code, 99001);
    let missing = repo.fetch_by_order("bee1a6").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn webhook_fields_persist() {
    let ds = ut_setup_datastore(64);
    let repo = app_repo_payment(ds).await.unwrap();
    let mut p = ut_payment(99001, "bee1a5", 124, 180_000);
    repo.create(p.clone()).await.unwrap();
    let t0 = LocalTime::now().fixed_offset();
    p.mark_paid(
        Some("FT230918".to_string()),
        r#"{"code":"00","data":{"orderCode":99001}}"#.to_string(),
        t0,
    );
    repo.save(p).await.unwrap();
    let readback = repo.fetch_by_code(99001).await.unwrap();
    assert_eq!(readback.status, PaymentStatus::Paid);
    assert_eq!(readback.transaction_ref.as_deref(), Some("FT230918"));
    assert!(readback.webhook_snapshot.unwrap().contains("orderCode"));
    assert!(readback.paid_time.is_some());
}
