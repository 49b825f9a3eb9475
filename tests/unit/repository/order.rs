use fieldmart::error::AppErrorCode;
use fieldmart::model::{OrderPaymentMethod, OrderStatus, ProductKind};
use fieldmart::repository::app_repo_order;

use super::super::model::{ut_order, ut_order_line};
use super::super::ut_setup_datastore;

#[tokio::test]
async fn save_fetch_roundtrip() {
    let ds = ut_setup_datastore(64);
    let repo = app_repo_order(ds).await.unwrap();
    let lines = vec![
        ut_order_line(141, ProductKind::Physical, 2),
        ut_order_line(142, ProductKind::Digital, 1),
    ];
    let mut o = ut_order("bee1a5", 124, lines, 215_000, OrderPaymentMethod::Payos);
    o.note = Some("giao buoi sang".to_string());
    repo.create(o.clone()).await.unwrap();
    let readback = repo.fetch("bee1a5").await.unwrap();
    assert_eq!(readback.code, o.code);
    assert_eq!(readback.owner_id, 124);
    assert_eq!(readback.status, OrderStatus::Pending);
    assert_eq!(readback.total_amount, 215_000);
    assert_eq!(readback.payment_method, OrderPaymentMethod::Payos);
    assert_eq!(readback.note.as_deref(), Some("giao buoi sang"));
    assert_eq!(readback.lines.len(), 2);
    assert_eq!(readback.lines, o.lines);
}

#[tokio::test]
async fn list_by_owner() {
    let ds = ut_setup_datastore(64);
    let repo = app_repo_order(ds).await.unwrap();
    let o1 = ut_order("bee1a5", 124, vec![], 0, OrderPaymentMethod::CashOnDelivery);
    let o2 = ut_order("bee1a6", 124, vec![], 0, OrderPaymentMethod::CashOnDelivery);
    let o3 = ut_order("bee1a7", 125, vec![], 0, OrderPaymentMethod::CashOnDelivery);
    for o in [o1, o2, o3] {
        repo.create(o).await.unwrap();
    }
    let mine = repo.fetch_all_by_owner(124).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|o| o.owner_id == 124));
}

#[tokio::test]
async fn status_persists() {
    let ds = ut_setup_datastore(64);
    let repo = app_repo_order(ds).await.unwrap();
    let mut o = ut_order("bee1a5", 124, vec![], 0, OrderPaymentMethod::CashOnDelivery);
    repo.create(o.clone()).await.unwrap();
    o.try_transit(OrderStatus::Success).unwrap();
    repo.save(o).await.unwrap();
    let readback = repo.fetch("bee1a5").await.unwrap();
    assert_eq!(readback.status, OrderStatus::Success);
}

#[tokio::test]
async fn hard_delete() {
    let ds = ut_setup_datastore(64);
    let repo = app_repo_order(ds).await.unwrap();
    let o = ut_order("bee1a5", 124, vec![], 0, OrderPaymentMethod::CashOnDelivery);
    repo.create(o).await.unwrap();
    repo.delete("bee1a5").await.unwrap();
    let e = repo.fetch("bee1a5").await.unwrap_err();
    assert_eq!(e.code, AppErrorCode::OrderNotExist);
}
