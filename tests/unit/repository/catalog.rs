use fieldmart::error::AppErrorCode;
use fieldmart::model::{OrderModel, OrderPaymentMethod, ProductKind, ProductModel};
use fieldmart::repository::{app_repo_product, AppProductRepoReserveReturn};

use super::super::model::{ut_order, ut_order_line, ut_product};
use super::super::ut_setup_datastore;

fn reserve_cb(ms: &mut Vec<ProductModel>, req: &OrderModel) -> AppProductRepoReserveReturn {
    for (pid, qty) in req.physical_reservations() {
        let p = ms.iter_mut().find(|p| p.id_ == pid).unwrap();
        if p.reserve(qty).is_err() {
            return Err(Ok(vec![]));
        }
    }
    Ok(())
}

fn give_back_cb(ms: &mut Vec<ProductModel>, req: &OrderModel) {
    for (pid, qty) in req.physical_reservations() {
        if let Some(p) = ms.iter_mut().find(|p| p.id_ == pid) {
            p.give_back(qty);
        }
    }
}

#[tokio::test]
async fn create_fetch_roundtrip() {
    let ds = ut_setup_datastore(64);
    let repo = app_repo_product(ds).await.unwrap();
    let item = ut_product(141, 5);
    repo.create(item.clone()).await.unwrap();
    let readback = repo.fetch(141).await.unwrap();
    assert_eq!(readback, item);
    let e = repo.fetch(999).await.unwrap_err();
    assert_eq!(e.code, AppErrorCode::ProductNotExist);
}

#[tokio::test]
async fn duplicate_name_rejected() {
    let ds = ut_setup_datastore(64);
    let repo = app_repo_product(ds).await.unwrap();
    let item = ut_product(141, 5);
    repo.create(item).await.unwrap();
    let mut clash = ut_product(142, 3);
    clash.name = ut_product(141, 5).name;
    let e = repo.create(clash).await.unwrap_err();
    assert_eq!(e.code, AppErrorCode::DuplicateKey);
}

#[tokio::test]
async fn duplicate_name_allowed_after_discard() {
    let ds = ut_setup_datastore(64);
    let repo = app_repo_product(ds).await.unwrap();
    let mut item = ut_product(141, 5);
    item.is_deleted = true;
    repo.create(item).await.unwrap();
    let clash = ut_product(142, 3);
    // same generated name template differs by id, align them explicitly
    let mut clash2 = clash;
    clash2.name = ut_product(141, 5).name;
    assert!(repo.create(clash2).await.is_ok());
}

#[tokio::test]
async fn reserve_decrements_quantity() {
    let ds = ut_setup_datastore(64);
    let repo = app_repo_product(ds).await.unwrap();
    repo.create(ut_product(141, 5)).await.unwrap();
    let order = ut_order(
        "bee1a5",
        124,
        vec![ut_order_line(141, ProductKind::Physical, 2)],
        180_000,
        OrderPaymentMethod::CashOnDelivery,
    );
    let result = repo.try_reserve(reserve_cb, &order).await;
    assert!(result.is_ok());
    let readback = repo.fetch(141).await.unwrap();
    assert_eq!(readback.quantity, 3);
}

#[tokio::test]
async fn reserve_failure_keeps_quantity() {
    let ds = ut_setup_datastore(64);
    let repo = app_repo_product(ds).await.unwrap();
    repo.create(ut_product(141, 5)).await.unwrap();
    let order = ut_order(
        "bee1a5",
        124,
        vec![ut_order_line(141, ProductKind::Physical, 9)],
        810_000,
        OrderPaymentMethod::CashOnDelivery,
    );
    let result = repo.try_reserve(reserve_cb, &order).await;
    assert!(result.is_err());
    let readback = repo.fetch(141).await.unwrap();
    assert_eq!(readback.quantity, 5);
}

#[tokio::test]
async fn return_restores_quantity() {
    let ds = ut_setup_datastore(64);
    let repo = app_repo_product(ds).await.unwrap();
    repo.create(ut_product(141, 5)).await.unwrap();
    let order = ut_order(
        "bee1a5",
        124,
        vec![ut_order_line(141, ProductKind::Physical, 4)],
        360_000,
        OrderPaymentMethod::CashOnDelivery,
    );
    repo.try_reserve(reserve_cb, &order).await.unwrap();
    assert_eq!(repo.fetch(141).await.unwrap().quantity, 1);
    repo.try_return(give_back_cb, &order).await.unwrap();
    assert_eq!(repo.fetch(141).await.unwrap().quantity, 5);
}
