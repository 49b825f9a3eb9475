use fieldmart::api::web::dto::{OrderCreateReqData, OrderLineCreateErrorReason, OrderLineReqDto};
use fieldmart::model::ProductKind;
use fieldmart::repository::{app_repo_order, app_repo_product};
use fieldmart::usecase::{CreateOrderUcError, CreateOrderUseCase};
use fieldmart::AppAuthRole;

use super::super::{ut_authed_claim, ut_logctx, ut_setup_datastore};
use super::ut_seed_product;

fn ut_req(lines: Vec<OrderLineReqDto>, total: u64, method: &str) -> OrderCreateReqData {
    OrderCreateReqData {
        lines,
        total_amount: total,
        payment_method: method.to_string(),
        note: None,
    }
}

#[tokio::test]
async fn create_ok_decrements_stock() {
    let ds = ut_setup_datastore(64);
    ut_seed_product(ds.clone(), 141, 5).await;
    let uc = CreateOrderUseCase {
        repo_order: app_repo_order(ds.clone()).await.unwrap(),
        repo_product: app_repo_product(ds.clone()).await.unwrap(),
        auth_claim: ut_authed_claim(124, AppAuthRole::Customer),
        logctx: ut_logctx(),
    };
    let req = ut_req(
        vec![OrderLineReqDto {
            product_id: 141,
            kind: ProductKind::Physical,
            quantity: 2,
        }],
        180_000,
        "cod",
    );
    let dto = uc.execute(req).await.ok().unwrap();
    assert_eq!(dto.status.as_str(), "pending");
    assert_eq!(dto.owner_id, 124);
    assert!(dto.code.starts_with("ORD-"));
    assert_eq!(dto.lines.len(), 1);
    assert_eq!(dto.lines[0].unit_price, 90_000);
    // stock moved 5 -> 3
    let repo_product = app_repo_product(ds).await.unwrap();
    let readback = repo_product.fetch(141).await.unwrap();
    assert_eq!(readback.quantity, 3);
}

#[tokio::test]
async fn create_rejects_digital_quantity() {
    let ds = ut_setup_datastore(64);
    ut_seed_product(ds.clone(), 141, 5).await;
    let uc = CreateOrderUseCase {
        repo_order: app_repo_order(ds.clone()).await.unwrap(),
        repo_product: app_repo_product(ds.clone()).await.unwrap(),
        auth_claim: ut_authed_claim(124, AppAuthRole::Customer),
        logctx: ut_logctx(),
    };
    let req = ut_req(
        vec![OrderLineReqDto {
            product_id: 141,
            kind: ProductKind::Digital,
            quantity: 2,
        }],
        70_000,
        "cod",
    );
    let result = uc.execute(req).await;
    let errors = match result {
        Err(CreateOrderUcError::ReqContent(es)) => es,
        _others => panic!("expect client error"),
    };
    assert!(matches!(
        errors[0].reason,
        OrderLineCreateErrorReason::DigitalQuantityNotOne
    ));
    // nothing was claimed
    let repo_product = app_repo_product(ds).await.unwrap();
    assert_eq!(repo_product.fetch(141).await.unwrap().quantity, 5);
}

#[tokio::test]
async fn create_rejects_shortage_without_mutation() {
    let ds = ut_setup_datastore(64);
    ut_seed_product(ds.clone(), 141, 5).await;
    let uc = CreateOrderUseCase {
        repo_order: app_repo_order(ds.clone()).await.unwrap(),
        repo_product: app_repo_product(ds.clone()).await.unwrap(),
        auth_claim: ut_authed_claim(124, AppAuthRole::Customer),
        logctx: ut_logctx(),
    };
    let req = ut_req(
        vec![OrderLineReqDto {
            product_id: 141,
            kind: ProductKind::Physical,
            quantity: 9,
        }],
        810_000,
        "cod",
    );
    let result = uc.execute(req).await;
    let errors = match result {
        Err(CreateOrderUcError::ReqContent(es)) => es,
        _others => panic!("expect client error"),
    };
    assert!(matches!(
        errors[0].reason,
        OrderLineCreateErrorReason::OutOfStock
    ));
    assert_eq!(errors[0].available, Some(5));
    assert_eq!(errors[0].requested, Some(9));
    let repo_product = app_repo_product(ds).await.unwrap();
    assert_eq!(repo_product.fetch(141).await.unwrap().quantity, 5);
}

#[tokio::test]
async fn create_rejects_unknown_product() {
    let ds = ut_setup_datastore(64);
    let uc = CreateOrderUseCase {
        repo_order: app_repo_order(ds.clone()).await.unwrap(),
        repo_product: app_repo_product(ds).await.unwrap(),
        auth_claim: ut_authed_claim(124, AppAuthRole::Customer),
        logctx: ut_logctx(),
    };
    let req = ut_req(
        vec![OrderLineReqDto {
            product_id: 999,
            kind: ProductKind::Physical,
            quantity: 1,
        }],
        90_000,
        "cod",
    );
    let result = uc.execute(req).await;
    let errors = match result {
        Err(CreateOrderUcError::ReqContent(es)) => es,
        _others => panic!("expect client error"),
    };
    assert!(matches!(
        errors[0].reason,
        OrderLineCreateErrorReason::NotExist
    ));
}

#[tokio::test]
async fn create_rejects_unknown_payment_method() {
    let ds = ut_setup_datastore(64);
    ut_seed_product(ds.clone(), 141, 5).await;
    let uc = CreateOrderUseCase {
        repo_order: app_repo_order(ds.clone()).await.unwrap(),
        repo_product: app_repo_product(ds).await.unwrap(),
        auth_claim: ut_authed_claim(124, AppAuthRole::Customer),
        logctx: ut_logctx(),
    };
    let req = ut_req(
        vec![OrderLineReqDto {
            product_id: 141,
            kind: ProductKind::Physical,
            quantity: 1,
        }],
        90_000,
        "paypal",
    );
    let result = uc.execute(req).await;
    assert!(matches!(
        result,
        Err(CreateOrderUcError::InvalidPaymentMethod(_))
    ));
}
