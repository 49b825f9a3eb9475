use fieldmart::api::web::dto::{OrderCreateReqData, OrderLineReqDto};
use fieldmart::model::ProductKind;
use fieldmart::repository::{app_repo_order, app_repo_product};
use fieldmart::usecase::{
    CreateOrderUseCase, UpdateOrderStatusUcOutput, UpdateOrderStatusUseCase,
};
use fieldmart::AppAuthRole;

use super::super::{ut_authed_claim, ut_logctx, ut_setup_datastore};
use super::ut_seed_product;

async fn ut_seed_order(
    ds: std::sync::Arc<fieldmart::AppDataStoreContext>,
    quantity: u32,
) -> String {
    let uc = CreateOrderUseCase {
        repo_order: app_repo_order(ds.clone()).await.unwrap(),
        repo_product: app_repo_product(ds).await.unwrap(),
        auth_claim: ut_authed_claim(124, AppAuthRole::Customer),
        logctx: ut_logctx(),
    };
    let req = OrderCreateReqData {
        lines: vec![OrderLineReqDto {
            product_id: 141,
            kind: ProductKind::Physical,
            quantity,
        }],
        total_amount: (quantity as u64) * 90_000,
        payment_method: "cod".to_string(),
        note: None,
    };
    uc.execute(req).await.ok().unwrap().order_id
}

async fn ut_status_uc(
    ds: std::sync::Arc<fieldmart::AppDataStoreContext>,
    role: AppAuthRole,
) -> UpdateOrderStatusUseCase {
    UpdateOrderStatusUseCase {
        repo_order: app_repo_order(ds.clone()).await.unwrap(),
        repo_product: app_repo_product(ds).await.unwrap(),
        auth_claim: ut_authed_claim(77, role),
        logctx: ut_logctx(),
    }
}

#[tokio::test]
async fn pending_to_success() {
    let ds = ut_setup_datastore(64);
    ut_seed_product(ds.clone(), 141, 5).await;
    let oid = ut_seed_order(ds.clone(), 2).await;
    let uc = ut_status_uc(ds.clone(), AppAuthRole::Admin).await;
    let output = uc.execute(oid, "success".to_string()).await.unwrap();
    let dto = match output {
        UpdateOrderStatusUcOutput::Success(d) => d,
        _others => panic!("expect success"),
    };
    assert_eq!(dto.status.as_str(), "success");
    // completion does NOT give stock back
    let repo_product = app_repo_product(ds).await.unwrap();
    assert_eq!(repo_product.fetch(141).await.unwrap().quantity, 3);
}

#[tokio::test]
async fn cancel_restores_stock() {
    let ds = ut_setup_datastore(64);
    ut_seed_product(ds.clone(), 141, 5).await;
    let oid = ut_seed_order(ds.clone(), 2).await;
    {
        let repo_product = app_repo_product(ds.clone()).await.unwrap();
        assert_eq!(repo_product.fetch(141).await.unwrap().quantity, 3);
    }
    let uc = ut_status_uc(ds.clone(), AppAuthRole::Admin).await;
    let output = uc.execute(oid, "cancel".to_string()).await.unwrap();
    assert!(matches!(output, UpdateOrderStatusUcOutput::Success(_)));
    let repo_product = app_repo_product(ds).await.unwrap();
    assert_eq!(repo_product.fetch(141).await.unwrap().quantity, 5);
}

#[tokio::test]
async fn terminal_state_rejects_update() {
    let ds = ut_setup_datastore(64);
    ut_seed_product(ds.clone(), 141, 5).await;
    let oid = ut_seed_order(ds.clone(), 1).await;
    let uc = ut_status_uc(ds.clone(), AppAuthRole::Admin).await;
    let output = uc
        .execute(oid.clone(), "success".to_string())
        .await
        .unwrap();
    assert!(matches!(output, UpdateOrderStatusUcOutput::Success(_)));
    // success is terminal
    let uc = ut_status_uc(ds.clone(), AppAuthRole::Admin).await;
    let output = uc.execute(oid, "cancel".to_string()).await.unwrap();
    assert!(matches!(
        output,
        UpdateOrderStatusUcOutput::InvalidTransition(_)
    ));
}

#[tokio::test]
async fn non_admin_denied() {
    let ds = ut_setup_datastore(64);
    ut_seed_product(ds.clone(), 141, 5).await;
    let oid = ut_seed_order(ds.clone(), 1).await;
    let uc = ut_status_uc(ds.clone(), AppAuthRole::Customer).await;
    let output = uc.execute(oid, "success".to_string()).await.unwrap();
    assert!(matches!(output, UpdateOrderStatusUcOutput::PermissionDeny));
}

#[tokio::test]
async fn unknown_order_and_bad_label() {
    let ds = ut_setup_datastore(64);
    let uc = ut_status_uc(ds.clone(), AppAuthRole::Admin).await;
    let output = uc
        .execute("no-such-order".to_string(), "success".to_string())
        .await
        .unwrap();
    assert!(matches!(output, UpdateOrderStatusUcOutput::NotFound));

    ut_seed_product(ds.clone(), 141, 5).await;
    let oid = ut_seed_order(ds.clone(), 1).await;
    let uc = ut_status_uc(ds, AppAuthRole::Admin).await;
    let output = uc.execute(oid, "shipped".to_string()).await.unwrap();
    assert!(matches!(
        output,
        UpdateOrderStatusUcOutput::BadStatusLabel(_)
    ));
}
