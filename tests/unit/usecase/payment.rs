use std::sync::Arc;

use serde_json::json;

use fieldmart::adapter::processor::payos::{canonical_json, hmac_sha256_hex};
use fieldmart::api::web::dto::{OrderCreateReqData, OrderLineReqDto, PaymentCreateReqDto};
use fieldmart::model::{OrderPaymentMethod, OrderStatus, PaymentStatus, ProductKind};
use fieldmart::repository::{app_repo_order, app_repo_payment, app_repo_product};
use fieldmart::usecase::{
    CancelPaymentUcOutput, CancelPaymentUseCase, CreateOrderUseCase, CreatePaymentUcError,
    CreatePaymentUseCase, PaymentWebhookUcOutput, PaymentWebhookUseCase,
};
use fieldmart::{AppAuthRole, AppDataStoreContext};

use super::super::model::ut_order;
use super::super::{ut_authed_claim, ut_logctx, ut_setup_datastore};
use super::{ut_processor_ctx, ut_seed_product, UT_CHECKSUM_KEY};

const UT_RETURN_URL: &str = "https://shop.example/payment/success";
const UT_CANCEL_URL: &str = "https://shop.example/payment/cancel";

async fn ut_payment_uc(
    ds: Arc<AppDataStoreContext>,
    owner: u32,
    decline: Option<String>,
) -> CreatePaymentUseCase {
    CreatePaymentUseCase {
        repo_order: app_repo_order(ds.clone()).await.unwrap(),
        repo_payment: app_repo_payment(ds).await.unwrap(),
        processors: ut_processor_ctx(decline),
        auth_claim: ut_authed_claim(owner, AppAuthRole::Customer),
        return_url: UT_RETURN_URL.to_string(),
        cancel_url: UT_CANCEL_URL.to_string(),
        logctx: ut_logctx(),
    }
}

// persist a pending gateway order without touching stock
async fn ut_seed_gateway_order(ds: Arc<AppDataStoreContext>, oid: &str, owner: u32, total: u64) {
    let repo = app_repo_order(ds).await.unwrap();
    let o = ut_order(oid, owner, vec![], total, OrderPaymentMethod::Payos);
    repo.create(o).await.unwrap();
}

#[tokio::test]
async fn create_link_ok_then_conflict() {
    let ds = ut_setup_datastore(64);
    ut_seed_gateway_order(ds.clone(), "bee1a5", 124, 180_000).await;
    let uc = ut_payment_uc(ds.clone(), 124, None).await;
    let req = PaymentCreateReqDto {
        order_id: "bee1a5".to_string(),
        description: None,
    };
    let dto = uc.execute(req).await.ok().unwrap();
    assert_eq!(dto.order_id.as_str(), "bee1a5");
    assert_eq!(dto.amount, 180_000);
    assert_eq!(dto.status.as_str(), "PENDING");
    assert!(dto
        .checkout_url
        .contains(dto.gateway_code.to_string().as_str()));

    // one payment per order
    let uc = ut_payment_uc(ds, 124, None).await;
    let req = PaymentCreateReqDto {
        order_id: "bee1a5".to_string(),
        description: None,
    };
    let result = uc.execute(req).await;
    assert!(matches!(result, Err(CreatePaymentUcError::AlreadyExists(_))));
}

#[tokio::test]
async fn create_link_client_rejections() {
    let ds = ut_setup_datastore(64);
    ut_seed_gateway_order(ds.clone(), "bee1a5", 124, 180_000).await;

    // missing order
    let uc = ut_payment_uc(ds.clone(), 124, None).await;
    let result = uc
        .execute(PaymentCreateReqDto {
            order_id: "no-such".to_string(),
            description: None,
        })
        .await;
    assert!(matches!(result, Err(CreatePaymentUcError::OrderNotFound)));

    // someone else's order
    let uc = ut_payment_uc(ds.clone(), 125, None).await;
    let result = uc
        .execute(PaymentCreateReqDto {
            order_id: "bee1a5".to_string(),
            description: None,
        })
        .await;
    assert!(matches!(result, Err(CreatePaymentUcError::OwnerMismatch)));

    // cash order never reaches the gateway
    {
        let repo = app_repo_order(ds.clone()).await.unwrap();
        let o = ut_order(
            "bee1a6",
            124,
            vec![],
            90_000,
            OrderPaymentMethod::CashOnDelivery,
        );
        repo.create(o).await.unwrap();
    }
    let uc = ut_payment_uc(ds.clone(), 124, None).await;
    let result = uc
        .execute(PaymentCreateReqDto {
            order_id: "bee1a6".to_string(),
            description: None,
        })
        .await;
    assert!(matches!(
        result,
        Err(CreatePaymentUcError::MethodNotGateway(_))
    ));
}

#[tokio::test]
async fn create_link_amount_window_checked_before_gateway() {
    let ds = ut_setup_datastore(64);
    ut_seed_gateway_order(ds.clone(), "bee1a5", 124, 600_000_000).await;
    // decline set, yet the amount check must fire first
    let uc = ut_payment_uc(ds.clone(), 124, Some("must-not-reach".to_string())).await;
    let result = uc
        .execute(PaymentCreateReqDto {
            order_id: "bee1a5".to_string(),
            description: None,
        })
        .await;
    assert!(matches!(
        result,
        Err(CreatePaymentUcError::AmountOutOfRange(_))
    ));
    // nothing persisted
    let repo_payment = app_repo_payment(ds).await.unwrap();
    assert!(repo_payment
        .fetch_by_order("bee1a5")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn create_link_gateway_decline_surfaced() {
    let ds = ut_setup_datastore(64);
    ut_seed_gateway_order(ds.clone(), "bee1a5", 124, 180_000).await;
    let uc = ut_payment_uc(ds.clone(), 124, Some("merchant not onboarded".to_string())).await;
    let result = uc
        .execute(PaymentCreateReqDto {
            order_id: "bee1a5".to_string(),
            description: None,
        })
        .await;
    match result {
        Err(CreatePaymentUcError::GatewayDecline(desc)) => {
            assert_eq!(desc.as_str(), "merchant not onboarded");
        }
        _others => panic!("expect gateway decline"),
    }
    let repo_payment = app_repo_payment(ds).await.unwrap();
    assert!(repo_payment
        .fetch_by_order("bee1a5")
        .await
        .unwrap()
        .is_none());
}

fn ut_signed_webhook(gateway_code: i64, inner_code: &str, key: &str) -> serde_json::Value {
    let mut payload = json!({
        "code": "00",
        "desc": "success",
        "data": {
            "orderCode": gateway_code,
            "amount": 180000,
            "code": inner_code,
            "desc": "giao dich",
            "reference": "FT230918",
        },
    });
    let base = canonical_json(&payload);
    let sig = hmac_sha256_hex(base.as_str(), key).unwrap();
    payload
        .as_object_mut()
        .unwrap()
        .insert("signature".to_string(), json!(sig));
    payload
}

async fn ut_webhook_uc(ds: Arc<AppDataStoreContext>) -> PaymentWebhookUseCase {
    PaymentWebhookUseCase {
        repo_payment: app_repo_payment(ds.clone()).await.unwrap(),
        repo_order: app_repo_order(ds).await.unwrap(),
        processors: ut_processor_ctx(None),
        logctx: ut_logctx(),
    }
}

async fn ut_seed_payment(ds: Arc<AppDataStoreContext>, oid: &str, owner: u32) -> i64 {
    ut_seed_gateway_order(ds.clone(), oid, owner, 180_000).await;
    let uc = ut_payment_uc(ds, owner, None).await;
    let dto = uc
        .execute(PaymentCreateReqDto {
            order_id: oid.to_string(),
            description: None,
        })
        .await
        .ok()
        .unwrap();
    dto.gateway_code
}

#[tokio::test]
async fn webhook_success_marks_paid_and_completes_order() {
    let ds = ut_setup_datastore(64);
    let code = ut_seed_payment(ds.clone(), "bee1a5", 124).await;
    let uc = ut_webhook_uc(ds.clone()).await;
    let payload = ut_signed_webhook(code, "00", UT_CHECKSUM_KEY);
    let output = uc.execute(payload).await.unwrap();
    let dto = match output {
        PaymentWebhookUcOutput::Processed(d) => d,
        _others => panic!("expect processed"),
    };
    assert_eq!(dto.status.as_str(), "PAID");
    let repo_payment = app_repo_payment(ds.clone()).await.unwrap();
    let saved = repo_payment.fetch_by_code(code).await.unwrap();
    assert_eq!(saved.status, PaymentStatus::Paid);
    assert_eq!(saved.transaction_ref.as_deref(), Some("FT230918"));
    let repo_order = app_repo_order(ds).await.unwrap();
    assert_eq!(
        repo_order.fetch("bee1a5").await.unwrap().status,
        OrderStatus::Success
    );
}

#[tokio::test]
async fn webhook_duplicate_delivery_is_harmless() {
    let ds = ut_setup_datastore(64);
    let code = ut_seed_payment(ds.clone(), "bee1a5", 124).await;
    let payload = ut_signed_webhook(code, "00", UT_CHECKSUM_KEY);
    let uc = ut_webhook_uc(ds.clone()).await;
    let output = uc.execute(payload.clone()).await.unwrap();
    assert!(matches!(output, PaymentWebhookUcOutput::Processed(_)));
    // same delivery again reapplies the same state
    let uc = ut_webhook_uc(ds.clone()).await;
    let output = uc.execute(payload).await.unwrap();
    assert!(matches!(output, PaymentWebhookUcOutput::Processed(_)));
    let repo_payment = app_repo_payment(ds.clone()).await.unwrap();
    assert_eq!(
        repo_payment.fetch_by_code(code).await.unwrap().status,
        PaymentStatus::Paid
    );
    let repo_order = app_repo_order(ds).await.unwrap();
    assert_eq!(
        repo_order.fetch("bee1a5").await.unwrap().status,
        OrderStatus::Success
    );
}

#[tokio::test]
async fn webhook_failure_code_marks_failed_only() {
    let ds = ut_setup_datastore(64);
    let code = ut_seed_payment(ds.clone(), "bee1a5", 124).await;
    let uc = ut_webhook_uc(ds.clone()).await;
    let payload = ut_signed_webhook(code, "07", UT_CHECKSUM_KEY);
    let output = uc.execute(payload).await.unwrap();
    assert!(matches!(output, PaymentWebhookUcOutput::Processed(_)));
    let repo_payment = app_repo_payment(ds.clone()).await.unwrap();
    assert_eq!(
        repo_payment.fetch_by_code(code).await.unwrap().status,
        PaymentStatus::Failed
    );
    // the order stays pending
    let repo_order = app_repo_order(ds).await.unwrap();
    assert_eq!(
        repo_order.fetch("bee1a5").await.unwrap().status,
        OrderStatus::Pending
    );
}

#[tokio::test]
async fn webhook_rejects_tampered_signature() {
    let ds = ut_setup_datastore(64);
    let code = ut_seed_payment(ds.clone(), "bee1a5", 124).await;
    let mut payload = ut_signed_webhook(code, "00", UT_CHECKSUM_KEY);
    payload["data"]["amount"] = json!(1);
    let uc = ut_webhook_uc(ds.clone()).await;
    let output = uc.execute(payload).await.unwrap();
    assert!(matches!(output, PaymentWebhookUcOutput::InvalidSignature));
    let repo_payment = app_repo_payment(ds).await.unwrap();
    assert_eq!(
        repo_payment.fetch_by_code(code).await.unwrap().status,
        PaymentStatus::Pending
    );
}

#[tokio::test]
async fn webhook_unknown_order_code() {
    let ds = ut_setup_datastore(64);
    let _seeded = ut_seed_payment(ds.clone(), "bee1a5", 124).await;
    let uc = ut_webhook_uc(ds).await;
    let payload = ut_signed_webhook(4_444_333, "00", UT_CHECKSUM_KEY);
    let output = uc.execute(payload).await.unwrap();
    assert!(matches!(
        output,
        PaymentWebhookUcOutput::PaymentNotFound(4_444_333)
    ));
}

#[tokio::test]
async fn cancel_payment_cascades_to_order_and_stock() {
    let ds = ut_setup_datastore(64);
    ut_seed_product(ds.clone(), 141, 5).await;
    // gateway order with a real stock claim this time
    let oid = {
        let uc = CreateOrderUseCase {
            repo_order: app_repo_order(ds.clone()).await.unwrap(),
            repo_product: app_repo_product(ds.clone()).await.unwrap(),
            auth_claim: ut_authed_claim(124, AppAuthRole::Customer),
            logctx: ut_logctx(),
        };
        let req = OrderCreateReqData {
            lines: vec![OrderLineReqDto {
                product_id: 141,
                kind: ProductKind::Physical,
                quantity: 2,
            }],
            total_amount: 180_000,
            payment_method: "payos".to_string(),
            note: None,
        };
        uc.execute(req).await.ok().unwrap().order_id
    };
    let uc = ut_payment_uc(ds.clone(), 124, None).await;
    let code = uc
        .execute(PaymentCreateReqDto {
            order_id: oid.clone(),
            description: None,
        })
        .await
        .ok()
        .unwrap()
        .gateway_code;

    let uc = CancelPaymentUseCase {
        repo_payment: app_repo_payment(ds.clone()).await.unwrap(),
        repo_order: app_repo_order(ds.clone()).await.unwrap(),
        repo_product: app_repo_product(ds.clone()).await.unwrap(),
        auth_claim: ut_authed_claim(124, AppAuthRole::Customer),
    };
    let output = uc.execute(code).await.unwrap();
    assert!(matches!(output, CancelPaymentUcOutput::Success(_)));
    let repo_payment = app_repo_payment(ds.clone()).await.unwrap();
    assert_eq!(
        repo_payment.fetch_by_code(code).await.unwrap().status,
        PaymentStatus::Cancelled
    );
    let repo_order = app_repo_order(ds.clone()).await.unwrap();
    assert_eq!(
        repo_order.fetch(oid.as_str()).await.unwrap().status,
        OrderStatus::Cancel
    );
    let repo_product = app_repo_product(ds).await.unwrap();
    assert_eq!(repo_product.fetch(141).await.unwrap().quantity, 5);
}

#[tokio::test]
async fn cancel_paid_payment_refused() {
    let ds = ut_setup_datastore(64);
    let code = ut_seed_payment(ds.clone(), "bee1a5", 124).await;
    let uc = ut_webhook_uc(ds.clone()).await;
    let payload = ut_signed_webhook(code, "00", UT_CHECKSUM_KEY);
    let _output = uc.execute(payload).await.unwrap();

    let uc = CancelPaymentUseCase {
        repo_payment: app_repo_payment(ds.clone()).await.unwrap(),
        repo_order: app_repo_order(ds.clone()).await.unwrap(),
        repo_product: app_repo_product(ds).await.unwrap(),
        auth_claim: ut_authed_claim(124, AppAuthRole::Customer),
    };
    let output = uc.execute(code).await.unwrap();
    assert!(matches!(output, CancelPaymentUcOutput::NotCancellable(_)));
}
