use chrono::Local as LocalTime;

use fieldmart::error::AppErrorCode;
use fieldmart::model::{PaymentModel, PaymentStatus};

pub(crate) fn ut_payment(gateway_code: i64, order_id: &str, owner_id: u32, amount: u64) -> PaymentModel {
    PaymentModel {
        gateway_code,
        order_id: order_id.to_string(),
        owner_id,
        amount,
        status: PaymentStatus::Pending,
        link_id: format!("plink-{gateway_code}"),
        checkout_url: format!("https://pay.gateway.test/web/{gateway_code}"),
        qr_code: "00020101-utest".to_string(),
        expired_time: None,
        transaction_ref: None,
        webhook_snapshot: None,
        paid_time: None,
        create_time: LocalTime::now().fixed_offset(),
    }
}

#[test]
fn amount_window() {
    assert!(PaymentModel::validate_amount(1).is_ok());
    assert!(PaymentModel::validate_amount(500_000_000).is_ok());
    let e = PaymentModel::validate_amount(0).unwrap_err();
    assert_eq!(e.code, AppErrorCode::InvalidInput);
    let e = PaymentModel::validate_amount(500_000_001).unwrap_err();
    assert_eq!(e.code, AppErrorCode::InvalidInput);
}

#[test]
fn mark_paid_keeps_snapshot() {
    let mut p = ut_payment(99001, "bee1a5", 124, 180_000);
    let t0 = LocalTime::now().fixed_offset();
    p.mark_paid(
        Some("FT230918".to_string()),
        r#"{"code":"00"}"#.to_string(),
        t0,
    );
    assert_eq!(p.status, PaymentStatus::Paid);
    assert_eq!(p.transaction_ref.as_deref(), Some("FT230918"));
    assert_eq!(p.paid_time, Some(t0));
    assert!(p.webhook_snapshot.is_some());
}

#[test]
fn mark_failed() {
    let mut p = ut_payment(99002, "bee1a5", 124, 180_000);
    p.mark_failed(r#"{"code":"07"}"#.to_string());
    assert_eq!(p.status, PaymentStatus::Failed);
    assert!(p.paid_time.is_none());
}

#[test]
fn cancel_only_from_pending() {
    let mut p = ut_payment(99003, "bee1a5", 124, 180_000);
    assert!(p.try_cancel().is_ok());
    assert_eq!(p.status, PaymentStatus::Cancelled);

    for frozen in [
        PaymentStatus::Paid,
        PaymentStatus::Cancelled,
        PaymentStatus::Failed,
        PaymentStatus::Refunded,
    ] {
        let mut p = ut_payment(99004, "bee1a5", 124, 180_000);
        p.status = frozen.clone();
        let e = p.try_cancel().unwrap_err();
        assert_eq!(e.code, AppErrorCode::InvalidStatusTransition);
        assert_eq!(p.status, frozen);
    }
}
