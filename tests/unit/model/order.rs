use fieldmart::api::web::dto::{OrderLineCreateErrorReason, OrderLineReqDto};
use fieldmart::error::AppErrorCode;
use fieldmart::model::{OrderModel, OrderPaymentMethod, OrderStatus, ProductKind};

use super::{ut_order, ut_order_line, ut_product};

#[test]
fn status_transit_ok() {
    let line = ut_order_line(141, ProductKind::Physical, 2);
    let mut o = ut_order(
        "bee1a5",
        124,
        vec![line],
        180_000,
        OrderPaymentMethod::CashOnDelivery,
    );
    let result = o.try_transit(OrderStatus::Success);
    assert!(result.is_ok());
    assert_eq!(o.status, OrderStatus::Success);

    let mut o2 = ut_order(
        "bee1a6",
        124,
        vec![],
        0,
        OrderPaymentMethod::CashOnDelivery,
    );
    let result = o2.try_transit(OrderStatus::Cancel);
    assert!(result.is_ok());
    assert_eq!(o2.status, OrderStatus::Cancel);
}

#[test]
fn status_terminal_states_locked() {
    let cases = [
        (OrderStatus::Success, OrderStatus::Cancel),
        (OrderStatus::Success, OrderStatus::Pending),
        (OrderStatus::Cancel, OrderStatus::Success),
        (OrderStatus::Cancel, OrderStatus::Pending),
        (OrderStatus::Pending, OrderStatus::Pending),
    ];
    for (given, attempt) in cases {
        let mut o = ut_order(
            "bee1a7",
            124,
            vec![],
            0,
            OrderPaymentMethod::CashOnDelivery,
        );
        o.status = given.clone();
        let result = o.try_transit(attempt);
        let e = result.unwrap_err();
        assert_eq!(e.code, AppErrorCode::InvalidStatusTransition);
        assert_eq!(o.status, given);
    }
}

#[test]
fn generated_code_format() {
    let code = OrderModel::generate_code(1_696_579_200_987);
    assert!(code.starts_with("ORD-987"));
    let tail = &code[4..];
    assert!(tail.chars().all(|c| c.is_ascii_digit()));
    assert!(tail.len() >= 4 && tail.len() <= 6);
}

#[test]
fn validate_lines_ok() {
    let products = vec![ut_product(141, 5), ut_product(142, 0)];
    let data = vec![
        OrderLineReqDto {
            product_id: 141,
            kind: ProductKind::Physical,
            quantity: 2,
        },
        OrderLineReqDto {
            product_id: 142,
            kind: ProductKind::Digital,
            quantity: 1,
        },
    ];
    let lines = OrderModel::validate_lines(data, &products).unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].unit_price, 90_000);
    assert_eq!(lines[0].quantity, 2);
    assert_eq!(lines[1].unit_price, 35_000);
}

#[test]
fn validate_lines_digital_qty_must_be_one() {
    let products = vec![ut_product(141, 5)];
    let data = vec![OrderLineReqDto {
        product_id: 141,
        kind: ProductKind::Digital,
        quantity: 3,
    }];
    let errors = OrderModel::validate_lines(data, &products).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0].reason,
        OrderLineCreateErrorReason::DigitalQuantityNotOne
    ));
    assert_eq!(errors[0].requested, Some(3));
}

#[test]
fn validate_lines_shortage_reported() {
    let products = vec![ut_product(141, 5)];
    let data = vec![OrderLineReqDto {
        product_id: 141,
        kind: ProductKind::Physical,
        quantity: 9,
    }];
    let errors = OrderModel::validate_lines(data, &products).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0].reason,
        OrderLineCreateErrorReason::OutOfStock
    ));
    assert_eq!(errors[0].available, Some(5));
    assert_eq!(errors[0].requested, Some(9));
}

#[test]
fn validate_lines_missing_and_discarded_product() {
    let mut gone = ut_product(143, 5);
    gone.is_deleted = true;
    let products = vec![gone];
    let data = vec![
        OrderLineReqDto {
            product_id: 143,
            kind: ProductKind::Physical,
            quantity: 1,
        },
        OrderLineReqDto {
            product_id: 999,
            kind: ProductKind::Physical,
            quantity: 1,
        },
    ];
    let errors = OrderModel::validate_lines(data, &products).unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .all(|e| matches!(e.reason, OrderLineCreateErrorReason::NotExist)));
}

#[test]
fn physical_reservations_skip_digital() {
    let lines = vec![
        ut_order_line(141, ProductKind::Physical, 2),
        ut_order_line(142, ProductKind::Digital, 1),
        ut_order_line(144, ProductKind::Physical, 4),
    ];
    let o = ut_order(
        "bee1a8",
        124,
        lines,
        500_000,
        OrderPaymentMethod::Payos,
    );
    let rsv = o.physical_reservations();
    assert_eq!(rsv, vec![(141u64, 2u32), (144u64, 4u32)]);
}
