pub(crate) mod booking;
mod order;
pub(crate) mod payment;

use chrono::Local as LocalTime;

use fieldmart::model::{
    OrderLineModel, OrderModel, OrderPaymentMethod, OrderStatus, ProductKind, ProductModel,
};

pub(crate) fn ut_product(id_: u64, quantity: u32) -> ProductModel {
    ProductModel {
        id_,
        name: format!("handmade keeper glove {id_}"),
        category_id: 1401,
        digital_price: 35_000,
        physical_price: 90_000,
        quantity,
        available: true,
        is_deleted: false,
        is_create: true,
    }
}

pub(crate) fn ut_order(
    oid: &str,
    owner_id: u32,
    lines: Vec<OrderLineModel>,
    total_amount: u64,
    payment_method: OrderPaymentMethod,
) -> OrderModel {
    OrderModel {
        id_: oid.to_string(),
        code: OrderModel::generate_code(1_696_579_200_000),
        owner_id,
        lines,
        status: OrderStatus::Pending,
        total_amount,
        payment_method,
        note: None,
        create_time: LocalTime::now().fixed_offset(),
    }
}

pub(crate) fn ut_order_line(product_id: u64, kind: ProductKind, quantity: u32) -> OrderLineModel {
    OrderLineModel {
        product_id,
        kind,
        quantity,
        unit_price: 90_000,
    }
}
