mod booking;
mod field;
mod order;
mod payment;
mod product;

pub use booking::{BookingModel, BookingStatus, SlotOccupancyModel, DAILY_SLOT_LABELS};
pub use field::{FieldModel, SubFieldModel, SubFieldStatus};
pub use order::{OrderLineModel, OrderModel, OrderPaymentMethod, OrderStatus};
pub use payment::{PaymentModel, PaymentStatus};
pub use product::{CategoryModel, ProductKind, ProductModel};
