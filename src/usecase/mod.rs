mod login;
mod maintain_catalog;
mod maintain_facility;
mod manage_booking;
mod manage_order;
mod manage_payment;

pub use login::{LoginUcOutput, LoginUseCase};
pub use maintain_catalog::{
    CatalogUcOutput, CategoryUcOutput, CreateCategoryUseCase, CreateProductUseCase,
    DiscardProductUseCase, EditProductUseCase, ListCategoriesUseCase, ProductCatalogUseCase,
};
pub use maintain_facility::{
    CreateFieldUseCase, CreateSubFieldUseCase, DiscardFieldUseCase, FacilityUcOutput,
    FieldDetailUseCase, ListFieldsUseCase, SubFieldUcOutput, UpdateSubFieldStatusUseCase,
};
pub use manage_booking::{
    BookingSlotsUcOutput, CreateBookingUcOutput, CreateBookingUseCase, ListSlotsUseCase,
};
pub use manage_order::{
    CreateOrderUcError, CreateOrderUseCase, ListOrdersUseCase, OrderDetailUcOutput,
    OrderDetailUseCase, RemoveOrderUseCase, UpdateOrderStatusUcOutput, UpdateOrderStatusUseCase,
};
pub use manage_payment::{
    CancelPaymentUcOutput, CancelPaymentUseCase, CreatePaymentUcError, CreatePaymentUseCase,
    PaymentWebhookUcOutput, PaymentWebhookUseCase,
};
