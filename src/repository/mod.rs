mod in_mem;

use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;

use crate::api::web::dto::OrderLineCreateErrorDto;
use crate::error::{AppError, AppErrorCode};
use crate::model::{
    BookingModel, CategoryModel, FieldModel, OrderModel, PaymentModel, ProductModel, SubFieldModel,
};
use crate::AppDataStoreContext;

// make in-memory repo visible only for testing purpose
pub use in_mem::booking::BookingInMemRepo;
pub use in_mem::catalog::{CategoryInMemRepo, ProductInMemRepo};
pub use in_mem::facility::FieldInMemRepo;
pub use in_mem::order::OrderInMemRepo;
pub use in_mem::payment::PaymentInMemRepo;

// the repository instance may be used across an await,
// the future created by app callers has to be able to pass to different threads
// , it is the reason to add `Send` and `Sync` as super-traits

pub type AppProductRepoReserveReturn =
    DefaultResult<(), DefaultResult<Vec<OrderLineCreateErrorDto>, AppError>>;

pub type AppProductRepoReserveUserFunc =
    fn(&mut Vec<ProductModel>, &OrderModel) -> AppProductRepoReserveReturn;

// if the function pointer type is declared directly in function signature of a
// trait method, the function pointer will be viewed as closure block
pub type AppProductRepoReturnUserFunc = fn(&mut Vec<ProductModel>, &OrderModel);

#[async_trait]
pub trait AbsProductRepo: Sync + Send {
    async fn create(&self, item: ProductModel) -> DefaultResult<(), AppError>;
    async fn fetch(&self, id: u64) -> DefaultResult<ProductModel, AppError>;
    async fn fetch_many(&self, ids: Vec<u64>) -> DefaultResult<Vec<ProductModel>, AppError>;
    async fn fetch_all(&self) -> DefaultResult<Vec<ProductModel>, AppError>;
    async fn fetch_by_name(&self, name: &str) -> DefaultResult<Vec<ProductModel>, AppError>;
    async fn save(&self, item: ProductModel) -> DefaultResult<(), AppError>;
    // stock claim for every physical line of one order, the callback runs
    // while the datastore rows stay locked so the claim is atomic
    async fn try_reserve(
        &self,
        cb: AppProductRepoReserveUserFunc,
        order: &OrderModel,
    ) -> AppProductRepoReserveReturn;
    // give reserved copies back when an order turns cancelled
    async fn try_return(
        &self,
        cb: AppProductRepoReturnUserFunc,
        order: &OrderModel,
    ) -> DefaultResult<(), AppError>;
} // end of trait AbsProductRepo

#[async_trait]
pub trait AbsCategoryRepo: Sync + Send {
    async fn create(&self, item: CategoryModel) -> DefaultResult<(), AppError>;
    async fn fetch(&self, id: u64) -> DefaultResult<CategoryModel, AppError>;
    async fn fetch_all(&self) -> DefaultResult<Vec<CategoryModel>, AppError>;
    async fn save(&self, item: CategoryModel) -> DefaultResult<(), AppError>;
}

#[async_trait]
pub trait AbsOrderRepo: Sync + Send {
    async fn create(&self, order: OrderModel) -> DefaultResult<(), AppError>;
    async fn fetch(&self, oid: &str) -> DefaultResult<OrderModel, AppError>;
    async fn fetch_all_by_owner(&self, owner_id: u32) -> DefaultResult<Vec<OrderModel>, AppError>;
    async fn save(&self, order: OrderModel) -> DefaultResult<(), AppError>;
    async fn delete(&self, oid: &str) -> DefaultResult<(), AppError>;
}

#[async_trait]
pub trait AbsPaymentRepo: Sync + Send {
    async fn create(&self, payment: PaymentModel) -> DefaultResult<(), AppError>;
    async fn fetch_by_code(&self, gateway_code: i64) -> DefaultResult<PaymentModel, AppError>;
    // one payment per order, callers pre-check with this
    async fn fetch_by_order(&self, oid: &str) -> DefaultResult<Option<PaymentModel>, AppError>;
    async fn save(&self, payment: PaymentModel) -> DefaultResult<(), AppError>;
}

#[async_trait]
pub trait AbsBookingRepo: Sync + Send {
    /// check-and-insert under the datastore lock, a lost race against a
    /// concurrent request for the same (sub-field, day, duration) triple
    /// comes back as `DuplicateKey`
    async fn create(&self, booking: BookingModel) -> DefaultResult<(), AppError>;
    async fn fetch(&self, id: &str) -> DefaultResult<BookingModel, AppError>;
    async fn fetch_by_subfield_day(
        &self,
        sub_field_id: u64,
        day: &str,
    ) -> DefaultResult<Vec<BookingModel>, AppError>;
    async fn save(&self, booking: BookingModel) -> DefaultResult<(), AppError>;
}

#[async_trait]
pub trait AbsFieldRepo: Sync + Send {
    async fn create(&self, field: FieldModel) -> DefaultResult<(), AppError>;
    async fn fetch(&self, id: u64) -> DefaultResult<FieldModel, AppError>;
    async fn fetch_all(&self) -> DefaultResult<Vec<FieldModel>, AppError>;
    async fn save(&self, field: FieldModel) -> DefaultResult<(), AppError>;
    async fn create_subfield(&self, item: SubFieldModel) -> DefaultResult<(), AppError>;
    async fn fetch_subfield(&self, id: u64) -> DefaultResult<SubFieldModel, AppError>;
    async fn fetch_subfields_of(
        &self,
        field_id: u64,
    ) -> DefaultResult<Vec<SubFieldModel>, AppError>;
    async fn save_subfield(&self, item: SubFieldModel) -> DefaultResult<(), AppError>;
} // end of trait AbsFieldRepo

macro_rules! inmem_repo_builder {
    ($fn_name:ident, $repo_typ:ident, $abs_typ:ident) => {
        pub async fn $fn_name(
            ds: Arc<AppDataStoreContext>,
        ) -> DefaultResult<Box<dyn $abs_typ>, AppError> {
            if let Some(m) = &ds.in_mem {
                let obj = $repo_typ::new(m.clone()).await?;
                Ok(Box::new(obj))
            } else {
                Err(AppError {
                    code: AppErrorCode::MissingDataStore,
                    detail: Some("unknown-type".to_string()),
                })
            }
        }
    };
}

inmem_repo_builder!(app_repo_product, ProductInMemRepo, AbsProductRepo);
inmem_repo_builder!(app_repo_category, CategoryInMemRepo, AbsCategoryRepo);
inmem_repo_builder!(app_repo_order, OrderInMemRepo, AbsOrderRepo);
inmem_repo_builder!(app_repo_payment, PaymentInMemRepo, AbsPaymentRepo);
inmem_repo_builder!(app_repo_booking, BookingInMemRepo, AbsBookingRepo);
inmem_repo_builder!(app_repo_field, FieldInMemRepo, AbsFieldRepo);
