use axum::debug_handler;
use axum::extract::{
    Json as ExtractJson, Path as ExtractPath, State as ExtractState,
};
use axum::http::StatusCode as HttpStatusCode;
use axum::response::IntoResponse;

use crate::api::web::dto::{
    CategoryCreateReqDto, CategoryPresentDto, ProductCreateReqDto, ProductEditReqDto,
    ProductPresentDto,
};
use crate::logging::{app_log_event, AppLogLevel};
use crate::repository::{app_repo_category, app_repo_product};
use crate::usecase::{
    CatalogUcOutput, CategoryUcOutput, CreateCategoryUseCase, CreateProductUseCase,
    DiscardProductUseCase, EditProductUseCase, ListCategoriesUseCase, ProductCatalogUseCase,
};
use crate::{AppAuthedClaim, AppSharedState};

use super::{error_response, fail_response, success_response, WebApiRespPayload};

fn catalog_resp(output: CatalogUcOutput, ok_code: HttpStatusCode, ok_message: &str) -> WebApiRespPayload {
    match output {
        CatalogUcOutput::Success(dto) => {
            success_response::<ProductPresentDto>(ok_code, ok_message, Some(dto))
        }
        CatalogUcOutput::Collection(dtos) => {
            success_response::<Vec<ProductPresentDto>>(ok_code, ok_message, Some(dtos))
        }
        CatalogUcOutput::PermissionDeny => {
            fail_response::<()>(HttpStatusCode::FORBIDDEN, "permission-denied", None)
        }
        CatalogUcOutput::NotFound => {
            fail_response::<()>(HttpStatusCode::NOT_FOUND, "product-not-found", None)
        }
        CatalogUcOutput::CategoryNotFound => {
            fail_response::<()>(HttpStatusCode::NOT_FOUND, "category-not-found", None)
        }
        CatalogUcOutput::DuplicateName(name) => fail_response::<()>(
            HttpStatusCode::CONFLICT,
            format!("product-name-taken:{}", name).as_str(),
            None,
        ),
    }
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn create_handler(
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<ProductCreateReqDto>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let results = (
        app_repo_product(ds.clone()).await,
        app_repo_category(ds).await,
    );
    let (repo_product, repo_category) = match results {
        (Ok(r0), Ok(r1)) => (r0, r1),
        _others => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repository init failure");
            return error_response();
        }
    };
    let uc = CreateProductUseCase {
        repo_product,
        repo_category,
        auth_claim: authed,
    };
    match uc.execute(req_body).await {
        Ok(output) => catalog_resp(output, HttpStatusCode::CREATED, "product-created"),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "{:?}", e);
            error_response()
        }
    }
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn list_handler(
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let repo_product = match app_repo_product(_appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repo-init-error {:?}", e);
            return error_response();
        }
    };
    let uc = ProductCatalogUseCase { repo_product };
    match uc.list_all().await {
        Ok(output) => catalog_resp(output, HttpStatusCode::OK, "products-listed"),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "{:?}", e);
            error_response()
        }
    }
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn fetch_handler(
    ExtractPath(product_id): ExtractPath<u64>,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let repo_product = match app_repo_product(_appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repo-init-error {:?}", e);
            return error_response();
        }
    };
    let uc = ProductCatalogUseCase { repo_product };
    match uc.fetch_one(product_id).await {
        Ok(output) => catalog_resp(output, HttpStatusCode::OK, "product-found"),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "{:?}", e);
            error_response()
        }
    }
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn edit_handler(
    ExtractPath(product_id): ExtractPath<u64>,
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<ProductEditReqDto>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let repo_product = match app_repo_product(_appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repo-init-error {:?}", e);
            return error_response();
        }
    };
    let uc = EditProductUseCase {
        repo_product,
        auth_claim: authed,
    };
    match uc.execute(product_id, req_body).await {
        Ok(output) => catalog_resp(output, HttpStatusCode::OK, "product-updated"),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "{:?}", e);
            error_response()
        }
    }
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn discard_handler(
    ExtractPath(product_id): ExtractPath<u64>,
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let repo_product = match app_repo_product(_appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repo-init-error {:?}", e);
            return error_response();
        }
    };
    let uc = DiscardProductUseCase {
        repo_product,
        auth_claim: authed,
    };
    match uc.execute(product_id).await {
        Ok(output) => catalog_resp(output, HttpStatusCode::OK, "product-discarded"),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "{:?}", e);
            error_response()
        }
    }
}

fn category_resp(output: CategoryUcOutput, ok_code: HttpStatusCode, ok_message: &str) -> WebApiRespPayload {
    match output {
        CategoryUcOutput::Success(dto) => {
            success_response::<CategoryPresentDto>(ok_code, ok_message, Some(dto))
        }
        CategoryUcOutput::Collection(dtos) => {
            success_response::<Vec<CategoryPresentDto>>(ok_code, ok_message, Some(dtos))
        }
        CategoryUcOutput::PermissionDeny => {
            fail_response::<()>(HttpStatusCode::FORBIDDEN, "permission-denied", None)
        }
    }
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn create_category_handler(
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<CategoryCreateReqDto>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let repo_category = match app_repo_category(_appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repo-init-error {:?}", e);
            return error_response();
        }
    };
    let uc = CreateCategoryUseCase {
        repo_category,
        auth_claim: authed,
    };
    match uc.execute(req_body).await {
        Ok(output) => category_resp(output, HttpStatusCode::CREATED, "category-created"),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "{:?}", e);
            error_response()
        }
    }
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn list_categories_handler(
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let repo_category = match app_repo_category(_appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repo-init-error {:?}", e);
            return error_response();
        }
    };
    let uc = ListCategoriesUseCase { repo_category };
    match uc.execute().await {
        Ok(output) => category_resp(output, HttpStatusCode::OK, "categories-listed"),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "{:?}", e);
            error_response()
        }
    }
}
