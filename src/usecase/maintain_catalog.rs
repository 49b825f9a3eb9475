use std::boxed::Box;
use std::result::Result as DefaultResult;

use crate::api::web::dto::{
    CategoryCreateReqDto, CategoryPresentDto, ProductCreateReqDto, ProductEditReqDto,
    ProductPresentDto,
};
use crate::constant::app_meta;
use crate::error::{AppError, AppErrorCode};
use crate::generate_numeric_id;
use crate::model::{CategoryModel, ProductModel};
use crate::repository::{AbsCategoryRepo, AbsProductRepo};
use crate::{AppAuthRole, AppAuthedClaim};

fn product_present_dto(m: ProductModel) -> ProductPresentDto {
    ProductPresentDto {
        product_id: m.id_,
        name: m.name,
        category_id: m.category_id,
        digital_price: m.digital_price,
        physical_price: m.physical_price,
        quantity: m.quantity,
        available: m.available,
    }
}

pub enum CatalogUcOutput {
    Success(ProductPresentDto),
    Collection(Vec<ProductPresentDto>),
    PermissionDeny,
    NotFound,
    CategoryNotFound,
    DuplicateName(String),
}

pub struct CreateProductUseCase {
    pub repo_product: Box<dyn AbsProductRepo>,
    pub repo_category: Box<dyn AbsCategoryRepo>,
    pub auth_claim: AppAuthedClaim,
}

impl CreateProductUseCase {
    pub async fn execute(
        self,
        req: ProductCreateReqDto,
    ) -> DefaultResult<CatalogUcOutput, AppError> {
        if !self.auth_claim.contain_role(AppAuthRole::Admin) {
            return Ok(CatalogUcOutput::PermissionDeny);
        }
        match self.repo_category.fetch(req.category_id).await {
            Ok(_c) => {}
            Err(e) if e.code == AppErrorCode::CategoryNotExist => {
                return Ok(CatalogUcOutput::CategoryNotFound);
            }
            Err(e) => {
                return Err(e);
            }
        }
        let saved = ProductModel {
            id_: generate_numeric_id(app_meta::MACHINE_CODE),
            name: req.name,
            category_id: req.category_id,
            digital_price: req.digital_price,
            physical_price: req.physical_price,
            quantity: req.quantity,
            available: req.available,
            is_deleted: false,
            is_create: true,
        };
        match self.repo_product.create(saved.clone()).await {
            Ok(()) => Ok(CatalogUcOutput::Success(product_present_dto(saved))),
            Err(e) if e.code == AppErrorCode::DuplicateKey => {
                Ok(CatalogUcOutput::DuplicateName(saved.name))
            }
            Err(e) => Err(e),
        }
    } // end of fn execute
}

pub struct EditProductUseCase {
    pub repo_product: Box<dyn AbsProductRepo>,
    pub auth_claim: AppAuthedClaim,
}

impl EditProductUseCase {
    pub async fn execute(
        self,
        product_id: u64,
        req: ProductEditReqDto,
    ) -> DefaultResult<CatalogUcOutput, AppError> {
        if !self.auth_claim.contain_role(AppAuthRole::Admin) {
            return Ok(CatalogUcOutput::PermissionDeny);
        }
        let mut item = match self.repo_product.fetch(product_id).await {
            Ok(v) if !v.is_deleted => v,
            Ok(_gone) => {
                return Ok(CatalogUcOutput::NotFound);
            }
            Err(e) if e.code == AppErrorCode::ProductNotExist => {
                return Ok(CatalogUcOutput::NotFound);
            }
            Err(e) => {
                return Err(e);
            }
        };
        if let Some(v) = req.name {
            item.name = v;
        }
        if let Some(v) = req.digital_price {
            item.digital_price = v;
        }
        if let Some(v) = req.physical_price {
            item.physical_price = v;
        }
        if let Some(v) = req.quantity {
            item.quantity = v;
        }
        if let Some(v) = req.available {
            item.available = v;
        }
        self.repo_product.save(item.clone()).await?;
        Ok(CatalogUcOutput::Success(product_present_dto(item)))
    } // end of fn execute
}

pub struct DiscardProductUseCase {
    pub repo_product: Box<dyn AbsProductRepo>,
    pub auth_claim: AppAuthedClaim,
}

impl DiscardProductUseCase {
    /// soft delete, the record stays for order history lookups
    pub async fn execute(self, product_id: u64) -> DefaultResult<CatalogUcOutput, AppError> {
        if !self.auth_claim.contain_role(AppAuthRole::Admin) {
            return Ok(CatalogUcOutput::PermissionDeny);
        }
        let mut item = match self.repo_product.fetch(product_id).await {
            Ok(v) if !v.is_deleted => v,
            Ok(_gone) => {
                return Ok(CatalogUcOutput::NotFound);
            }
            Err(e) if e.code == AppErrorCode::ProductNotExist => {
                return Ok(CatalogUcOutput::NotFound);
            }
            Err(e) => {
                return Err(e);
            }
        };
        item.is_deleted = true;
        self.repo_product.save(item.clone()).await?;
        Ok(CatalogUcOutput::Success(product_present_dto(item)))
    }
}

pub struct ProductCatalogUseCase {
    pub repo_product: Box<dyn AbsProductRepo>,
}

impl ProductCatalogUseCase {
    pub async fn fetch_one(self, product_id: u64) -> DefaultResult<CatalogUcOutput, AppError> {
        match self.repo_product.fetch(product_id).await {
            Ok(v) if !v.is_deleted => Ok(CatalogUcOutput::Success(product_present_dto(v))),
            Ok(_gone) => Ok(CatalogUcOutput::NotFound),
            Err(e) if e.code == AppErrorCode::ProductNotExist => Ok(CatalogUcOutput::NotFound),
            Err(e) => Err(e),
        }
    }

    pub async fn list_all(self) -> DefaultResult<CatalogUcOutput, AppError> {
        let found = self.repo_product.fetch_all().await?;
        let visible = found
            .into_iter()
            .filter(|m| !m.is_deleted)
            .map(product_present_dto)
            .collect();
        Ok(CatalogUcOutput::Collection(visible))
    }
} // end of impl ProductCatalogUseCase

pub enum CategoryUcOutput {
    Success(CategoryPresentDto),
    Collection(Vec<CategoryPresentDto>),
    PermissionDeny,
}

pub struct CreateCategoryUseCase {
    pub repo_category: Box<dyn AbsCategoryRepo>,
    pub auth_claim: AppAuthedClaim,
}

impl CreateCategoryUseCase {
    pub async fn execute(
        self,
        req: CategoryCreateReqDto,
    ) -> DefaultResult<CategoryUcOutput, AppError> {
        if !self.auth_claim.contain_role(AppAuthRole::Admin) {
            return Ok(CategoryUcOutput::PermissionDeny);
        }
        let saved = CategoryModel {
            id_: generate_numeric_id(app_meta::MACHINE_CODE),
            name: req.name,
            is_deleted: false,
            is_create: true,
        };
        self.repo_category.create(saved.clone()).await?;
        Ok(CategoryUcOutput::Success(CategoryPresentDto {
            category_id: saved.id_,
            name: saved.name,
        }))
    }
}

pub struct ListCategoriesUseCase {
    pub repo_category: Box<dyn AbsCategoryRepo>,
}

impl ListCategoriesUseCase {
    pub async fn execute(self) -> DefaultResult<CategoryUcOutput, AppError> {
        let found = self.repo_category.fetch_all().await?;
        let visible = found
            .into_iter()
            .filter(|m| !m.is_deleted)
            .map(|m| CategoryPresentDto {
                category_id: m.id_,
                name: m.name,
            })
            .collect();
        Ok(CategoryUcOutput::Collection(visible))
    }
}
