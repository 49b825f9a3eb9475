use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppErrorCode};

/// a product is sold either as a downloadable asset or a physical copy,
/// only the latter consumes stock
#[derive(Debug, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Physical,
    Digital,
}

impl From<u8> for ProductKind {
    fn from(value: u8) -> Self {
        match value {
            2 => Self::Digital,
            _others => Self::Physical,
        }
    }
}
impl From<ProductKind> for u8 {
    fn from(value: ProductKind) -> u8 {
        match value {
            ProductKind::Physical => 1,
            ProductKind::Digital => 2,
        }
    }
}
impl PartialEq for ProductKind {
    fn eq(&self, other: &Self) -> bool {
        let a: u8 = self.clone().into();
        let b: u8 = other.clone().into();
        a == b
    }
}
impl Clone for ProductKind {
    fn clone(&self) -> Self {
        match self {
            Self::Physical => Self::Physical,
            Self::Digital => Self::Digital,
        }
    }
}
impl FromStr for ProductKind {
    type Err = AppError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u8>() {
            Ok(v) => Ok(Self::from(v)),
            Err(e) => {
                let detail = format!("product-kind, actual:{}, error:{}", s, e);
                Err(Self::Err {
                    code: AppErrorCode::DataCorruption,
                    detail: Some(detail),
                })
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProductModel {
    pub id_: u64,
    pub name: String,
    pub category_id: u64,
    pub digital_price: u32,
    pub physical_price: u32,
    // number of physical copies left, digital copies are not stock-bound
    pub quantity: u32,
    pub available: bool,
    pub is_deleted: bool,
    pub is_create: bool,
}

#[derive(Debug, Clone)]
pub struct CategoryModel {
    pub id_: u64,
    pub name: String,
    pub is_deleted: bool,
    pub is_create: bool,
}

impl PartialEq for ProductModel {
    fn eq(&self, other: &Self) -> bool {
        self.id_ == other.id_
            && self.name == other.name
            && self.category_id == other.category_id
            && self.digital_price == other.digital_price
            && self.physical_price == other.physical_price
            && self.quantity == other.quantity
            && self.available == other.available
            && self.is_deleted == other.is_deleted
    }
}

impl ProductModel {
    pub fn unit_price(&self, kind: &ProductKind) -> u32 {
        match kind {
            ProductKind::Physical => self.physical_price,
            ProductKind::Digital => self.digital_price,
        }
    }

    pub fn purchasable(&self) -> bool {
        self.available && !self.is_deleted
    }

    /// number of physical copies which can still be claimed
    pub fn num_avail(&self) -> u32 {
        if self.purchasable() {
            self.quantity
        } else {
            0
        }
    }

    pub fn reserve(&mut self, num_req: u32) -> Result<(), AppError> {
        if self.quantity < num_req {
            let detail = format!(
                "product:{}, avail:{}, requested:{}",
                self.id_, self.quantity, num_req
            );
            Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(detail),
            })
        } else {
            self.quantity -= num_req;
            Ok(())
        }
    }

    pub fn give_back(&mut self, num_req: u32) {
        self.quantity += num_req;
    }
} // end of impl ProductModel
