use std::boxed::Box;
use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;

use crate::adapter::datastore::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppInMemFetchedSingleRow,
};
use crate::error::{AppError, AppErrorCode};
use crate::model::{CategoryModel, OrderModel, ProductModel};

use super::super::{
    AbsCategoryRepo, AbsProductRepo, AppProductRepoReserveReturn, AppProductRepoReserveUserFunc,
    AppProductRepoReturnUserFunc,
};
use super::AcceptAllFilterOp;

mod _product {
    pub(super) const TABLE_LABEL: &str = "catalog_product";

    pub(super) enum InMemColIdx {
        Name,
        CategoryId,
        DigitalPrice,
        PhysicalPrice,
        Quantity,
        Available,
        IsDeleted,
        TotNumColumns,
    }
    impl From<InMemColIdx> for usize {
        fn from(value: InMemColIdx) -> usize {
            match value {
                InMemColIdx::Name => 0,
                InMemColIdx::CategoryId => 1,
                InMemColIdx::DigitalPrice => 2,
                InMemColIdx::PhysicalPrice => 3,
                InMemColIdx::Quantity => 4,
                InMemColIdx::Available => 5,
                InMemColIdx::IsDeleted => 6,
                InMemColIdx::TotNumColumns => 7,
            }
        }
    }
} // end of inner module _product

mod _category {
    pub(super) const TABLE_LABEL: &str = "catalog_category";

    pub(super) enum InMemColIdx {
        Name,
        IsDeleted,
        TotNumColumns,
    }
    impl From<InMemColIdx> for usize {
        fn from(value: InMemColIdx) -> usize {
            match value {
                InMemColIdx::Name => 0,
                InMemColIdx::IsDeleted => 1,
                InMemColIdx::TotNumColumns => 2,
            }
        }
    }
}

struct NameEqualFilterOp {
    expect: String,
}
impl AbsDStoreFilterKeyOp for NameEqualFilterOp {
    fn filter(&self, _k: &String, v: &Vec<String>) -> bool {
        let idx: usize = _product::InMemColIdx::Name.into();
        v.get(idx).map(|s| s == &self.expect).unwrap_or(false)
    }
}

fn product_to_row(m: &ProductModel) -> AppInMemFetchedSingleRow {
    let mut row = (0.._product::InMemColIdx::TotNumColumns.into())
        .map(|_n| String::new())
        .collect::<Vec<String>>();
    let _ = [
        (_product::InMemColIdx::Name, m.name.clone()),
        (_product::InMemColIdx::CategoryId, m.category_id.to_string()),
        (
            _product::InMemColIdx::DigitalPrice,
            m.digital_price.to_string(),
        ),
        (
            _product::InMemColIdx::PhysicalPrice,
            m.physical_price.to_string(),
        ),
        (_product::InMemColIdx::Quantity, m.quantity.to_string()),
        (
            _product::InMemColIdx::Available,
            (m.available as u8).to_string(),
        ),
        (
            _product::InMemColIdx::IsDeleted,
            (m.is_deleted as u8).to_string(),
        ),
    ]
    .into_iter()
    .map(|(idx, val)| {
        let idx: usize = idx.into();
        row[idx] = val;
    })
    .collect::<Vec<()>>();
    row
}

fn product_from_row(key: &str, row: &AppInMemFetchedSingleRow) -> ProductModel {
    ProductModel {
        id_: key.parse().unwrap(),
        name: row
            .get::<usize>(_product::InMemColIdx::Name.into())
            .unwrap()
            .clone(),
        category_id: row
            .get::<usize>(_product::InMemColIdx::CategoryId.into())
            .unwrap()
            .parse()
            .unwrap(),
        digital_price: row
            .get::<usize>(_product::InMemColIdx::DigitalPrice.into())
            .unwrap()
            .parse()
            .unwrap(),
        physical_price: row
            .get::<usize>(_product::InMemColIdx::PhysicalPrice.into())
            .unwrap()
            .parse()
            .unwrap(),
        quantity: row
            .get::<usize>(_product::InMemColIdx::Quantity.into())
            .unwrap()
            .parse()
            .unwrap(),
        available: row
            .get::<usize>(_product::InMemColIdx::Available.into())
            .unwrap()
            .as_str()
            == "1",
        is_deleted: row
            .get::<usize>(_product::InMemColIdx::IsDeleted.into())
            .unwrap()
            .as_str()
            == "1",
        is_create: false,
    }
} // end of fn product_from_row

pub struct ProductInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl ProductInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(_product::TABLE_LABEL).await?;
        Ok(Self { datastore: m })
    }

    async fn _fetch_by_keys(&self, ids: Vec<String>) -> DefaultResult<Vec<ProductModel>, AppError> {
        let info = HashMap::from([(_product::TABLE_LABEL.to_string(), ids)]);
        let resultset = self.datastore.fetch(info).await?;
        let out = resultset
            .get(_product::TABLE_LABEL)
            .map(|t| {
                t.iter()
                    .map(|(key, row)| product_from_row(key, row))
                    .collect()
            })
            .unwrap_or_default();
        Ok(out)
    }

    fn _save_rows(models: &[ProductModel]) -> HashMap<String, AppInMemFetchedSingleRow> {
        let kv_pairs = models.iter().map(|m| (m.id_.to_string(), product_to_row(m)));
        HashMap::from_iter(kv_pairs)
    }
} // end of impl ProductInMemRepo

#[async_trait]
impl AbsProductRepo for ProductInMemRepo {
    async fn create(&self, item: ProductModel) -> DefaultResult<(), AppError> {
        // advisory duplicate-name check, the row key is the numeric ID so
        // the scan below is what guards the unique-name rule
        let op = NameEqualFilterOp {
            expect: item.name.clone(),
        };
        let same_name = self
            .datastore
            .filter_keys(_product::TABLE_LABEL.to_string(), &op)
            .await?;
        if !same_name.is_empty() {
            let existing = self._fetch_by_keys(same_name).await?;
            if existing.iter().any(|m| !m.is_deleted) {
                return Err(AppError {
                    code: AppErrorCode::DuplicateKey,
                    detail: Some(format!("product-name:{}", item.name)),
                });
            }
        }
        self.save(item).await
    }

    async fn fetch(&self, id: u64) -> DefaultResult<ProductModel, AppError> {
        let mut found = self._fetch_by_keys(vec![id.to_string()]).await?;
        if found.is_empty() {
            Err(AppError {
                code: AppErrorCode::ProductNotExist,
                detail: Some(format!("id:{}", id)),
            })
        } else {
            Ok(found.remove(0))
        }
    }

    async fn fetch_many(&self, ids: Vec<u64>) -> DefaultResult<Vec<ProductModel>, AppError> {
        let keys = ids.into_iter().map(|i| i.to_string()).collect();
        self._fetch_by_keys(keys).await
    }

    async fn fetch_all(&self) -> DefaultResult<Vec<ProductModel>, AppError> {
        let keys = self
            .datastore
            .filter_keys(_product::TABLE_LABEL.to_string(), &AcceptAllFilterOp)
            .await?;
        self._fetch_by_keys(keys).await
    }

    async fn fetch_by_name(&self, name: &str) -> DefaultResult<Vec<ProductModel>, AppError> {
        let op = NameEqualFilterOp {
            expect: name.to_string(),
        };
        let keys = self
            .datastore
            .filter_keys(_product::TABLE_LABEL.to_string(), &op)
            .await?;
        self._fetch_by_keys(keys).await
    }

    async fn save(&self, item: ProductModel) -> DefaultResult<(), AppError> {
        let rows = Self::_save_rows(&[item]);
        let data = HashMap::from([(_product::TABLE_LABEL.to_string(), rows)]);
        let _num = self.datastore.save(data).await?;
        Ok(())
    }

    async fn try_reserve(
        &self,
        cb: AppProductRepoReserveUserFunc,
        order: &OrderModel,
    ) -> AppProductRepoReserveReturn {
        let keys = order
            .physical_reservations()
            .into_iter()
            .map(|(pid, _qty)| pid.to_string())
            .collect::<Vec<String>>();
        let info = HashMap::from([(_product::TABLE_LABEL.to_string(), keys)]);
        let (tableset, d_lock) = match self.datastore.fetch_acquire(info).await {
            Ok(v) => v,
            Err(e) => {
                return Err(Err(e));
            }
        };
        let mut models = tableset
            .get(_product::TABLE_LABEL)
            .map(|t| {
                t.iter()
                    .map(|(key, row)| product_from_row(key, row))
                    .collect::<Vec<ProductModel>>()
            })
            .unwrap_or_default();
        cb(&mut models, order)?;
        let rows = Self::_save_rows(&models);
        let data = HashMap::from([(_product::TABLE_LABEL.to_string(), rows)]);
        if let Err(e) = self.datastore.save_release(data, d_lock) {
            Err(Err(e))
        } else {
            Ok(())
        }
    } // end of fn try_reserve

    async fn try_return(
        &self,
        cb: AppProductRepoReturnUserFunc,
        order: &OrderModel,
    ) -> DefaultResult<(), AppError> {
        let keys = order
            .physical_reservations()
            .into_iter()
            .map(|(pid, _qty)| pid.to_string())
            .collect::<Vec<String>>();
        let info = HashMap::from([(_product::TABLE_LABEL.to_string(), keys)]);
        let (tableset, d_lock) = self.datastore.fetch_acquire(info).await?;
        let mut models = tableset
            .get(_product::TABLE_LABEL)
            .map(|t| {
                t.iter()
                    .map(|(key, row)| product_from_row(key, row))
                    .collect::<Vec<ProductModel>>()
            })
            .unwrap_or_default();
        cb(&mut models, order);
        let rows = Self::_save_rows(&models);
        let data = HashMap::from([(_product::TABLE_LABEL.to_string(), rows)]);
        let _num = self.datastore.save_release(data, d_lock)?;
        Ok(())
    }
} // end of impl AbsProductRepo for ProductInMemRepo

pub struct CategoryInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl CategoryInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(_category::TABLE_LABEL).await?;
        Ok(Self { datastore: m })
    }

    fn to_row(m: &CategoryModel) -> AppInMemFetchedSingleRow {
        let mut row = (0.._category::InMemColIdx::TotNumColumns.into())
            .map(|_n| String::new())
            .collect::<Vec<String>>();
        let _ = [
            (_category::InMemColIdx::Name, m.name.clone()),
            (
                _category::InMemColIdx::IsDeleted,
                (m.is_deleted as u8).to_string(),
            ),
        ]
        .into_iter()
        .map(|(idx, val)| {
            let idx: usize = idx.into();
            row[idx] = val;
        })
        .collect::<Vec<()>>();
        row
    }

    fn from_row(key: &str, row: &AppInMemFetchedSingleRow) -> CategoryModel {
        let name_idx: usize = _category::InMemColIdx::Name.into();
        let del_idx: usize = _category::InMemColIdx::IsDeleted.into();
        CategoryModel {
            id_: key.parse().unwrap(),
            name: row.get(name_idx).unwrap().clone(),
            is_deleted: row.get(del_idx).unwrap().as_str() == "1",
            is_create: false,
        }
    }

    async fn _fetch_by_keys(&self, ids: Vec<String>) -> DefaultResult<Vec<CategoryModel>, AppError> {
        let info = HashMap::from([(_category::TABLE_LABEL.to_string(), ids)]);
        let resultset = self.datastore.fetch(info).await?;
        let out = resultset
            .get(_category::TABLE_LABEL)
            .map(|t| t.iter().map(|(key, row)| Self::from_row(key, row)).collect())
            .unwrap_or_default();
        Ok(out)
    }
} // end of impl CategoryInMemRepo

#[async_trait]
impl AbsCategoryRepo for CategoryInMemRepo {
    async fn create(&self, item: CategoryModel) -> DefaultResult<(), AppError> {
        self.save(item).await
    }

    async fn fetch(&self, id: u64) -> DefaultResult<CategoryModel, AppError> {
        let mut found = self._fetch_by_keys(vec![id.to_string()]).await?;
        if found.is_empty() {
            Err(AppError {
                code: AppErrorCode::CategoryNotExist,
                detail: Some(format!("id:{}", id)),
            })
        } else {
            Ok(found.remove(0))
        }
    }

    async fn fetch_all(&self) -> DefaultResult<Vec<CategoryModel>, AppError> {
        let keys = self
            .datastore
            .filter_keys(_category::TABLE_LABEL.to_string(), &AcceptAllFilterOp)
            .await?;
        self._fetch_by_keys(keys).await
    }

    async fn save(&self, item: CategoryModel) -> DefaultResult<(), AppError> {
        let rows = HashMap::from([(item.id_.to_string(), Self::to_row(&item))]);
        let data = HashMap::from([(_category::TABLE_LABEL.to_string(), rows)]);
        let _num = self.datastore.save(data).await?;
        Ok(())
    }
} // end of impl AbsCategoryRepo for CategoryInMemRepo
