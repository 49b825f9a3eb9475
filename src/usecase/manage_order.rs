use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Local as LocalTime;

use crate::api::web::dto::{
    OrderCreateReqData, OrderLineCreateErrorDto, OrderLineCreateErrorReason, OrderLinePresentDto,
    OrderPresentDto,
};
use crate::constant::app_meta;
use crate::error::{AppError, AppErrorCode};
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::{OrderModel, OrderPaymentMethod, OrderStatus, ProductModel};
use crate::repository::{
    AbsOrderRepo, AbsProductRepo, AppProductRepoReserveReturn,
};
use crate::{AppAuthRole, AppAuthedClaim};

pub(super) fn order_present_dto(m: OrderModel) -> OrderPresentDto {
    let lines = m
        .lines
        .into_iter()
        .map(|l| OrderLinePresentDto {
            product_id: l.product_id,
            kind: l.kind,
            quantity: l.quantity,
            unit_price: l.unit_price,
        })
        .collect();
    OrderPresentDto {
        order_id: m.id_,
        code: m.code,
        owner_id: m.owner_id,
        status: m.status.as_str().to_string(),
        total_amount: m.total_amount,
        payment_method: m.payment_method.as_str().to_string(),
        note: m.note,
        lines,
        create_time: m.create_time,
    }
}

pub enum CreateOrderUcError {
    ReqContent(Vec<OrderLineCreateErrorDto>),
    InvalidPaymentMethod(String),
    Server(AppError),
}

pub struct CreateOrderUseCase {
    pub repo_order: Box<dyn AbsOrderRepo>,
    pub repo_product: Box<dyn AbsProductRepo>,
    pub auth_claim: AppAuthedClaim,
    pub logctx: Arc<AppLogContext>,
}

impl CreateOrderUseCase {
    pub async fn execute(
        self,
        req: OrderCreateReqData,
    ) -> DefaultResult<OrderPresentDto, CreateOrderUcError> {
        let payment_method = OrderPaymentMethod::from_str(req.payment_method.as_str())
            .map_err(|_e| CreateOrderUcError::InvalidPaymentMethod(req.payment_method.clone()))?;
        let product_ids = req
            .lines
            .iter()
            .map(|l| l.product_id)
            .collect::<Vec<u64>>();
        let products = self
            .repo_product
            .fetch_many(product_ids)
            .await
            .map_err(CreateOrderUcError::Server)?;
        let o_lines = OrderModel::validate_lines(req.lines, &products)
            .map_err(CreateOrderUcError::ReqContent)?;
        let timenow = LocalTime::now().fixed_offset();
        let saved_order = OrderModel {
            id_: OrderModel::generate_id(app_meta::MACHINE_CODE),
            code: OrderModel::generate_code(timenow.timestamp_millis() as u64),
            owner_id: self.auth_claim.profile,
            lines: o_lines,
            status: OrderStatus::Pending,
            total_amount: req.total_amount,
            payment_method,
            note: req.note,
            create_time: timenow,
        };
        // the order lands first, then each physical line claims its stock.
        // The two steps are not one transaction, a crash in between leaves a
        // pending order whose stock was never claimed.
        if let Err(e) = self.repo_order.create(saved_order.clone()).await {
            let logctx_p = &self.logctx;
            app_log_event!(logctx_p, AppLogLevel::ERROR, "repo-fail-save: {e}");
            return Err(CreateOrderUcError::Server(e));
        }
        self.try_reserve_stock(&saved_order).await?;
        Ok(order_present_dto(saved_order))
    } // end of fn execute

    async fn try_reserve_stock(&self, req: &OrderModel) -> DefaultResult<(), CreateOrderUcError> {
        let logctx_p = &self.logctx;
        match self
            .repo_product
            .try_reserve(Self::try_reserve_stock_cb, req)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) => match e {
                Ok(client_e) => {
                    app_log_event!(logctx_p, AppLogLevel::WARNING, "stock reserve client error");
                    Err(CreateOrderUcError::ReqContent(client_e))
                }
                Err(server_e) => {
                    app_log_event!(
                        logctx_p,
                        AppLogLevel::ERROR,
                        "stock reserve server error, detail:{server_e}"
                    );
                    Err(CreateOrderUcError::Server(server_e))
                }
            },
        }
    } // end of fn try_reserve_stock

    fn try_reserve_stock_cb(
        ms: &mut Vec<ProductModel>,
        req: &OrderModel,
    ) -> AppProductRepoReserveReturn {
        let mut client_errors = vec![];
        for (pid, num_req) in req.physical_reservations() {
            let result = ms.iter_mut().find(|p| p.id_ == pid);
            if let Some(p) = result {
                if p.reserve(num_req).is_err() {
                    client_errors.push(OrderLineCreateErrorDto {
                        product_id: pid,
                        reason: OrderLineCreateErrorReason::OutOfStock,
                        available: Some(p.num_avail()),
                        requested: Some(num_req),
                    });
                }
            } else {
                client_errors.push(OrderLineCreateErrorDto {
                    product_id: pid,
                    reason: OrderLineCreateErrorReason::NotExist,
                    available: None,
                    requested: Some(num_req),
                });
            }
        }
        if client_errors.is_empty() {
            Ok(())
        } else {
            Err(Ok(client_errors))
        }
    }
} // end of impl CreateOrderUseCase

pub enum UpdateOrderStatusUcOutput {
    Success(OrderPresentDto),
    PermissionDeny,
    NotFound,
    BadStatusLabel(String),
    InvalidTransition(String),
}

pub struct UpdateOrderStatusUseCase {
    pub repo_order: Box<dyn AbsOrderRepo>,
    pub repo_product: Box<dyn AbsProductRepo>,
    pub auth_claim: AppAuthedClaim,
    pub logctx: Arc<AppLogContext>,
}

impl UpdateOrderStatusUseCase {
    pub async fn execute(
        self,
        oid: String,
        new_status_label: String,
    ) -> DefaultResult<UpdateOrderStatusUcOutput, AppError> {
        if !self.auth_claim.contain_role(AppAuthRole::Admin) {
            return Ok(UpdateOrderStatusUcOutput::PermissionDeny);
        }
        let next = match OrderStatus::from_str(new_status_label.as_str()) {
            Ok(v) => v,
            Err(_e) => {
                return Ok(UpdateOrderStatusUcOutput::BadStatusLabel(new_status_label));
            }
        };
        let mut order = match self.repo_order.fetch(oid.as_str()).await {
            Ok(v) => v,
            Err(e) if e.code == AppErrorCode::OrderNotExist => {
                return Ok(UpdateOrderStatusUcOutput::NotFound);
            }
            Err(e) => {
                return Err(e);
            }
        };
        let prior = order.status.clone();
        if let Err(e) = order.try_transit(next.clone()) {
            return Ok(UpdateOrderStatusUcOutput::InvalidTransition(
                e.detail.unwrap_or_default(),
            ));
        }
        self.repo_order.save(order.clone()).await?;
        // stock goes back only on a fresh transition into `cancel`
        if next == OrderStatus::Cancel && prior != OrderStatus::Cancel {
            self.repo_product
                .try_return(restore_stock_cb, &order)
                .await?;
            let logctx_p = &self.logctx;
            app_log_event!(
                logctx_p,
                AppLogLevel::INFO,
                "order cancelled, stock restored, oid:{}",
                oid.as_str()
            );
        }
        Ok(UpdateOrderStatusUcOutput::Success(order_present_dto(order)))
    } // end of fn execute
} // end of impl UpdateOrderStatusUseCase

pub(super) fn restore_stock_cb(ms: &mut Vec<ProductModel>, req: &OrderModel) {
    for (pid, num_req) in req.physical_reservations() {
        if let Some(p) = ms.iter_mut().find(|p| p.id_ == pid) {
            p.give_back(num_req);
        }
    }
}

pub enum OrderDetailUcOutput {
    Success(OrderPresentDto),
    NotFound,
    PermissionDeny,
}

pub struct OrderDetailUseCase {
    pub repo_order: Box<dyn AbsOrderRepo>,
    pub auth_claim: AppAuthedClaim,
}

impl OrderDetailUseCase {
    pub async fn execute(self, oid: String) -> DefaultResult<OrderDetailUcOutput, AppError> {
        let order = match self.repo_order.fetch(oid.as_str()).await {
            Ok(v) => v,
            Err(e) if e.code == AppErrorCode::OrderNotExist => {
                return Ok(OrderDetailUcOutput::NotFound);
            }
            Err(e) => {
                return Err(e);
            }
        };
        let permitted = order.owner_id == self.auth_claim.profile
            || self.auth_claim.contain_role(AppAuthRole::Admin);
        if permitted {
            Ok(OrderDetailUcOutput::Success(order_present_dto(order)))
        } else {
            Ok(OrderDetailUcOutput::PermissionDeny)
        }
    }
}

pub struct ListOrdersUseCase {
    pub repo_order: Box<dyn AbsOrderRepo>,
    pub auth_claim: AppAuthedClaim,
}

impl ListOrdersUseCase {
    pub async fn execute(self) -> DefaultResult<Vec<OrderPresentDto>, AppError> {
        let found = self
            .repo_order
            .fetch_all_by_owner(self.auth_claim.profile)
            .await?;
        Ok(found.into_iter().map(order_present_dto).collect())
    }
}

pub struct RemoveOrderUseCase {
    pub repo_order: Box<dyn AbsOrderRepo>,
    pub auth_claim: AppAuthedClaim,
}

impl RemoveOrderUseCase {
    /// hard delete, reserved to administrators
    pub async fn execute(self, oid: String) -> DefaultResult<OrderDetailUcOutput, AppError> {
        if !self.auth_claim.contain_role(AppAuthRole::Admin) {
            return Ok(OrderDetailUcOutput::PermissionDeny);
        }
        let order = match self.repo_order.fetch(oid.as_str()).await {
            Ok(v) => v,
            Err(e) if e.code == AppErrorCode::OrderNotExist => {
                return Ok(OrderDetailUcOutput::NotFound);
            }
            Err(e) => {
                return Err(e);
            }
        };
        self.repo_order.delete(oid.as_str()).await?;
        Ok(OrderDetailUcOutput::Success(order_present_dto(order)))
    }
}
