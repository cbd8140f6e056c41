use thiserror::Error;
use uuid::Uuid;

use crate::entities::{
    order_items::InsertOrderItemEntity, orders::InsertOrderEntity, payments::InsertPaymentEntity,
};

/// Everything the atomic placement writes in one transaction: the order, its
/// line items, the payment row, plus the implied stock decrements and cart
/// clear keyed off the order's customer.
#[derive(Debug, Clone)]
pub struct PlaceOrderModel {
    pub order: InsertOrderEntity,
    pub items: Vec<InsertOrderItemEntity>,
    pub payment: InsertPaymentEntity,
}

/// Raised inside the placement transaction when a guarded stock decrement
/// matches no row, i.e. stock moved under us after the precondition read.
#[derive(Debug, Clone, Error)]
#[error("insufficient stock for product {product_id}")]
pub struct InsufficientStockError {
    pub product_id: Uuid,
}
