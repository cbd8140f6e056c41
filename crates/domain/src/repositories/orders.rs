use anyhow::Result;
use async_trait::async_trait;

use crate::value_objects::orders::PlaceOrderModel;

#[mockall::automock]
#[async_trait]
pub trait OrderRepository {
    /// Persists the order, its items, and the payment row, decrements stock
    /// with a guarded conditional update per item, and clears the customer's
    /// cart, all in one transaction. A decrement that would take stock
    /// negative fails the whole call with [`InsufficientStockError`] in the
    /// chain and nothing is committed.
    ///
    /// [`InsufficientStockError`]: crate::value_objects::orders::InsufficientStockError
    async fn place_order(&self, place_order_model: PlaceOrderModel) -> Result<()>;
}
