use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{Connection, delete, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::postgres::postgres_connection::PgPoolSquad;
use domain::{
    repositories::orders::OrderRepository,
    schema::{cart_items, cart_service_items, carts, order_items, orders, payments, products},
    value_objects::orders::{InsufficientStockError, PlaceOrderModel},
};

pub struct OrderPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl OrderPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl OrderRepository for OrderPostgres {
    async fn place_order(&self, place_order_model: PlaceOrderModel) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let customer_id = place_order_model.order.customer_id;

        conn.transaction::<(), anyhow::Error, _>(|tx| {
            insert_into(orders::table)
                .values(&place_order_model.order)
                .execute(tx)?;

            insert_into(order_items::table)
                .values(&place_order_model.items)
                .execute(tx)?;

            let now = Utc::now();
            for item in &place_order_model.items {
                // Guarded decrement: the precondition read happened outside
                // this transaction, so stock may have moved under concurrent
                // checkouts. Zero rows matched means it would go negative.
                let updated = update(products::table)
                    .filter(products::id.eq(item.product_id))
                    .filter(products::stock.ge(item.quantity))
                    .set((
                        products::stock.eq(products::stock - item.quantity),
                        products::updated_at.eq(now),
                    ))
                    .execute(tx)?;

                if updated == 0 {
                    return Err(anyhow::Error::new(InsufficientStockError {
                        product_id: item.product_id,
                    }));
                }
            }

            insert_into(payments::table)
                .values(&place_order_model.payment)
                .execute(tx)?;

            // Best effort within the transaction: no cart rows is a no-op,
            // not a failure.
            let cart_ids = carts::table
                .filter(carts::customer_id.eq(customer_id))
                .select(carts::id)
                .load::<Uuid>(tx)?;

            if !cart_ids.is_empty() {
                delete(cart_items::table.filter(cart_items::cart_id.eq_any(cart_ids.clone())))
                    .execute(tx)?;
                delete(
                    cart_service_items::table
                        .filter(cart_service_items::cart_id.eq_any(cart_ids)),
                )
                .execute(tx)?;
            }

            Ok(())
        })?;

        Ok(())
    }
}
