use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::{cart_items, cart_service_items, carts};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = carts)]
pub struct CartEntity {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = cart_items)]
pub struct CartItemEntity {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
}

// The catalog carries two parallel line-item kinds; both live under the same
// cart and both are flushed when an order is placed.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = cart_service_items)]
pub struct CartServiceItemEntity {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub service_id: Uuid,
    pub quantity: i32,
}
