use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::orders;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = orders)]
pub struct OrderEntity {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub total_amount: BigDecimal,
    pub status: String,
    pub shipping_address_id: Uuid,
    pub billing_address_id: Uuid,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// The id is generated by the caller (not the database) so the payment gateway
// metadata can reference the order before the row exists.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub struct InsertOrderEntity {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub total_amount: BigDecimal,
    pub status: String,
    pub shipping_address_id: Uuid,
    pub billing_address_id: Uuid,
    pub notes: Option<String>,
}
