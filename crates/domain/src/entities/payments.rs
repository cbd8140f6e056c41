use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::payments;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payments)]
pub struct PaymentEntity {
    pub id: Uuid,
    pub order_id: Uuid,
    pub amount: BigDecimal,
    pub method: String,
    pub status: String,
    pub currency: String,
    pub gateway_order_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub struct InsertPaymentEntity {
    pub order_id: Uuid,
    pub amount: BigDecimal,
    pub method: String,
    pub status: String,
    pub currency: String,
    pub gateway_order_id: Option<String>,
}
