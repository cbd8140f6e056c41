use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::customer_addresses;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = customer_addresses)]
pub struct CustomerAddressEntity {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
}
