use anyhow::Result;
use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::customer_addresses::CustomerAddressEntity,
    repositories::customer_addresses::CustomerAddressRepository, schema::customer_addresses,
};

pub struct CustomerAddressPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CustomerAddressPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CustomerAddressRepository for CustomerAddressPostgres {
    async fn find_owned(
        &self,
        address_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Option<CustomerAddressEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = customer_addresses::table
            .filter(customer_addresses::id.eq(address_id))
            .filter(customer_addresses::customer_id.eq(customer_id))
            .first::<CustomerAddressEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }
}
