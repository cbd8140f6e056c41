use anyhow::Result;
use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::products::ProductEntity, repositories::products::ProductRepository, schema::products,
};

pub struct ProductPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ProductPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ProductRepository for ProductPostgres {
    async fn find_by_ids(&self, product_ids: Vec<Uuid>) -> Result<Vec<ProductEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = products::table
            .filter(products::id.eq_any(product_ids))
            .load::<ProductEntity>(&mut conn)?;

        Ok(results)
    }
}
