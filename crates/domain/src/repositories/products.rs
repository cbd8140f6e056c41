use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::products::ProductEntity;

#[mockall::automock]
#[async_trait]
pub trait ProductRepository {
    async fn find_by_ids(&self, product_ids: Vec<Uuid>) -> Result<Vec<ProductEntity>>;
}
