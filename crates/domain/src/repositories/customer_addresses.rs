use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::customer_addresses::CustomerAddressEntity;

#[mockall::automock]
#[async_trait]
pub trait CustomerAddressRepository {
    /// Resolves an address only when it belongs to the given customer.
    async fn find_owned(
        &self,
        address_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Option<CustomerAddressEntity>>;
}
