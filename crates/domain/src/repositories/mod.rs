pub mod customer_addresses;
pub mod orders;
pub mod products;
