pub mod checkout;
pub mod enums;
pub mod orders;
