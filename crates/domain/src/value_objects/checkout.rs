use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::enums::payment_methods::PaymentMethod;

/// Checkout request body. Amounts are exact decimals in the operating
/// currency's major unit; `total_amount` is caller-declared and recorded
/// as-is (discounts and shipping are applied client-side).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutModel {
    pub items: Vec<CheckoutItemModel>,
    pub shipping_address_id: Uuid,
    pub billing_address_id: Option<Uuid>,
    pub total_amount: BigDecimal,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItemModel {
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: BigDecimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutCompletedDto {
    pub success: bool,
    pub order_id: Uuid,
    pub order_number: String,
    #[serde(with = "bigdecimal::serde::json_num")]
    pub amount: BigDecimal,
    pub razorpay_order_id: Option<String>,
}
