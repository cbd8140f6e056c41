use std::{collections::HashMap, sync::Arc};

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};
use chrono::Utc;
use domain::{
    entities::{
        order_items::InsertOrderItemEntity, orders::InsertOrderEntity,
        payments::InsertPaymentEntity, products::ProductEntity,
    },
    repositories::{
        customer_addresses::CustomerAddressRepository, orders::OrderRepository,
        products::ProductRepository,
    },
    value_objects::{
        checkout::{CheckoutCompletedDto, CheckoutModel},
        enums::{order_statuses::OrderStatus, payment_statuses::PaymentStatus},
        orders::{InsufficientStockError, PlaceOrderModel},
    },
};
use payments::razorpay_client::RazorpayClient;
use rand::{Rng, distributions::Alphanumeric};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_gateway_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
        notes: HashMap<String, String>,
    ) -> AnyResult<String>;
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_gateway_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
        notes: HashMap<String, String>,
    ) -> AnyResult<String> {
        self.create_order(amount_minor, currency, receipt, notes)
            .await
    }
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("{0}")]
    Validation(String),
    #[error("Insufficient stock for {product_name}")]
    InsufficientStock { product_name: String },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CheckoutError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            CheckoutError::Validation(_) | CheckoutError::InsufficientStock { .. } => {
                StatusCode::BAD_REQUEST
            }
            CheckoutError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, CheckoutError>;

pub struct CheckoutUseCase<A, P, O, G>
where
    A: CustomerAddressRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    address_repository: Arc<A>,
    product_repository: Arc<P>,
    order_repository: Arc<O>,
    payment_gateway: Arc<G>,
    currency: String,
}

impl<A, P, O, G> CheckoutUseCase<A, P, O, G>
where
    A: CustomerAddressRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    pub fn new(
        address_repository: Arc<A>,
        product_repository: Arc<P>,
        order_repository: Arc<O>,
        payment_gateway: Arc<G>,
        currency: String,
    ) -> Self {
        Self {
            address_repository,
            product_repository,
            order_repository,
            payment_gateway,
            currency,
        }
    }

    pub async fn place_order(
        &self,
        customer_id: Uuid,
        checkout_model: CheckoutModel,
    ) -> UseCaseResult<CheckoutCompletedDto> {
        info!(
            %customer_id,
            item_count = checkout_model.items.len(),
            payment_method = %checkout_model.payment_method,
            "checkout: place order requested"
        );

        Self::validate(&checkout_model)?;

        let billing_address_id = self
            .resolve_addresses(customer_id, &checkout_model)
            .await?;

        let products_by_id = self.load_products(customer_id, &checkout_model).await?;
        Self::check_stock(&checkout_model, &products_by_id)?;

        // Generated here, not by the database, so the gateway order can carry
        // the internal order reference in its notes.
        let order_id = Uuid::new_v4();
        let order_number = generate_order_number();

        let razorpay_order_id = if checkout_model.payment_method.is_online() {
            Some(
                self.create_gateway_order(customer_id, order_id, &order_number, &checkout_model)
                    .await?,
            )
        } else {
            None
        };

        let items = checkout_model
            .items
            .iter()
            .map(|item| InsertOrderItemEntity {
                order_id,
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.price.clone(),
                subtotal: &item.price * BigDecimal::from(item.quantity),
            })
            .collect::<Vec<_>>();

        let place_order_model = PlaceOrderModel {
            order: InsertOrderEntity {
                id: order_id,
                order_number: order_number.clone(),
                customer_id,
                total_amount: checkout_model.total_amount.clone(),
                status: OrderStatus::Pending.to_string(),
                shipping_address_id: checkout_model.shipping_address_id,
                billing_address_id,
                notes: checkout_model.notes.clone(),
            },
            items,
            payment: InsertPaymentEntity {
                order_id,
                amount: checkout_model.total_amount.clone(),
                method: checkout_model.payment_method.to_string(),
                status: PaymentStatus::Pending.to_string(),
                currency: self.currency.clone(),
                gateway_order_id: razorpay_order_id.clone(),
            },
        };

        self.order_repository
            .place_order(place_order_model)
            .await
            .map_err(|err| {
                if let Some(shortage) = err.downcast_ref::<InsufficientStockError>() {
                    let product_name = products_by_id
                        .get(&shortage.product_id)
                        .map(|product| product.name.clone())
                        .unwrap_or_else(|| "product".to_string());
                    warn!(
                        %customer_id,
                        %order_id,
                        product_id = %shortage.product_id,
                        "checkout: stock moved during placement, order rolled back"
                    );
                    CheckoutError::InsufficientStock { product_name }
                } else {
                    error!(
                        %customer_id,
                        %order_id,
                        db_error = ?err,
                        "checkout: failed to persist order"
                    );
                    CheckoutError::Internal(err)
                }
            })?;

        info!(
            %customer_id,
            %order_id,
            order_number = %order_number,
            razorpay_order_id = ?razorpay_order_id,
            "checkout: order placed"
        );

        Ok(CheckoutCompletedDto {
            success: true,
            order_id,
            order_number,
            amount: checkout_model.total_amount,
            razorpay_order_id,
        })
    }

    fn validate(checkout_model: &CheckoutModel) -> UseCaseResult<()> {
        if checkout_model.items.is_empty() {
            return Err(CheckoutError::Validation(
                "items must not be empty".to_string(),
            ));
        }

        for item in &checkout_model.items {
            if item.quantity <= 0 {
                return Err(CheckoutError::Validation(format!(
                    "quantity for product {} must be a positive integer",
                    item.product_id
                )));
            }
            if item.price <= BigDecimal::from(0) {
                return Err(CheckoutError::Validation(format!(
                    "price for product {} must be positive",
                    item.product_id
                )));
            }
        }

        if checkout_model.total_amount <= BigDecimal::from(0) {
            return Err(CheckoutError::Validation(
                "totalAmount must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns the billing address id, falling back to the shipping address
    /// when none was supplied. Both must belong to the caller.
    async fn resolve_addresses(
        &self,
        customer_id: Uuid,
        checkout_model: &CheckoutModel,
    ) -> UseCaseResult<Uuid> {
        self.address_repository
            .find_owned(checkout_model.shipping_address_id, customer_id)
            .await
            .map_err(|err| {
                error!(
                    %customer_id,
                    db_error = ?err,
                    "checkout: failed to load shipping address"
                );
                CheckoutError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(
                    %customer_id,
                    shipping_address_id = %checkout_model.shipping_address_id,
                    "checkout: shipping address missing or not owned by caller"
                );
                CheckoutError::Validation("shipping address not found".to_string())
            })?;

        match checkout_model.billing_address_id {
            Some(billing_address_id) if billing_address_id != checkout_model.shipping_address_id => {
                self.address_repository
                    .find_owned(billing_address_id, customer_id)
                    .await
                    .map_err(|err| {
                        error!(
                            %customer_id,
                            db_error = ?err,
                            "checkout: failed to load billing address"
                        );
                        CheckoutError::Internal(err)
                    })?
                    .ok_or_else(|| {
                        warn!(
                            %customer_id,
                            %billing_address_id,
                            "checkout: billing address missing or not owned by caller"
                        );
                        CheckoutError::Validation("billing address not found".to_string())
                    })?;

                Ok(billing_address_id)
            }
            _ => Ok(checkout_model.shipping_address_id),
        }
    }

    async fn load_products(
        &self,
        customer_id: Uuid,
        checkout_model: &CheckoutModel,
    ) -> UseCaseResult<HashMap<Uuid, ProductEntity>> {
        let product_ids = checkout_model
            .items
            .iter()
            .map(|item| item.product_id)
            .collect::<Vec<_>>();

        let products = self
            .product_repository
            .find_by_ids(product_ids)
            .await
            .map_err(|err| {
                error!(
                    %customer_id,
                    db_error = ?err,
                    "checkout: failed to load products"
                );
                CheckoutError::Internal(err)
            })?;

        Ok(products
            .into_iter()
            .map(|product| (product.id, product))
            .collect())
    }

    /// Precondition read only; the placement transaction re-checks with a
    /// guarded decrement since stock can move between here and commit.
    fn check_stock(
        checkout_model: &CheckoutModel,
        products_by_id: &HashMap<Uuid, ProductEntity>,
    ) -> UseCaseResult<()> {
        for item in &checkout_model.items {
            let product = products_by_id.get(&item.product_id).ok_or_else(|| {
                CheckoutError::Validation(format!("product {} not found", item.product_id))
            })?;

            if product.stock < item.quantity {
                warn!(
                    product_id = %product.id,
                    stock = product.stock,
                    requested = item.quantity,
                    "checkout: insufficient stock"
                );
                return Err(CheckoutError::InsufficientStock {
                    product_name: product.name.clone(),
                });
            }
        }

        Ok(())
    }

    async fn create_gateway_order(
        &self,
        customer_id: Uuid,
        order_id: Uuid,
        order_number: &str,
        checkout_model: &CheckoutModel,
    ) -> UseCaseResult<String> {
        let amount_minor = to_minor_units(&checkout_model.total_amount).ok_or_else(|| {
            CheckoutError::Validation("totalAmount is out of range".to_string())
        })?;

        let notes = HashMap::from([
            ("order_id".to_string(), order_id.to_string()),
            ("customer_id".to_string(), customer_id.to_string()),
        ]);

        info!(
            %customer_id,
            %order_id,
            amount_minor,
            currency = %self.currency,
            "checkout: creating gateway order"
        );

        self.payment_gateway
            .create_gateway_order(amount_minor, &self.currency, order_number, notes)
            .await
            .map_err(|err| {
                error!(
                    %customer_id,
                    %order_id,
                    error = ?err,
                    "checkout: gateway order creation failed"
                );
                CheckoutError::Internal(err)
            })
    }
}

/// Human-readable, collision-resistant order reference, e.g.
/// `ORD-20250114-X7K2PQ`.
pub fn generate_order_number() -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();

    format!("ORD-{}-{}", date, suffix.to_uppercase())
}

/// Major-unit decimal to the gateway's minor-unit integer (rupees to paise).
pub fn to_minor_units(amount: &BigDecimal) -> Option<i64> {
    (amount * BigDecimal::from(100))
        .with_scale_round(0, RoundingMode::HalfUp)
        .to_i64()
}

#[cfg(test)]
mod tests;
