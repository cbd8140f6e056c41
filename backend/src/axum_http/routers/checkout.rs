use crate::auth::AuthUser;
use crate::axum_http::error_responses::AppError;
use crate::axum_http::extractors::AppJson;
use crate::config::config_model::DotEnvyConfig;
use crate::usecases::checkout::{CheckoutUseCase, PaymentGateway};
use axum::{
    Json, Router,
    extract::State,
    routing::post,
};
use domain::{
    repositories::{
        customer_addresses::CustomerAddressRepository, orders::OrderRepository,
        products::ProductRepository,
    },
    value_objects::checkout::{CheckoutCompletedDto, CheckoutModel},
};
use infra::postgres::{
    postgres_connection::PgPoolSquad,
    repositories::{
        customer_addresses::CustomerAddressPostgres, orders::OrderPostgres,
        products::ProductPostgres,
    },
};
use payments::razorpay_client::RazorpayClient;
use std::sync::Arc;

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let address_repository = CustomerAddressPostgres::new(Arc::clone(&db_pool));
    let product_repository = ProductPostgres::new(Arc::clone(&db_pool));
    let order_repository = OrderPostgres::new(Arc::clone(&db_pool));
    let razorpay_client = RazorpayClient::new(
        config.razorpay.key_id.clone(),
        config.razorpay.key_secret.clone(),
    );

    let checkout_usecase = CheckoutUseCase::new(
        Arc::new(address_repository),
        Arc::new(product_repository),
        Arc::new(order_repository),
        Arc::new(razorpay_client),
        config.razorpay.currency.clone(),
    );

    Router::new()
        .route("/", post(place_order))
        .with_state(Arc::new(checkout_usecase))
}

pub async fn place_order<A, P, O, G>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<A, P, O, G>>>,
    auth: AuthUser,
    AppJson(checkout_model): AppJson<CheckoutModel>,
) -> Result<Json<CheckoutCompletedDto>, AppError>
where
    A: CustomerAddressRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    let completed = checkout_usecase
        .place_order(auth.user_id, checkout_model)
        .await?;

    Ok(Json(completed))
}
