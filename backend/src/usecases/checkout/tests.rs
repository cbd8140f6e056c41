use super::*;
use axum::http::StatusCode;
use bigdecimal::BigDecimal;
use chrono::Utc;
use domain::{
    entities::customer_addresses::CustomerAddressEntity,
    repositories::{
        customer_addresses::MockCustomerAddressRepository, orders::MockOrderRepository,
        products::MockProductRepository,
    },
    value_objects::{checkout::CheckoutItemModel, enums::payment_methods::PaymentMethod},
};

fn address(id: Uuid, customer_id: Uuid) -> CustomerAddressEntity {
    CustomerAddressEntity {
        id,
        customer_id,
        line1: "42 MG Road".to_string(),
        line2: None,
        city: "Bengaluru".to_string(),
        state: "Karnataka".to_string(),
        postal_code: "560001".to_string(),
        country: "IN".to_string(),
        created_at: Utc::now(),
    }
}

fn product(id: Uuid, name: &str, stock: i32) -> ProductEntity {
    ProductEntity {
        id,
        name: name.to_string(),
        price: BigDecimal::from(500),
        stock,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn checkout_model(
    product_id: Uuid,
    shipping_address_id: Uuid,
    payment_method: PaymentMethod,
) -> CheckoutModel {
    CheckoutModel {
        items: vec![CheckoutItemModel {
            product_id,
            quantity: 2,
            price: BigDecimal::from(500),
        }],
        shipping_address_id,
        billing_address_id: None,
        total_amount: BigDecimal::from(1000),
        payment_method,
        notes: None,
    }
}

fn usecase(
    address_repository: MockCustomerAddressRepository,
    product_repository: MockProductRepository,
    order_repository: MockOrderRepository,
    payment_gateway: MockPaymentGateway,
) -> CheckoutUseCase<
    MockCustomerAddressRepository,
    MockProductRepository,
    MockOrderRepository,
    MockPaymentGateway,
> {
    CheckoutUseCase::new(
        Arc::new(address_repository),
        Arc::new(product_repository),
        Arc::new(order_repository),
        Arc::new(payment_gateway),
        "INR".to_string(),
    )
}

#[tokio::test]
async fn cod_checkout_places_pending_order_and_skips_gateway() {
    let customer_id = Uuid::new_v4();
    let product_id = Uuid::new_v4();
    let shipping_address_id = Uuid::new_v4();

    let mut address_repository = MockCustomerAddressRepository::new();
    address_repository
        .expect_find_owned()
        .returning(|id, customer_id| Ok(Some(address(id, customer_id))));

    let mut product_repository = MockProductRepository::new();
    product_repository
        .expect_find_by_ids()
        .returning(move |_| Ok(vec![product(product_id, "Masala Chai 500g", 10)]));

    let mut order_repository = MockOrderRepository::new();
    order_repository
        .expect_place_order()
        .withf(move |model| {
            model.order.customer_id == customer_id
                && model.order.status == "PENDING"
                && model.order.billing_address_id == shipping_address_id
                && model.items.len() == 1
                && model.items[0].subtotal == BigDecimal::from(1000)
                && model.payment.method == "COD"
                && model.payment.status == "PENDING"
                && model.payment.currency == "INR"
                && model.payment.gateway_order_id.is_none()
        })
        .times(1)
        .returning(|_| Ok(()));

    let payment_gateway = MockPaymentGateway::new();

    let checkout_usecase = usecase(
        address_repository,
        product_repository,
        order_repository,
        payment_gateway,
    );

    let completed = checkout_usecase
        .place_order(
            customer_id,
            checkout_model(product_id, shipping_address_id, PaymentMethod::Cod),
        )
        .await
        .expect("COD checkout should succeed");

    assert!(completed.success);
    assert_eq!(completed.amount, BigDecimal::from(1000));
    assert!(completed.razorpay_order_id.is_none());
    assert!(completed.order_number.starts_with("ORD-"));
}

#[tokio::test]
async fn online_checkout_records_gateway_order_id() {
    let customer_id = Uuid::new_v4();
    let product_id = Uuid::new_v4();
    let shipping_address_id = Uuid::new_v4();

    let mut address_repository = MockCustomerAddressRepository::new();
    address_repository
        .expect_find_owned()
        .returning(|id, customer_id| Ok(Some(address(id, customer_id))));

    let mut product_repository = MockProductRepository::new();
    product_repository
        .expect_find_by_ids()
        .returning(move |_| Ok(vec![product(product_id, "Masala Chai 500g", 10)]));

    let mut payment_gateway = MockPaymentGateway::new();
    payment_gateway
        .expect_create_gateway_order()
        .withf(|amount_minor, currency, receipt, notes| {
            *amount_minor == 100_000
                && currency == "INR"
                && receipt.starts_with("ORD-")
                && notes.contains_key("order_id")
                && notes.contains_key("customer_id")
        })
        .times(1)
        .returning(|_, _, _, _| Ok("order_abc123".to_string()));

    let mut order_repository = MockOrderRepository::new();
    order_repository
        .expect_place_order()
        .withf(|model| {
            model.payment.method == "RAZORPAY"
                && model.payment.status == "PENDING"
                && model.payment.gateway_order_id.as_deref() == Some("order_abc123")
        })
        .times(1)
        .returning(|_| Ok(()));

    let checkout_usecase = usecase(
        address_repository,
        product_repository,
        order_repository,
        payment_gateway,
    );

    let completed = checkout_usecase
        .place_order(
            customer_id,
            checkout_model(product_id, shipping_address_id, PaymentMethod::Razorpay),
        )
        .await
        .expect("online checkout should succeed");

    assert_eq!(completed.razorpay_order_id.as_deref(), Some("order_abc123"));
}

#[tokio::test]
async fn insufficient_stock_rejects_before_any_write() {
    let customer_id = Uuid::new_v4();
    let product_id = Uuid::new_v4();
    let shipping_address_id = Uuid::new_v4();

    let mut address_repository = MockCustomerAddressRepository::new();
    address_repository
        .expect_find_owned()
        .returning(|id, customer_id| Ok(Some(address(id, customer_id))));

    let mut product_repository = MockProductRepository::new();
    product_repository
        .expect_find_by_ids()
        .returning(move |_| Ok(vec![product(product_id, "Masala Chai 500g", 1)]));

    let mut order_repository = MockOrderRepository::new();
    order_repository.expect_place_order().never();

    let payment_gateway = MockPaymentGateway::new();

    let checkout_usecase = usecase(
        address_repository,
        product_repository,
        order_repository,
        payment_gateway,
    );

    let err = checkout_usecase
        .place_order(
            customer_id,
            checkout_model(product_id, shipping_address_id, PaymentMethod::Cod),
        )
        .await
        .expect_err("stock of 1 cannot satisfy quantity 2");

    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert!(err.to_string().contains("Masala Chai 500g"));
}

#[tokio::test]
async fn foreign_shipping_address_is_rejected() {
    let customer_id = Uuid::new_v4();
    let product_id = Uuid::new_v4();
    let shipping_address_id = Uuid::new_v4();

    // Ownership filter finds nothing for this caller.
    let mut address_repository = MockCustomerAddressRepository::new();
    address_repository
        .expect_find_owned()
        .returning(|_, _| Ok(None));

    let product_repository = MockProductRepository::new();

    let mut order_repository = MockOrderRepository::new();
    order_repository.expect_place_order().never();

    let payment_gateway = MockPaymentGateway::new();

    let checkout_usecase = usecase(
        address_repository,
        product_repository,
        order_repository,
        payment_gateway,
    );

    let err = checkout_usecase
        .place_order(
            customer_id,
            checkout_model(product_id, shipping_address_id, PaymentMethod::Cod),
        )
        .await
        .expect_err("foreign address must not pass");

    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert!(err.to_string().contains("shipping address"));
}

#[tokio::test]
async fn foreign_billing_address_is_rejected() {
    let customer_id = Uuid::new_v4();
    let product_id = Uuid::new_v4();
    let shipping_address_id = Uuid::new_v4();
    let billing_address_id = Uuid::new_v4();

    let mut address_repository = MockCustomerAddressRepository::new();
    address_repository
        .expect_find_owned()
        .returning(move |id, customer_id| {
            if id == billing_address_id {
                Ok(None)
            } else {
                Ok(Some(address(id, customer_id)))
            }
        });

    let product_repository = MockProductRepository::new();

    let mut order_repository = MockOrderRepository::new();
    order_repository.expect_place_order().never();

    let payment_gateway = MockPaymentGateway::new();

    let checkout_usecase = usecase(
        address_repository,
        product_repository,
        order_repository,
        payment_gateway,
    );

    let mut model = checkout_model(product_id, shipping_address_id, PaymentMethod::Cod);
    model.billing_address_id = Some(billing_address_id);

    let err = checkout_usecase
        .place_order(customer_id, model)
        .await
        .expect_err("foreign billing address must not pass");

    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert!(err.to_string().contains("billing address"));
}

#[tokio::test]
async fn gateway_failure_leaves_nothing_persisted() {
    let customer_id = Uuid::new_v4();
    let product_id = Uuid::new_v4();
    let shipping_address_id = Uuid::new_v4();

    let mut address_repository = MockCustomerAddressRepository::new();
    address_repository
        .expect_find_owned()
        .returning(|id, customer_id| Ok(Some(address(id, customer_id))));

    let mut product_repository = MockProductRepository::new();
    product_repository
        .expect_find_by_ids()
        .returning(move |_| Ok(vec![product(product_id, "Masala Chai 500g", 10)]));

    let mut payment_gateway = MockPaymentGateway::new();
    payment_gateway
        .expect_create_gateway_order()
        .returning(|_, _, _, _| Err(anyhow::anyhow!("gateway unreachable")));

    // The gateway is called before the placement transaction, so a gateway
    // failure must never reach the repository.
    let mut order_repository = MockOrderRepository::new();
    order_repository.expect_place_order().never();

    let checkout_usecase = usecase(
        address_repository,
        product_repository,
        order_repository,
        payment_gateway,
    );

    let err = checkout_usecase
        .place_order(
            customer_id,
            checkout_model(product_id, shipping_address_id, PaymentMethod::Razorpay),
        )
        .await
        .expect_err("gateway failure must fail the checkout");

    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn stock_race_during_placement_maps_to_insufficient_stock() {
    let customer_id = Uuid::new_v4();
    let product_id = Uuid::new_v4();
    let shipping_address_id = Uuid::new_v4();

    let mut address_repository = MockCustomerAddressRepository::new();
    address_repository
        .expect_find_owned()
        .returning(|id, customer_id| Ok(Some(address(id, customer_id))));

    let mut product_repository = MockProductRepository::new();
    product_repository
        .expect_find_by_ids()
        .returning(move |_| Ok(vec![product(product_id, "Masala Chai 500g", 10)]));

    // Precondition passed, but a concurrent checkout drained the stock before
    // the guarded decrement ran.
    let mut order_repository = MockOrderRepository::new();
    order_repository.expect_place_order().returning(move |_| {
        Err(anyhow::Error::new(InsufficientStockError { product_id }))
    });

    let payment_gateway = MockPaymentGateway::new();

    let checkout_usecase = usecase(
        address_repository,
        product_repository,
        order_repository,
        payment_gateway,
    );

    let err = checkout_usecase
        .place_order(
            customer_id,
            checkout_model(product_id, shipping_address_id, PaymentMethod::Cod),
        )
        .await
        .expect_err("in-transaction shortage must surface as insufficient stock");

    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert!(err.to_string().contains("Masala Chai 500g"));
}

#[tokio::test]
async fn unknown_product_is_rejected() {
    let customer_id = Uuid::new_v4();
    let product_id = Uuid::new_v4();
    let shipping_address_id = Uuid::new_v4();

    let mut address_repository = MockCustomerAddressRepository::new();
    address_repository
        .expect_find_owned()
        .returning(|id, customer_id| Ok(Some(address(id, customer_id))));

    let mut product_repository = MockProductRepository::new();
    product_repository
        .expect_find_by_ids()
        .returning(|_| Ok(vec![]));

    let mut order_repository = MockOrderRepository::new();
    order_repository.expect_place_order().never();

    let payment_gateway = MockPaymentGateway::new();

    let checkout_usecase = usecase(
        address_repository,
        product_repository,
        order_repository,
        payment_gateway,
    );

    let err = checkout_usecase
        .place_order(
            customer_id,
            checkout_model(product_id, shipping_address_id, PaymentMethod::Cod),
        )
        .await
        .expect_err("unknown product must not pass");

    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn empty_items_are_rejected() {
    let customer_id = Uuid::new_v4();
    let shipping_address_id = Uuid::new_v4();

    let address_repository = MockCustomerAddressRepository::new();
    let product_repository = MockProductRepository::new();
    let mut order_repository = MockOrderRepository::new();
    order_repository.expect_place_order().never();
    let payment_gateway = MockPaymentGateway::new();

    let checkout_usecase = usecase(
        address_repository,
        product_repository,
        order_repository,
        payment_gateway,
    );

    let mut model = checkout_model(Uuid::new_v4(), shipping_address_id, PaymentMethod::Cod);
    model.items.clear();

    let err = checkout_usecase
        .place_order(customer_id, model)
        .await
        .expect_err("empty items must not pass");

    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
}

#[test]
fn order_numbers_are_prefixed_and_distinct() {
    let first = generate_order_number();
    let second = generate_order_number();

    assert!(first.starts_with("ORD-"));
    assert_eq!(first.len(), "ORD-20250114-X7K2PQ".len());
    assert_ne!(first, second);
}

#[test]
fn minor_unit_conversion_is_exact_at_paise_precision() {
    let amount = "1050.50".parse::<BigDecimal>().unwrap();
    assert_eq!(to_minor_units(&amount), Some(105_050));

    assert_eq!(to_minor_units(&BigDecimal::from(1000)), Some(100_000));
}
