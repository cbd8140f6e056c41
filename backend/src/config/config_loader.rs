use anyhow::{Ok, Result};

use super::config_model::{DotEnvyConfig, SessionSecret};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = super::config_model::BackendServer {
        port: std::env::var("SERVER_PORT_BACKEND")
            .expect("SERVER_PORT_BACKEND is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = super::config_model::Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let razorpay = super::config_model::Razorpay {
        key_id: std::env::var("RAZORPAY_KEY_ID").expect("RAZORPAY_KEY_ID is invalid"),
        key_secret: std::env::var("RAZORPAY_KEY_SECRET").expect("RAZORPAY_KEY_SECRET is invalid"),
        currency: std::env::var("RAZORPAY_CURRENCY").unwrap_or_else(|_| "INR".to_string()),
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        razorpay,
    })
}

pub fn get_session_secret() -> Result<SessionSecret> {
    dotenvy::dotenv().ok();

    Ok(SessionSecret {
        secret: std::env::var("JWT_SESSION_SECRET").expect("JWT_SESSION_SECRET is invalid"),
    })
}
