use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::{axum_http::error_responses::AppError, config::config_loader};

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

/// The resolved caller identity. Credential issuance (OTP, password, token
/// refresh) lives in the identity service; this backend only verifies.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: String,
}

pub fn validate_session_jwt(token: &str) -> anyhow::Result<SessionClaims> {
    let session_secret = config_loader::get_session_secret()?;

    let decoding_key = DecodingKey::from_secret(session_secret.secret.as_bytes());
    let validation = Validation::new(jsonwebtoken::Algorithm::HS256);

    let token_data = decode::<SessionClaims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;

    Ok(token_data.claims)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .ok_or_else(|| {
                warn!("auth: missing Authorization header");
                AppError::Unauthorized
            })?;

        let auth_str = auth_header.to_str().map_err(|_| {
            warn!("auth: Authorization header is not valid UTF-8");
            AppError::Unauthorized
        })?;

        let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
            warn!("auth: Authorization header is not a Bearer token");
            AppError::Unauthorized
        })?;

        let claims = validate_session_jwt(token).map_err(|err| {
            warn!(error = %err, "auth: session token rejected");
            AppError::Unauthorized
        })?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            warn!("auth: token subject is not a valid user id");
            AppError::Unauthorized
        })?;

        Ok(AuthUser {
            user_id,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests;
