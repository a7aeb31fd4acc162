use crate::state::AppState;
use crate::common::response::ApiError;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Claims carried by operator access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorClaims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

pub fn bearer_token(value: &str) -> Option<&str> {
    value.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty())
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Extract token from header
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_header| auth_header.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_owned);

    let token = match token {
        Some(t) => t,
        None => return Err(ApiError("Unauthorized: Missing or invalid token".to_string(), StatusCode::UNAUTHORIZED)),
    };

    // 2. Check if token is blocked in Redis
    let is_blocked = state.redis.is_token_revoked(&token).await.map_err(|e| {
        warn!("Token revocation check failed: {}", e);
        ApiError("Internal Server Error: Redis unavailable".to_string(), StatusCode::INTERNAL_SERVER_ERROR)
    })?;

    if is_blocked {
        return Err(ApiError("Unauthorized: Token is blocked/revoked".to_string(), StatusCode::UNAUTHORIZED));
    }

    // 3. Verify JWT
    let claims = decode::<OperatorClaims>(
        &token,
        &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| ApiError("Unauthorized: Invalid token signature".to_string(), StatusCode::UNAUTHORIZED))?
    .claims;

    // 4. Inject claims into request extensions
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
