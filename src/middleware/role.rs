use crate::middleware::auth::OperatorClaims;
use crate::common::response::ApiError;
use axum::{
    extract::{Request, Extension},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

pub const ADMIN_ROLE: &str = "ADMIN";

pub async fn admin_guard(
    Extension(claims): Extension<OperatorClaims>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if claims.role != ADMIN_ROLE {
        return Err(ApiError("Forbidden: Admin access required".to_string(), StatusCode::FORBIDDEN));
    }

    Ok(next.run(req).await)
}
