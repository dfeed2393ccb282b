use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{extract_bearer_token, JwtValidator};
use crate::errors::AppError;

/// The authenticated user, inserted into request extensions by
/// [`jwt_auth_middleware`] and read by handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

/// JWT authentication middleware. Every ownership filter downstream keys
/// off the user id extracted here.
pub async fn jwt_auth_middleware(
    State(validator): State<JwtValidator>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = extract_bearer_token(auth_header)?;
    let claims = validator.validate(token)?;

    request.extensions_mut().insert(AuthUser(claims.sub));

    Ok(next.run(request).await)
}
