use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "admin-session";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminClaims {
    pub sub: String,
    pub username: String,
    pub role: String,
    pub exp: usize,
}

/// Session gate for staff-only routes. The credential is an HS256 JWT
/// carried in the `admin-session` httponly cookie; expiry is validated
/// by the decoder. Decoded claims are injected into request extensions.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 1. Extract session cookie
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .ok_or_else(|| AppError::AuthError("Unauthorized".to_string()))?;

    // 2. Decode and validate JWT
    let token_data = decode::<AdminClaims>(
        &token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Unauthorized".to_string()))?;

    // 3. Inject claims
    req.extensions_mut().insert(token_data.claims);

    Ok(next.run(req).await)
}
