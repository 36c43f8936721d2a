//! Custom Axum extractors.

use super::error::AppError;
use super::state::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

/// Header carrying the admin password
pub const ADMIN_PASSWORD_HEADER: &str = "X-Admin-Password";

/// Proof that the request carried the admin password.
///
/// Rejects with 401 when the `X-Admin-Password` header is missing or wrong.
///
/// ```ignore
/// async fn handler(_admin: AdminAccess, State(state): State<AppState>) { .. }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess;

#[async_trait]
impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let candidate = parts
            .headers
            .get(ADMIN_PASSWORD_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        state.admin.verify(candidate).map_err(|err| {
            tracing::warn!(path = %parts.uri.path(), "Rejected admin request");
            AppError::from(err)
        })?;

        Ok(Self)
    }
}
