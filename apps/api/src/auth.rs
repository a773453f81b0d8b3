//! Staff identity. The dashboard sits behind an auth proxy that asserts the
//! signed-in user's email in `x-staff-email`; admins are listed in `ADMIN_EMAILS`.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;
use crate::state::AppState;

pub const STAFF_EMAIL_HEADER: &str = "x-staff-email";

#[derive(Debug, Clone)]
pub struct StaffUser {
    pub email: String,
    pub is_admin: bool,
}

impl StaffUser {
    /// Priority and visibility edits are admin-only.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            tracing::warn!("Non-admin {} attempted an admin action", self.email);
            Err(AppError::Forbidden)
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for StaffUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let email = parts
            .headers
            .get(STAFF_EMAIL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_lowercase())
            .filter(|v| v.contains('@'))
            .ok_or(AppError::Unauthorized)?;

        let is_admin = state.config.is_admin(&email);
        Ok(StaffUser { email, is_admin })
    }
}
