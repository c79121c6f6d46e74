//! Authorization gate
//!
//! Turns the bearer token of a request into a [`Caller`]:
//! token present → signature and expiry verified → subject loaded from the
//! account store. The caller's role is read from the stored account, not
//! from the token, so role changes apply without reissuing tokens.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{ApiError, ApiResult, AuthFailure};
use crate::models::{Account, Role};
use crate::services::auth::AuthService;
use crate::store::Gateway;

/// Identity injected into the resolution context once the gate passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub role: Role,
}

impl Caller {
    /// Fail with `Forbidden` unless the caller holds `role`
    pub fn require_role(&self, role: Role) -> ApiResult<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(ApiError::requires_role(role))
        }
    }
}

#[derive(Clone)]
pub struct AuthGate {
    auth: AuthService,
    accounts: Arc<dyn Gateway<Account>>,
}

impl AuthGate {
    pub fn new(auth: AuthService, accounts: Arc<dyn Gateway<Account>>) -> Self {
        Self { auth, accounts }
    }

    /// Resolve the caller behind a bearer token
    ///
    /// # Errors
    /// - `AuthFailure::MissingCredentials` when no token was sent
    /// - `AuthFailure::InvalidToken` when verification fails for any reason
    /// - `AuthFailure::UnknownAccount` when the subject has no account
    pub async fn authenticate(&self, token: Option<&str>) -> ApiResult<Caller> {
        let token = token.ok_or(ApiError::Unauthenticated(AuthFailure::MissingCredentials))?;
        let claims = self.auth.verify_token(token)?;

        let account = self
            .accounts
            .find_by_id(claims.sub)
            .await?
            .ok_or(ApiError::Unauthenticated(AuthFailure::UnknownAccount))?;

        tracing::debug!(account_id = %account.id, role = %account.role, "Caller authenticated");

        Ok(Caller {
            id: account.id,
            role: account.role,
        })
    }
}
