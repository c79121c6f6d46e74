//! Authentication and role guards for root operations
//!
//! Every gated root field runs [`AuthGuard`] before its resolver. The guard
//! authenticates the caller through the request scope (once per request)
//! and, when a role is required, rejects callers holding another role.

use async_graphql::{Context, ErrorExtensions, Guard};

use crate::graphql::scope;
use crate::models::Role;

/// Guard for root queries and mutations
///
/// # Example
///
/// ```ignore
/// #[Object]
/// impl MediaItemMutation {
///     #[graphql(guard = "AuthGuard::role(Role::Administrator)")]
///     async fn create_media_item(&self, ctx: &Context<'_>, input: CreateMediaItemInput) -> Result<MediaItem> {
///         // ...
///     }
/// }
/// ```
pub struct AuthGuard {
    required_role: Option<Role>,
}

impl AuthGuard {
    /// Any authenticated caller
    pub fn authenticated() -> Self {
        Self {
            required_role: None,
        }
    }

    /// Authenticated caller holding exactly `role`
    pub fn role(role: Role) -> Self {
        Self {
            required_role: Some(role),
        }
    }
}

impl Guard for AuthGuard {
    async fn check(&self, ctx: &Context<'_>) -> async_graphql::Result<()> {
        let caller = scope::caller(ctx).await?;

        if let Some(role) = self.required_role {
            caller.require_role(role).map_err(|e| {
                tracing::warn!(
                    account_id = %caller.id,
                    role = %caller.role,
                    required = %role,
                    "Role check failed"
                );
                e.extend()
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_constructors() {
        assert_eq!(AuthGuard::authenticated().required_role, None);
        assert_eq!(
            AuthGuard::role(Role::Creator).required_role,
            Some(Role::Creator)
        );
    }
}
