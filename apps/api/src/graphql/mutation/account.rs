//! Account self-service mutations

use async_graphql::{Context, ErrorExtensions, InputObject, Object, Result};

use crate::graphql::guards::AuthGuard;
use crate::graphql::scope;
use crate::graphql::types::Account;
use crate::services::{AuthService, ProfileUpdate};

/// Fields to change on the caller's own account
#[derive(Debug, Default, InputObject)]
pub struct UpdateAccountInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Default)]
pub struct AccountMutation;

#[Object]
impl AccountMutation {
    /// Update the authenticated account
    ///
    /// Role and id cannot be changed. Returns `null` if the account vanished
    /// after authentication.
    #[graphql(guard = "AuthGuard::authenticated()")]
    async fn update_account(
        &self,
        ctx: &Context<'_>,
        patch: UpdateAccountInput,
    ) -> Result<Option<Account>> {
        let caller = scope::caller(ctx).await?;
        let auth = ctx.data::<AuthService>()?;

        let account = auth
            .update_profile(
                caller.id,
                ProfileUpdate {
                    name: patch.name,
                    email: patch.email,
                    password: patch.password,
                },
            )
            .await
            .map_err(|e| e.extend())?;

        Ok(account.map(Account::new))
    }
}
