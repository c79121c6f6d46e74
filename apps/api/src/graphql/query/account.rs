//! Account queries
//!
//! - me: the authenticated caller's own account
//! - listAccounts: composed list over the accounts collection
//! - getAccount: one account by id

use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

use crate::error::ApiError;
use crate::graphql::composer::{
    AccountFilterInput, AccountSortInput, ListRequest, PaginationInput,
};
use crate::graphql::guards::AuthGuard;
use crate::graphql::ids::parse_id;
use crate::graphql::scope;
use crate::graphql::types::Account;
use crate::store::Store;

#[derive(Default)]
pub struct AccountQuery;

#[Object]
impl AccountQuery {
    /// The currently authenticated account
    ///
    /// # Errors
    /// - `UNAUTHENTICATED` when the request carries no valid token
    #[graphql(guard = "AuthGuard::authenticated()")]
    async fn me(&self, ctx: &Context<'_>) -> Result<Account> {
        let caller = scope::caller(ctx).await?;
        let account = scope::loaders(ctx)?
            .account(caller.id)
            .await
            .map_err(|e| e.extend())?
            .ok_or_else(|| ApiError::not_found("account", caller.id.to_string()).extend())?;

        Ok(Account::new(account))
    }

    /// List accounts
    ///
    /// Only one of pagination, filter and sorting applies, in that order.
    #[graphql(guard = "AuthGuard::authenticated()")]
    async fn list_accounts(
        &self,
        ctx: &Context<'_>,
        pagination: Option<PaginationInput>,
        filter: Option<AccountFilterInput>,
        sorting: Option<AccountSortInput>,
    ) -> Result<Vec<Account>> {
        let store = ctx.data::<Store>()?;
        let plan = ListRequest {
            pagination,
            filter: filter.and_then(AccountFilterInput::recognize),
            sorting: sorting.and_then(AccountSortInput::recognize),
        }
        .compose()
        .map_err(|e| e.extend())?;

        tracing::debug!(?plan, "Listing accounts");

        let accounts = plan
            .execute(store.accounts.as_ref())
            .await
            .map_err(|e| e.extend())?;

        Ok(accounts.into_iter().map(Account::new).collect())
    }

    /// Get an account by id, `null` when it does not exist
    #[graphql(guard = "AuthGuard::authenticated()")]
    async fn get_account(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Account>> {
        let store = ctx.data::<Store>()?;
        let id = parse_id(&id).map_err(|e| e.extend())?;

        let account = store
            .accounts
            .find_by_id(id)
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        Ok(account.map(Account::new))
    }
}
