//! Per-request resolution context
//!
//! The HTTP handler attaches one [`RequestScope`] to every GraphQL request.
//! It carries the bearer token, a caller slot the gate fills at most once,
//! and a fresh set of [`Loaders`]. It is never reused across requests.

use async_graphql::{Context, ErrorExtensions, Request};
use tokio::sync::OnceCell;

use crate::error::ApiResult;
use crate::graphql::loaders::Loaders;
use crate::services::{AuthGate, Caller};
use crate::store::Store;

pub struct RequestScope {
    token: Option<String>,
    caller: OnceCell<Caller>,
    loaders: Loaders,
}

impl RequestScope {
    pub fn new(token: Option<String>, store: &Store) -> Self {
        Self {
            token,
            caller: OnceCell::new(),
            loaders: Loaders::new(store),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn loaders(&self) -> &Loaders {
        &self.loaders
    }

    /// Run the gate once per request and remember the caller
    pub async fn caller(&self, gate: &AuthGate) -> ApiResult<Caller> {
        self.caller
            .get_or_try_init(|| gate.authenticate(self.token()))
            .await
            .copied()
    }

    /// Attach a fresh scope to a GraphQL request
    pub fn attach(request: Request, token: Option<String>, store: &Store) -> Request {
        request.data(Self::new(token, store))
    }
}

/// The request's scope from the resolver context
pub fn request_scope<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a RequestScope> {
    ctx.data::<RequestScope>()
}

/// The request's loaders from the resolver context
pub fn loaders<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Loaders> {
    Ok(request_scope(ctx)?.loaders())
}

/// Authenticated caller of the current request
pub async fn caller(ctx: &Context<'_>) -> async_graphql::Result<Caller> {
    let gate = ctx.data::<AuthGate>()?;
    request_scope(ctx)?
        .caller(gate)
        .await
        .map_err(|e| e.extend())
}
