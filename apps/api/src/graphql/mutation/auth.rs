//! Authentication mutations
//!
//! - signup: create an account (open)
//! - login: exchange email and password for a bearer token (open)

use async_graphql::{Context, ErrorExtensions, InputObject, Object, Result};

use crate::graphql::types::{Account, AccountRole, Token};
use crate::services::{AuthService, Signup};

/// Input for account signup
#[derive(Debug, InputObject)]
pub struct SignupInput {
    /// Display name
    pub name: String,
    /// Email address (must be unique, case-insensitive)
    pub email: String,
    /// Password (minimum 8 characters)
    pub password: String,
    /// Requested role, `Enjoyer` when omitted
    pub role: Option<AccountRole>,
}

#[derive(Debug, InputObject)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Default)]
pub struct AuthMutation;

#[Object]
impl AuthMutation {
    /// Create a new account
    ///
    /// # Errors
    /// - `CONFLICT` when the email is already registered
    /// - `VALIDATION_ERROR` for a malformed email, short password or blank name
    async fn signup(&self, ctx: &Context<'_>, input: SignupInput) -> Result<Account> {
        let auth = ctx.data::<AuthService>()?;

        let account = auth
            .signup(Signup {
                name: input.name,
                email: input.email,
                password: input.password,
                role: input.role.map(Into::into),
            })
            .await
            .map_err(|e| e.extend())?;

        Ok(Account::new(account))
    }

    /// Log in and receive a bearer token
    ///
    /// # Errors
    /// - `USER_NOT_FOUND` when no account has this email
    /// - `INCORRECT_PASSWORD` when the password does not match
    async fn login(&self, ctx: &Context<'_>, input: LoginInput) -> Result<Token> {
        let auth = ctx.data::<AuthService>()?;

        let (_, token) = auth
            .login(&input.email, &input.password)
            .await
            .map_err(|e| e.extend())?;

        Ok(Token { token })
    }
}
