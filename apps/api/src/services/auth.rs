//! Authentication service for Mixtape
//!
//! This module provides:
//! - Account signup with Argon2id password hashing
//! - Login returning a signed HS256 bearer token
//! - Token verification for the authorization gate
//! - Self-service profile updates

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult, AuthFailure};
use crate::models::{Account, AccountPatch, Claims, NewAccount, Role};
use crate::store::{Field, Filter, Gateway};

/// Default token lifetime: one day
const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 3600;

/// Minimum accepted password length
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token TTL in seconds (default: 1 day)
    pub token_ttl_secs: i64,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    /// Create AuthConfig from an expiry string (e.g., "1d", "12h")
    pub fn with_expiry_string(jwt_secret: impl Into<String>, expiry: &str) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_secs: parse_duration_string(expiry).unwrap_or(DEFAULT_TOKEN_TTL_SECS),
        }
    }
}

/// Parse duration strings like "15m", "7d", "24h" to seconds
fn parse_duration_string(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (split, _) = s.char_indices().next_back()?;
    let (num_str, unit) = s.split_at(split);
    let num: i64 = num_str.parse().ok()?;

    match unit {
        "s" => Some(num),
        "m" => Some(num * 60),
        "h" => Some(num * 3600),
        "d" => Some(num * 24 * 3600),
        "w" => Some(num * 7 * 24 * 3600),
        _ => None,
    }
}

/// Signup request
#[derive(Debug, Clone)]
pub struct Signup {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Requested role; `Enjoyer` when absent
    pub role: Option<Role>,
}

/// Self-update request; only the given fields change
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Authentication service providing signup, login and token handling
#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn Gateway<Account>>,
    config: AuthConfig,
    argon2: Argon2<'static>,
}

impl AuthService {
    pub fn new(accounts: Arc<dyn Gateway<Account>>, config: AuthConfig) -> Self {
        Self {
            accounts,
            config,
            argon2: Argon2::default(),
        }
    }

    /// Create a new account
    ///
    /// # Errors
    /// - `ApiError::Conflict` if the email is already registered
    /// - `ApiError::ValidationError` if email or password is invalid
    pub async fn signup(&self, request: Signup) -> ApiResult<Account> {
        let email = normalize_email(&request.email);
        validate_email(&email)?;
        validate_password(&request.password)?;
        let name = validate_name(&request.name)?;

        if self.find_by_email(&email).await?.is_some() {
            return Err(ApiError::conflict("account", email));
        }

        let password_hash = self.hash_password(&request.password)?;

        let account = self
            .accounts
            .create(NewAccount {
                name,
                email,
                password_hash,
                role: request.role.unwrap_or_default(),
            })
            .await?;

        tracing::info!(
            account_id = %account.id,
            email = %account.email,
            role = %account.role,
            "Account signed up"
        );

        Ok(account)
    }

    /// Authenticate by email and password, returning the account and a bearer token
    ///
    /// # Errors
    /// - `ApiError::UserNotFound` if no account has this email
    /// - `ApiError::IncorrectPassword` if the password does not match
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<(Account, String)> {
        let email = normalize_email(email);

        let Some(account) = self.find_by_email(&email).await? else {
            tracing::warn!(email = %email, "Login failed: user not found");
            return Err(ApiError::UserNotFound);
        };

        if !self.verify_password(password, &account.password_hash)? {
            tracing::warn!(account_id = %account.id, "Login failed: incorrect password");
            return Err(ApiError::IncorrectPassword);
        }

        let token = self.issue_token(&account)?;
        tracing::info!(account_id = %account.id, "Account logged in");

        Ok((account, token))
    }

    /// Apply a self-update to the caller's own account
    pub async fn update_profile(
        &self,
        account_id: Uuid,
        update: ProfileUpdate,
    ) -> ApiResult<Option<Account>> {
        let mut patch = AccountPatch {
            name: update.name.as_deref().map(validate_name).transpose()?,
            ..Default::default()
        };

        if let Some(email) = update.email {
            let email = normalize_email(&email);
            validate_email(&email)?;
            if let Some(existing) = self.find_by_email(&email).await? {
                if existing.id != account_id {
                    return Err(ApiError::conflict("account", email));
                }
            }
            patch.email = Some(email);
        }

        if let Some(password) = update.password {
            validate_password(&password)?;
            patch.password_hash = Some(self.hash_password(&password)?);
        }

        if patch.is_empty() {
            return Ok(self.accounts.find_by_id(account_id).await?);
        }

        let updated = self.accounts.update_by_id(account_id, patch).await?;
        if let Some(account) = &updated {
            tracing::info!(account_id = %account.id, "Account updated");
        }
        Ok(updated)
    }

    /// Sign a token for an account
    pub fn issue_token(&self, account: &Account) -> ApiResult<String> {
        let claims = Claims::new(account, self.config.token_ttl_secs);
        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )?)
    }

    /// Verify a bearer token and return its claims
    ///
    /// Malformed, expired and wrongly signed tokens are all reported as
    /// `AuthFailure::InvalidToken`.
    pub fn verify_token(&self, token: &str) -> ApiResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "Token verification failed");
            ApiError::Unauthenticated(AuthFailure::InvalidToken)
        })?;

        Ok(token_data.claims)
    }

    async fn find_by_email(&self, email: &str) -> ApiResult<Option<Account>> {
        Ok(self
            .accounts
            .find_one(&Filter::Equals(Field::Email, email.to_string()))
            .await?)
    }

    /// Hash a password with Argon2id
    fn hash_password(&self, password: &str) -> ApiResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Verify a password against an Argon2id hash
    fn verify_password(&self, password: &str, hash: &str) -> ApiResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| ApiError::Internal(format!("Invalid password hash format: {}", e)))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> ApiResult<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ApiError::ValidationError("invalid email format".to_string()))
    }
}

fn validate_password(password: &str) -> ApiResult<()> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::ValidationError(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

fn validate_name(name: &str) -> ApiResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::ValidationError("name must not be empty".to_string()));
    }
    Ok(name.to_string())
}

/// Simple email validation
fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > 254 {
        return false;
    }

    // Must have exactly one @ symbol
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let (local, domain) = (parts[0], parts[1]);

    if local.is_empty() || local.len() > 64 {
        return false;
    }

    if domain.is_empty() || !domain.contains('.') {
        return false;
    }

    domain.split('.').all(|part| !part.is_empty())
}
