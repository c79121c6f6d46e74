//! Account models and authentication token structures
//!
//! This module contains:
//! - Account records with their role
//! - Insert/patch shapes used by the store gateway
//! - JWT claims carried by bearer tokens

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account role, gating which mutations an account may perform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_role")]
pub enum Role {
    Administrator,
    Creator,
    #[default]
    Enjoyer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Administrator => write!(f, "Administrator"),
            Self::Creator => write!(f, "Creator"),
            Self::Enjoyer => write!(f, "Enjoyer"),
        }
    }
}

/// Account record from the accounts collection
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    /// Unique account identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address (unique, stored lowercased)
    pub email: String,

    /// Argon2 hashed password
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Role deciding mutation eligibility
    pub role: Role,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last profile update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Partial update applied by `updateAccount`
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl AccountPatch {
    /// True when the patch would not change anything
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: Uuid,

    /// Account email
    pub email: String,

    /// Account display name
    pub name: String,

    /// Account role at issuance
    pub role: Role,

    /// Issued at timestamp (Unix epoch)
    pub iat: i64,

    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl Claims {
    /// Create claims for an account, expiring `ttl_secs` from now
    pub fn new(account: &Account, ttl_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: account.id,
            email: account.email.clone(),
            name: account.name.clone(),
            role: account.role,
            iat: now,
            exp: now + ttl_secs,
        }
    }
}
