//! Account GraphQL type
//!
//! Password hashes are never exposed.

use async_graphql::{Enum, Object, ID};
use chrono::{DateTime, Utc};

use crate::graphql::ids::to_id;
use crate::models::{Account as DbAccount, Role};

/// Account role enum for GraphQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[graphql(rename_items = "PascalCase")]
pub enum AccountRole {
    /// May create media items
    Administrator,
    /// May create collections
    Creator,
    /// Listens only
    Enjoyer,
}

impl From<Role> for AccountRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Administrator => Self::Administrator,
            Role::Creator => Self::Creator,
            Role::Enjoyer => Self::Enjoyer,
        }
    }
}

impl From<AccountRole> for Role {
    fn from(role: AccountRole) -> Self {
        match role {
            AccountRole::Administrator => Self::Administrator,
            AccountRole::Creator => Self::Creator,
            AccountRole::Enjoyer => Self::Enjoyer,
        }
    }
}

/// Account information exposed via GraphQL
pub struct Account {
    inner: DbAccount,
}

impl Account {
    pub fn new(account: DbAccount) -> Self {
        Self { inner: account }
    }
}

impl From<DbAccount> for Account {
    fn from(account: DbAccount) -> Self {
        Self::new(account)
    }
}

#[Object]
impl Account {
    async fn id(&self) -> ID {
        to_id(self.inner.id)
    }

    async fn name(&self) -> &str {
        &self.inner.name
    }

    async fn email(&self) -> &str {
        &self.inner.email
    }

    async fn role(&self) -> AccountRole {
        self.inner.role.into()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.inner.updated_at
    }
}
