//! Authentication payloads

use async_graphql::SimpleObject;

/// Bearer token returned by `login`
#[derive(Debug, Clone, SimpleObject)]
pub struct Token {
    /// Signed token to send as `Authorization: Bearer <token>`
    pub token: String,
}
