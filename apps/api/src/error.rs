//! Error handling for the Mixtape API
//!
//! [`ApiError`] is the single error type of the resolver layer. Each variant
//! carries a machine-readable code which is attached to GraphQL errors as
//! `extensions.code` through [`ErrorExtensions`].

use std::sync::Arc;

use async_graphql::ErrorExtensions;
use axum::http::StatusCode;
use thiserror::Error;

use crate::store::StoreError;

/// Why a request could not be authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No bearer token on the request
    MissingCredentials,
    /// Token malformed, expired or signed with another key
    InvalidToken,
    /// Token subject does not match any account
    UnknownAccount,
}

impl std::fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "missing credentials"),
            Self::InvalidToken => write!(f, "invalid token"),
            Self::UnknownAccount => write!(f, "unauthenticated"),
        }
    }
}

/// Main API error type
#[derive(Error, Debug)]
pub enum ApiError {
    // ========== Authentication & Authorization ==========
    #[error("{0}")]
    Unauthenticated(AuthFailure),

    /// Caller is authenticated but not allowed to perform the operation
    #[error("insufficient permissions: {0}")]
    Forbidden(String),

    // ========== Resource Errors ==========
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    #[error("{resource_type} already exists: {id}")]
    Conflict {
        resource_type: &'static str,
        id: String,
    },

    // ========== Login ==========
    #[error("user not found")]
    UserNotFound,

    #[error("incorrect password")]
    IncorrectPassword,

    // ========== Validation ==========
    #[error("validation error: {0}")]
    ValidationError(String),

    // ========== Backend & Internal ==========
    /// Document store failure
    #[error("backend error: {0}")]
    Backend(Arc<StoreError>),

    #[error("internal server error: {0}")]
    Internal(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl ApiError {
    /// HTTP-equivalent status, used to pick the log severity
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound { .. } | Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::IncorrectPassword => StatusCode::UNAUTHORIZED,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::Backend(_) | Self::Internal(_) | Self::Jwt(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::IncorrectPassword => "INCORRECT_PASSWORD",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Backend(_) => "BACKEND_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Jwt(_) => "JWT_ERROR",
        }
    }

    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    pub fn conflict(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::Conflict {
            resource_type,
            id: id.into(),
        }
    }

    /// Forbidden error naming the role an operation requires
    pub fn requires_role(role: impl std::fmt::Display) -> Self {
        Self::Forbidden(format!("requires {} role", role))
    }

    /// Log the error with appropriate severity based on status code
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                code = self.error_code(),
                "Server error occurred"
            );
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(
                error = %self,
                code = self.error_code(),
                "Authorization error"
            );
        } else {
            tracing::debug!(
                error = %self,
                code = self.error_code(),
                "Client error"
            );
        }
    }

    /// Message shown to the client; server faults are not described
    fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            "An unexpected error occurred".to_string()
        } else {
            self.to_string()
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        self.log();
        let code = self.error_code();
        async_graphql::Error::new(self.public_message()).extend_with(|_, e| e.set("code", code))
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

// ========== Conversion Implementations ==========

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { collection, key } => Self::Conflict {
                resource_type: collection.as_str(),
                id: key,
            },
            other => Self::Backend(Arc::new(other)),
        }
    }
}

impl From<Arc<StoreError>> for ApiError {
    fn from(err: Arc<StoreError>) -> Self {
        Self::Backend(err)
    }
}
