//! Error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::repository::RepositoryError;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Pagination engine error
///
/// Every variant except [`Error::InvalidSortKey`], [`Error::Storage`],
/// [`Error::InvalidBaseUrl`] and [`Error::Config`] is caused by the client's
/// query string. Use [`Error::is_client_error`] to tell them apart.
#[derive(Debug, Error)]
pub enum Error {
    /// A `where__`/`order__` key did not split into one or two segments
    #[error("Malformed filter key '{key}': expected <prefix>__<field> or <prefix>__<field>__<operator>")]
    MalformedFilterKey {
        /// The offending query key
        key: String,
    },

    /// The operator segment of a `where__` key is not in the operator table
    #[error("Invalid filter operator '{operator}' in key '{key}'")]
    InvalidFilterOperator {
        /// The offending query key
        key: String,
        /// The unknown operator token
        operator: String,
    },

    /// The value of a `where__` key cannot be used with its operator
    #[error("Invalid filter value for key '{key}': {reason}")]
    InvalidFilterValue {
        /// The offending query key
        key: String,
        /// Why the value was rejected
        reason: String,
    },

    /// An `order__` value other than `ASC` or `DESC`
    #[error("Invalid sort direction '{value}' for key '{key}': expected ASC or DESC")]
    InvalidSortDirection {
        /// The offending query key
        key: String,
        /// The rejected value
        value: String,
    },

    /// `take` is not a positive integer
    #[error("Invalid take value '{0}': must be a positive integer")]
    InvalidTakeValue(String),

    /// `page` is not a positive integer
    #[error("Invalid page value '{0}': must be a positive integer")]
    InvalidPageValue(String),

    /// The requested sort field is not sortable on the entity
    #[error("Invalid sort key '{field}' for {entity}")]
    InvalidSortKey {
        /// Entity name
        entity: &'static str,
        /// Requested sort field
        field: String,
    },

    /// The repository call failed
    #[error("{0}")]
    Storage(#[from] RepositoryError),

    /// The configured base URL for continuation links is unusable
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),
}

impl Error {
    /// Check if the error was caused by the request rather than the server
    ///
    /// ```rust
    /// use feed_pagination::error::Error;
    ///
    /// assert!(Error::InvalidTakeValue("0".to_string()).is_client_error());
    /// assert!(!Error::InvalidSortKey { entity: "Post", field: "x".into() }.is_client_error());
    /// ```
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedFilterKey { .. }
                | Error::InvalidFilterOperator { .. }
                | Error::InvalidFilterValue { .. }
                | Error::InvalidSortDirection { .. }
                | Error::InvalidTakeValue(_)
                | Error::InvalidPageValue(_)
        )
    }

    /// Machine-readable error code used in HTTP error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Error::MalformedFilterKey { .. } => "MALFORMED_FILTER_KEY",
            Error::InvalidFilterOperator { .. } => "INVALID_FILTER_OPERATOR",
            Error::InvalidFilterValue { .. } => "INVALID_FILTER_VALUE",
            Error::InvalidSortDirection { .. } => "INVALID_SORT_DIRECTION",
            Error::InvalidTakeValue(_) => "INVALID_TAKE_VALUE",
            Error::InvalidPageValue(_) => "INVALID_PAGE_VALUE",
            Error::InvalidSortKey { .. } => "INVALID_SORT_KEY",
            Error::Storage(_) => "STORAGE_ERROR",
            Error::InvalidBaseUrl(_) => "INVALID_BASE_URL",
            Error::Config(_) => "CONFIG_ERROR",
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Optional error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// HTTP status code
    pub status: u16,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
            status: status.as_u16(),
        }
    }

    /// Create error response with a code
    pub fn with_code(
        status: StatusCode,
        code: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
            status: status.as_u16(),
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let code = self.code();

        let (status, error_response) = match self {
            ref e if e.is_client_error() => {
                tracing::warn!(code, "Rejected pagination request: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_code(StatusCode::BAD_REQUEST, code, e.to_string()),
                )
            }

            Error::Storage(ref e) => {
                tracing::error!(
                    operation = %e.operation,
                    kind = %e.kind,
                    entity_type = ?e.entity_type,
                    retriable = e.is_retriable(),
                    "Repository error: {}", e.message
                );

                let (status, message) = if e.is_retriable() {
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Service temporarily unavailable",
                    )
                } else {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Storage operation failed",
                    )
                };

                (status, ErrorResponse::with_code(status, code, message))
            }

            e => {
                tracing::error!(code, "Pagination misconfigured: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_code(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        code,
                        "Internal server error",
                    ),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

// Manual From implementation for the boxed figment error
impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}
