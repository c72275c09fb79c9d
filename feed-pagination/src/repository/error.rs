//! Repository error types
//!
//! Storage adapters report failures with [`RepositoryError`]. The pagination
//! engine never inspects or retries them; they reach the caller wrapped in
//! [`Error::Storage`](crate::error::Error::Storage).
//!
//! # Example
//!
//! ```rust
//! use feed_pagination::repository::{RepositoryError, RepositoryErrorKind};
//!
//! let error = RepositoryError::connection_failed("connection refused");
//! assert!(matches!(error.kind, RepositoryErrorKind::ConnectionFailed));
//! assert!(error.is_retriable());
//! ```

use std::fmt;

/// Fetch being performed when the repository error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Bounded fetch used by keyset pagination
    FindMany,
    /// Counted fetch used by offset pagination
    FindManyWithCount,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FindMany => write!(f, "find_many"),
            Self::FindManyWithCount => write!(f, "find_many_with_count"),
        }
    }
}

/// Category of repository error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// Failed to connect to the store
    ConnectionFailed,
    /// Operation timed out
    Timeout,
    /// The store rejected or failed the query
    DatabaseError,
    /// A row could not be decoded into the entity
    SerializationError,
    /// Other unclassified error
    Other,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::DatabaseError => write!(f, "database_error"),
            Self::SerializationError => write!(f, "serialization_error"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured repository error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// The fetch being performed when the error occurred
    pub operation: RepositoryOperation,
    /// The category of error
    pub kind: RepositoryErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity being listed (e.g., "Post", "Comment")
    pub entity_type: Option<String>,
}

impl RepositoryError {
    /// Create a new repository error
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
        }
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::new(
            RepositoryOperation::FindMany,
            RepositoryErrorKind::ConnectionFailed,
            message,
        )
    }

    /// Create a timeout error
    pub fn timeout(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Timeout, message)
    }

    /// Create a database error
    pub fn database_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::DatabaseError, message)
    }

    /// Create a serialization error
    pub fn serialization_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::SerializationError, message)
    }

    /// Attach the entity type being listed
    #[must_use]
    pub fn with_entity(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }

    /// Attach the entity type unless the adapter already named one
    #[must_use]
    pub fn with_default_entity(self, entity_type: impl Into<String>) -> Self {
        match self.entity_type {
            Some(_) => self,
            None => self.with_entity(entity_type),
        }
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: RepositoryOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Check if this error is transient
    ///
    /// The engine itself never retries; callers owning a retry policy use this.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout
        )
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let Some(ref entity_type) = self.entity_type {
            write!(f, " [{}]", entity_type)?;
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}
