//! Repository and entity trait definitions
//!
//! Storage is an external collaborator: the engine only needs a counted fetch
//! (offset mode) and a bounded fetch (keyset mode) that execute a
//! [`QuerySpec`]. The async methods use RPITIT (Return Position Impl Trait In
//! Traits) rather than `async_trait`.
//!
//! # Example
//!
//! ```rust,ignore
//! use feed_pagination::prelude::*;
//!
//! struct PostRepository {
//!     pool: PgPool,
//! }
//!
//! impl PaginationRepository<Post> for PostRepository {
//!     async fn find_many(&self, spec: &QuerySpec) -> RepositoryResult<Vec<Post>> {
//!         // Translate spec.predicates / spec.ordering / spec.limit into a query
//!         todo!()
//!     }
//!
//!     async fn find_many_with_count(&self, spec: &QuerySpec) -> RepositoryResult<(Vec<Post>, u64)> {
//!         todo!()
//!     }
//! }
//! ```

use std::future::Future;

use crate::query::{FilterValue, QuerySpec};

use super::error::RepositoryError;

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// An entity that can be listed through the paginator
///
/// # Example
///
/// ```rust
/// use feed_pagination::prelude::*;
///
/// struct Post {
///     id: i64,
/// }
///
/// impl Pageable for Post {
///     const ENTITY: &'static str = "Post";
///     const SORT_KEYS: &'static [&'static str] = &["createdAt", "likes", "id"];
///
///     fn cursor_id(&self) -> FilterValue {
///         FilterValue::Integer(self.id)
///     }
/// }
///
/// assert_eq!(Post::PRIMARY_SORT_KEY, "createdAt");
/// ```
pub trait Pageable {
    /// Entity name used in errors and logs
    const ENTITY: &'static str;

    /// Fields accepted in `order__<field>`
    const SORT_KEYS: &'static [&'static str];

    /// Sort key used, ascending, when the request has no `order__` key
    const PRIMARY_SORT_KEY: &'static str = "createdAt";

    /// The monotonic identifier a keyset page is anchored on
    fn cursor_id(&self) -> FilterValue;
}

/// Field lookup by name, for repositories that evaluate predicates in process
///
/// Dotted paths (`post.id`) address fields of a related entity.
pub trait FieldAccess {
    /// The value of `field`, or `None` if the entity has no such field
    fn field_value(&self, field: &str) -> Option<FilterValue>;
}

/// Read access to a list of entities
///
/// Implementations must honor `spec.limit` exactly and apply `spec.offset`
/// when present. Failures are returned as-is; the paginator never retries.
pub trait PaginationRepository<T>: Send + Sync {
    /// Bounded fetch used by keyset pagination
    fn find_many(&self, spec: &QuerySpec) -> impl Future<Output = RepositoryResult<Vec<T>>> + Send;

    /// Counted fetch used by offset pagination
    ///
    /// The count is the number of rows matching `spec.predicates`, ignoring
    /// limit and offset.
    fn find_many_with_count(
        &self,
        spec: &QuerySpec,
    ) -> impl Future<Output = RepositoryResult<(Vec<T>, u64)>> + Send;
}
