//! Storage seam for the paginator
//!
//! # Features
//!
//! - **Fetch contract**: [`PaginationRepository`] with a bounded fetch (keyset
//!   mode) and a counted fetch (offset mode)
//! - **Entity contract**: [`Pageable`] declares sortable fields and the cursor
//!   identifier
//! - **Structured errors**: [`RepositoryError`] with operation and kind
//! - **In-memory adapter**: [`InMemoryRepository`] evaluates a
//!   [`QuerySpec`](crate::query::QuerySpec) over entities implementing
//!   [`FieldAccess`]

mod error;
mod memory;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::InMemoryRepository;
pub use traits::{FieldAccess, PaginationRepository, Pageable, RepositoryResult};
