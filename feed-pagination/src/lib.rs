//! # feed-pagination
//!
//! Generic pagination and filtering for list endpoints.
//!
//! ## Features
//!
//! - **Two strategies, one entry point**: offset pages (`page` present) and
//!   keyset pages (cursor anchored on a monotonic id) behind [`Paginator`](paginate::Paginator)
//! - **Query-string filter DSL**: `where__<field>[__<operator>]=<value>` and
//!   `order__<field>=ASC|DESC`
//! - **Continuation links**: keyset pages carry a `next` URL that repeats the
//!   request with the bound moved past the last row
//! - **Storage agnostic**: any [`PaginationRepository`](repository::PaginationRepository)
//!   works; [`InMemoryRepository`](repository::InMemoryRepository) is included
//! - **axum integration**: [`QueryParams`](query::QueryParams) is a `Query`
//!   extractor target, results and errors implement `IntoResponse`
//!
//! ## Example
//!
//! ```rust,no_run
//! use axum::{extract::{Query, State}, routing::get, Router};
//! use feed_pagination::prelude::*;
//! use serde::Serialize;
//!
//! #[derive(Clone, Serialize)]
//! struct Post {
//!     id: i64,
//!     title: String,
//!     #[serde(rename = "createdAt")]
//!     created_at: i64,
//! }
//!
//! impl Pageable for Post {
//!     const ENTITY: &'static str = "Post";
//!     const SORT_KEYS: &'static [&'static str] = &["createdAt", "id", "title"];
//!
//!     fn cursor_id(&self) -> FilterValue {
//!         FilterValue::Integer(self.id)
//!     }
//! }
//!
//! impl FieldAccess for Post {
//!     fn field_value(&self, field: &str) -> Option<FilterValue> {
//!         match field {
//!             "id" => Some(self.id.into()),
//!             "title" => Some(self.title.as_str().into()),
//!             "createdAt" => Some(self.created_at.into()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! #[derive(Clone)]
//! struct AppState {
//!     paginator: Paginator,
//!     posts: InMemoryRepository<Post>,
//! }
//!
//! async fn list_posts(
//!     State(state): State<AppState>,
//!     Query(params): Query<QueryParams>,
//! ) -> Result<Paginated<Post>> {
//!     state.paginator.paginate(params, &state.posts, &[], "/posts").await
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config);
//!
//!     let state = AppState {
//!         paginator: Paginator::from_config(&config),
//!         posts: InMemoryRepository::default(),
//!     };
//!     let app: Router = Router::new()
//!         .route("/posts", get(list_posts))
//!         .with_state(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod observability;
pub mod paginate;
pub mod query;
pub mod repository;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, PaginationConfig, ServiceConfig};
    pub use crate::error::{Error, ErrorResponse, Result};
    pub use crate::observability::{init_tracing, shutdown_tracing};
    pub use crate::paginate::{Cursor, CursorResult, PageResult, Paginated, Paginator};
    pub use crate::query::{
        FilterCondition, FilterOperator, FilterParser, FilterValue, OrderDirection,
        PaginationRequest, QueryComposer, QueryParams, QuerySpec,
    };
    pub use crate::repository::{
        FieldAccess, InMemoryRepository, Pageable, PaginationRepository, RepositoryError,
        RepositoryErrorKind, RepositoryOperation, RepositoryResult,
    };
}
