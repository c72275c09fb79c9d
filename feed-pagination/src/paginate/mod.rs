//! Pagination facade
//!
//! [`Paginator`] is the single entry point for list endpoints. A request with
//! a `page` parameter is served by the offset strategy ([`page`]); anything
//! else by the keyset strategy ([`cursor`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{extract::{Path, Query, State}, routing::get, Router};
//! use feed_pagination::prelude::*;
//!
//! async fn list_comments(
//!     State(state): State<AppState>,
//!     Path(post_id): Path<i64>,
//!     Query(params): Query<QueryParams>,
//! ) -> Result<Paginated<Comment>> {
//!     let base = [FilterCondition::eq("post.id", post_id)];
//!     let path = format!("/posts/{post_id}/comments");
//!     state.paginator.paginate(params, &state.comments, &base, &path).await
//! }
//! ```

pub mod cursor;
pub mod page;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::config::{Config, PaginationConfig};
use crate::error::Result;
use crate::query::{FilterCondition, PaginationRequest, QueryComposer, QueryParams};
use crate::repository::{Pageable, PaginationRepository};

pub use cursor::{Cursor, CursorResult};
pub use page::PageResult;

/// Result of either pagination strategy
///
/// Serializes as the inner result, with no wrapper or tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Paginated<T> {
    /// Offset page (`page` was given)
    Page(PageResult<T>),
    /// Keyset page
    Cursor(CursorResult<T>),
}

impl<T> Paginated<T> {
    /// Rows of this page
    pub fn data(&self) -> &[T] {
        match self {
            Self::Page(page) => &page.data,
            Self::Cursor(cursor) => &cursor.data,
        }
    }

    /// Consume the result, returning its rows
    pub fn into_data(self) -> Vec<T> {
        match self {
            Self::Page(page) => page.data,
            Self::Cursor(cursor) => cursor.data,
        }
    }
}

impl<T: Serialize> IntoResponse for Paginated<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Strategy dispatcher
///
/// Holds only configuration; each call performs exactly one repository fetch
/// and shares no state with other calls.
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    config: PaginationConfig,
}

impl Paginator {
    /// Create a paginator with the given settings
    pub fn new(config: PaginationConfig) -> Self {
        Self { config }
    }

    /// Create a paginator from the loaded service configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.pagination.clone())
    }

    /// The paginator's settings
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Extract a [`PaginationRequest`] using the configured page size limits
    pub fn request(&self, params: QueryParams) -> Result<PaginationRequest> {
        PaginationRequest::from_params_with(params, &self.config)
    }

    /// Paginate `repo` according to the raw query parameters
    ///
    /// `base` predicates are always applied and cannot be overridden by the
    /// client. `path` is the route continuation links point at.
    pub async fn paginate<T, R>(
        &self,
        params: QueryParams,
        repo: &R,
        base: &[FilterCondition],
        path: &str,
    ) -> Result<Paginated<T>>
    where
        T: Pageable,
        R: PaginationRepository<T>,
    {
        let request = self.request(params)?;
        self.paginate_request(&request, repo, base, path).await
    }

    /// Paginate `repo` for an already extracted request
    pub async fn paginate_request<T, R>(
        &self,
        request: &PaginationRequest,
        repo: &R,
        base: &[FilterCondition],
        path: &str,
    ) -> Result<Paginated<T>>
    where
        T: Pageable,
        R: PaginationRepository<T>,
    {
        let spec = QueryComposer::new(base).compose::<T>(request)?;

        if request.is_offset() {
            tracing::debug!(entity = T::ENTITY, page = ?request.page, take = request.take, "Using offset pagination");
            Ok(Paginated::Page(page::paginate(repo, &spec).await?))
        } else {
            tracing::debug!(entity = T::ENTITY, take = request.take, "Using keyset pagination");
            let base_url = self.config.base_url();
            let result = cursor::paginate(repo, &spec, request, &base_url, path).await?;
            Ok(Paginated::Cursor(result))
        }
    }
}
