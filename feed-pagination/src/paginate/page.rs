//! Offset pagination

use serde::Serialize;

use crate::error::Result;
use crate::query::QuerySpec;
use crate::repository::{Pageable, PaginationRepository};

/// One page of an offset listing
///
/// Serializes as `{"data": [...], "total": n}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResult<T> {
    /// Rows of the requested page
    pub data: Vec<T>,
    /// Number of rows matching the filters, regardless of limit and offset
    pub total: u64,
}

/// Run one counted fetch for `spec`
pub async fn paginate<T, R>(repo: &R, spec: &QuerySpec) -> Result<PageResult<T>>
where
    T: Pageable,
    R: PaginationRepository<T>,
{
    let (data, total) = repo
        .find_many_with_count(spec)
        .await
        .map_err(|e| e.with_default_entity(T::ENTITY))?;

    tracing::debug!(
        entity = T::ENTITY,
        rows = data.len(),
        total,
        offset = ?spec.offset,
        "Fetched offset page"
    );

    Ok(PageResult { data, total })
}
