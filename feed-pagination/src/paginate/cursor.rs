//! Keyset pagination
//!
//! A page holds at most `take` rows. When it is full, its last row becomes the
//! anchor and a continuation link is built that repeats the request with the
//! keyset bound moved past the anchor. A page with fewer rows is the last one.
//! A page that is full because exactly `take` rows remained still gets a link;
//! following it returns an empty page.

use serde::Serialize;
use url::Url;

use crate::error::Result;
use crate::query::{
    FilterValue, OrderDirection, PaginationRequest, QuerySpec, BOUNDARY_LESS_THAN,
    BOUNDARY_MORE_THAN,
};
use crate::repository::{Pageable, PaginationRepository};

/// Position of a keyset page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cursor {
    /// Identifier of the last row, if another page may follow
    pub after: Option<FilterValue>,
}

/// One page of a keyset listing
///
/// Serializes as `{"data": [...], "cursor": {"after": id|null}, "count": n, "next": url|null}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CursorResult<T> {
    /// Rows of this page
    pub data: Vec<T>,
    /// Anchor for the following page
    pub cursor: Cursor,
    /// Number of rows in `data`
    pub count: usize,
    /// Link to the following page
    pub next: Option<String>,
}

impl<T> CursorResult<T> {
    /// An empty last page
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            cursor: Cursor { after: None },
            count: 0,
            next: None,
        }
    }
}

/// Run one bounded fetch for `spec` and derive the continuation link
///
/// `base_url` is scheme and host (`http://localhost:3000`), `path` the
/// listing's route.
pub async fn paginate<T, R>(
    repo: &R,
    spec: &QuerySpec,
    request: &PaginationRequest,
    base_url: &str,
    path: &str,
) -> Result<CursorResult<T>>
where
    T: Pageable,
    R: PaginationRepository<T>,
{
    let data = repo
        .find_many(spec)
        .await
        .map_err(|e| e.with_default_entity(T::ENTITY))?;
    let count = data.len();

    let anchor = if count as u64 == spec.limit {
        data.last().map(T::cursor_id)
    } else {
        None
    };

    let next = match &anchor {
        Some(anchor) => {
            let direction = spec
                .primary_order()
                .map(|(_, direction)| direction)
                .unwrap_or_default();
            Some(next_link(base_url, path, request, direction, anchor)?)
        }
        None => None,
    };

    tracing::debug!(
        entity = T::ENTITY,
        rows = count,
        after = ?anchor,
        has_next = next.is_some(),
        "Fetched keyset page"
    );

    Ok(CursorResult {
        data,
        cursor: Cursor { after: anchor },
        count,
        next,
    })
}

/// Build the link to the page after `anchor`
///
/// Every incoming pair except the keyset bounds is repeated in arrival order,
/// followed by `where__id__more_than` (ascending primary order) or
/// `where__id__less_than` (descending).
pub fn next_link(
    base_url: &str,
    path: &str,
    request: &PaginationRequest,
    direction: OrderDirection,
    anchor: &FilterValue,
) -> Result<String> {
    let mut url = Url::parse(base_url)?;
    let joined = format!(
        "{}/{}",
        url.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    // `?` and `#` in the route are path characters here
    url.set_path(&joined);

    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in request.forwarded_params() {
            pairs.append_pair(key, value);
        }
        let boundary = match direction {
            OrderDirection::Ascending => BOUNDARY_MORE_THAN,
            OrderDirection::Descending => BOUNDARY_LESS_THAN,
        };
        pairs.append_pair(boundary, &anchor.to_string());
    }

    Ok(url.into())
}
