//! Shared fixtures for integration tests.

#![allow(dead_code)]

use feed_pagination::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub likes: i64,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

impl Pageable for Post {
    const ENTITY: &'static str = "Post";
    const SORT_KEYS: &'static [&'static str] = &["createdAt", "id", "likes", "title"];

    fn cursor_id(&self) -> FilterValue {
        FilterValue::Integer(self.id)
    }
}

impl FieldAccess for Post {
    fn field_value(&self, field: &str) -> Option<FilterValue> {
        match field {
            "id" => Some(self.id.into()),
            "title" => Some(self.title.as_str().into()),
            "likes" => Some(self.likes.into()),
            "createdAt" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub body: String,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

impl Pageable for Comment {
    const ENTITY: &'static str = "Comment";
    const SORT_KEYS: &'static [&'static str] = &["createdAt", "id"];

    fn cursor_id(&self) -> FilterValue {
        FilterValue::Integer(self.id)
    }
}

impl FieldAccess for Comment {
    fn field_value(&self, field: &str) -> Option<FilterValue> {
        match field {
            "id" => Some(self.id.into()),
            "post.id" => Some(self.post_id.into()),
            "body" => Some(self.body.as_str().into()),
            "createdAt" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

/// Posts with ids `1..=n`, created in id order
pub fn posts(n: i64) -> Vec<Post> {
    (1..=n)
        .map(|id| Post {
            id,
            title: format!("Post {id}"),
            likes: id * 10,
            created_at: 1_700_000_000 + id,
        })
        .collect()
}

/// Posts whose titles differ only in case
pub fn mixed_case_posts() -> Vec<Post> {
    ["Learning RUST", "rust tips", "Rusty Nails", "Go basics"]
        .into_iter()
        .zip(1..)
        .map(|(title, id)| Post {
            id,
            title: title.to_string(),
            likes: 0,
            created_at: 1_700_000_000 + id,
        })
        .collect()
}

/// Three comments on post 5 and two on post 999
pub fn comments() -> Vec<Comment> {
    [(1, 5), (2, 999), (3, 5), (4, 999), (5, 5)]
        .into_iter()
        .map(|(id, post_id)| Comment {
            id,
            post_id,
            body: format!("Comment {id}"),
            created_at: 1_700_000_000 + id,
        })
        .collect()
}

pub fn ids<T: Pageable>(rows: &[T]) -> Vec<FilterValue> {
    rows.iter().map(T::cursor_id).collect()
}

pub fn int_ids(values: &[i64]) -> Vec<FilterValue> {
    values.iter().copied().map(FilterValue::Integer).collect()
}

pub fn expect_cursor<T: std::fmt::Debug>(result: Paginated<T>) -> CursorResult<T> {
    match result {
        Paginated::Cursor(cursor) => cursor,
        other => panic!("expected keyset page, got {other:?}"),
    }
}

pub fn expect_page<T: std::fmt::Debug>(result: Paginated<T>) -> PageResult<T> {
    match result {
        Paginated::Page(page) => page,
        other => panic!("expected offset page, got {other:?}"),
    }
}
