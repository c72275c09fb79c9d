use feed_pagination::prelude::*;
use serde::{Deserialize, Serialize};

/// A post in the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Monotonic identifier, used as the keyset anchor
    pub id: i64,
    /// Author handle
    pub author: String,
    /// Title
    pub title: String,
    /// Like count
    pub likes: i64,
    /// Creation time in Unix seconds
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
            "author" => Some(self.author.as_str().into()),
            "title" => Some(self.title.as_str().into()),
            "likes" => Some(self.likes.into()),
            "createdAt" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

/// A comment on a post, filterable by `post.id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Monotonic identifier, used as the keyset anchor
    pub id: i64,
    /// Identifier of the parent post
    #[serde(rename = "postId")]
    pub post_id: i64,
    /// Author handle
    pub author: String,
    /// Comment text
    pub body: String,
    /// Creation time in Unix seconds
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
            "author" => Some(self.author.as_str().into()),
            "body" => Some(self.body.as_str().into()),
            "createdAt" => Some(self.created_at.into()),
            _ => None,
        }
    }
}
