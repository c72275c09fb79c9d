use axum::extract::{Path, Query, State};
use feed_pagination::prelude::*;

use crate::models::{Comment, Post};
use crate::AppState;

/// Health check endpoint
pub async fn health() -> &'static str {
    "ok"
}

/// `GET /posts`
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Paginated<Post>> {
    state
        .paginator
        .paginate(params, &state.posts, &[], "/posts")
        .await
}

/// `GET /posts/{post_id}/comments`
///
/// Always scoped to the post in the path; `where__post__id` is ignored.
pub async fn list_post_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Query(params): Query<QueryParams>,
) -> Result<Paginated<Comment>> {
    let base = [FilterCondition::eq("post.id", post_id)];
    let path = format!("/posts/{post_id}/comments");

    state
        .paginator
        .paginate(params, &state.comments, &base, &path)
        .await
}

/// `GET /users/{author}/posts`
pub async fn list_author_posts(
    State(state): State<AppState>,
    Path(author): Path<String>,
    Query(params): Query<QueryParams>,
) -> Result<Paginated<Post>> {
    let base = [FilterCondition::eq("author", author.as_str())];
    let path = format!("/users/{author}/posts");

    state
        .paginator
        .paginate(params, &state.posts, &base, &path)
        .await
}
