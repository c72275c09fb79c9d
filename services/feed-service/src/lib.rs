//! Example posts and comments service listing through `feed-pagination`

#![warn(missing_docs)]

/// HTTP handlers
pub mod handlers;
/// Listed entities
pub mod models;

use axum::{routing::get, Router};
use feed_pagination::prelude::*;
use tower_http::trace::TraceLayer;

use models::{Comment, Post};

const AUTHORS: [&str; 3] = ["ada", "grace", "linus"];
const EPOCH: i64 = 1_700_000_000;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Paginator built from the loaded configuration
    pub paginator: Paginator,
    /// Post storage
    pub posts: InMemoryRepository<Post>,
    /// Comment storage
    pub comments: InMemoryRepository<Comment>,
}

impl AppState {
    /// State with empty repositories
    pub fn new(paginator: Paginator) -> Self {
        Self {
            paginator,
            posts: InMemoryRepository::default(),
            comments: InMemoryRepository::default(),
        }
    }

    /// State with 60 posts and three comments per post
    pub fn seeded(paginator: Paginator) -> Self {
        let posts = (1..=60)
            .map(|id| Post {
                id,
                author: AUTHORS[(id as usize) % AUTHORS.len()].to_string(),
                title: format!("Post number {id}"),
                likes: (id * 7) % 50,
                created_at: EPOCH + id * 60,
            })
            .collect();

        let comments = (1..=180)
            .map(|id| Comment {
                id,
                post_id: (id - 1) / 3 + 1,
                author: AUTHORS[(id as usize) % AUTHORS.len()].to_string(),
                body: format!("Comment {id}"),
                created_at: EPOCH + id * 30,
            })
            .collect();

        Self {
            paginator,
            posts: InMemoryRepository::new(posts),
            comments: InMemoryRepository::new(comments),
        }
    }
}

/// Build the service router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/posts", get(handlers::list_posts))
        .route("/posts/{post_id}/comments", get(handlers::list_post_comments))
        .route("/users/{author}/posts", get(handlers::list_author_posts))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_router_lists_posts() {
        let app = router(AppState::seeded(Paginator::default()));
        let response = app
            .oneshot(
                Request::get("/posts?page=2&take=25")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["total"], 60);
        assert_eq!(json["data"].as_array().unwrap().len(), 25);
        assert_eq!(json["data"][0]["id"], 26);
    }

    #[tokio::test]
    async fn test_router_rejects_bad_filter() {
        let app = router(AppState::seeded(Paginator::default()));
        let response = app
            .oneshot(
                Request::get("/posts?where__title__contains=x")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_next_link_keeps_encoded_author() {
        let state = AppState::new(Paginator::default());
        for id in [1, 2] {
            state
                .posts
                .insert(Post {
                    id,
                    author: "a?b".to_string(),
                    title: format!("Post {id}"),
                    likes: 0,
                    created_at: EPOCH + id,
                })
                .await;
        }

        let response = router(state)
            .oneshot(
                Request::get("/users/a%3Fb/posts?take=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"][0]["id"], 1);
        assert_eq!(
            json["next"],
            "http://localhost:3000/users/a%3Fb/posts?take=1&where__id__more_than=1"
        );
    }

    #[tokio::test]
    async fn test_empty_state() {
        let state = AppState::new(Paginator::default());
        assert!(state.posts.is_empty().await);
        assert!(state.comments.is_empty().await);
    }
}
