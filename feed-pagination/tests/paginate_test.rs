//! End-to-end pagination behaviour against the in-memory repository.

mod common;

use common::{comments, expect_cursor, expect_page, ids, int_ids, mixed_case_posts, posts, Comment, Post};
use feed_pagination::prelude::*;
use url::Url;

async fn list_posts(repo: &InMemoryRepository<Post>, query: &str) -> Result<Paginated<Post>> {
    Paginator::default()
        .paginate(QueryParams::parse(query), repo, &[], "/posts")
        .await
}

/// Query string of a continuation link
fn query_of(next: &str) -> String {
    Url::parse(next)
        .unwrap()
        .query()
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn test_offset_second_page() {
    let repo = InMemoryRepository::new(posts(10));
    let page = expect_page(list_posts(&repo, "page=2&take=5").await.unwrap());

    assert_eq!(ids(&page.data), int_ids(&[6, 7, 8, 9, 10]));
    assert_eq!(page.total, 10);
}

#[tokio::test]
async fn test_offset_ignores_cursor_fields() {
    let repo = InMemoryRepository::new(posts(10));
    let page = expect_page(
        list_posts(&repo, "page=1&take=3&where__id__more_than=8")
            .await
            .unwrap(),
    );
    assert_eq!(ids(&page.data), int_ids(&[1, 2, 3]));
    assert_eq!(page.total, 10);
}

#[tokio::test]
async fn test_offset_total_counts_filtered_rows() {
    let repo = InMemoryRepository::new(posts(10));
    let page = expect_page(
        list_posts(&repo, "page=1&take=2&where__likes__more_than=50")
            .await
            .unwrap(),
    );
    assert_eq!(ids(&page.data), int_ids(&[6, 7]));
    assert_eq!(page.total, 5);
}

#[tokio::test]
async fn test_ascending_cursor_walks_forward() {
    let repo = InMemoryRepository::new(posts(3));

    let first = expect_cursor(
        list_posts(&repo, "take=1&order__createdAt=ASC")
            .await
            .unwrap(),
    );
    assert_eq!(ids(&first.data), int_ids(&[1]));
    assert_eq!(first.cursor.after, Some(FilterValue::Integer(1)));
    let next = first.next.unwrap();
    assert_eq!(
        next,
        "http://localhost:3000/posts?take=1&order__createdAt=ASC&where__id__more_than=1"
    );

    let second = expect_cursor(list_posts(&repo, &query_of(&next)).await.unwrap());
    assert_eq!(ids(&second.data), int_ids(&[2]));
    assert_eq!(second.cursor.after, Some(FilterValue::Integer(2)));

    // The last row fills the page, so a link is still produced
    let third = expect_cursor(
        list_posts(&repo, &query_of(&second.next.unwrap()))
            .await
            .unwrap(),
    );
    assert_eq!(ids(&third.data), int_ids(&[3]));
    assert_eq!(third.cursor.after, Some(FilterValue::Integer(3)));
    let next = third.next.unwrap();
    assert!(next.ends_with("where__id__more_than=3"));

    let fourth = expect_cursor(list_posts(&repo, &query_of(&next)).await.unwrap());
    assert!(fourth.data.is_empty());
    assert_eq!(fourth.cursor.after, None);
    assert_eq!(fourth.next, None);
}

#[tokio::test]
async fn test_short_page_has_no_next() {
    let repo = InMemoryRepository::new(posts(3));
    let page = expect_cursor(list_posts(&repo, "take=5").await.unwrap());

    assert_eq!(page.count, 3);
    assert_eq!(page.cursor.after, None);
    assert_eq!(page.next, None);
}

#[tokio::test]
async fn test_descending_cursor_uses_less_than() {
    let repo = InMemoryRepository::new(posts(3));

    let first = expect_cursor(
        list_posts(&repo, "take=2&order__createdAt=DESC")
            .await
            .unwrap(),
    );
    assert_eq!(ids(&first.data), int_ids(&[3, 2]));
    assert_eq!(first.cursor.after, Some(FilterValue::Integer(2)));

    let next = first.next.unwrap();
    assert!(next.contains("where__id__less_than=2"));
    assert!(!next.contains("more_than"));

    let second = expect_cursor(list_posts(&repo, &query_of(&next)).await.unwrap());
    assert_eq!(ids(&second.data), int_ids(&[1]));
    assert_eq!(second.next, None);
}

#[tokio::test]
async fn test_empty_result() {
    let repo = InMemoryRepository::new(posts(3));
    let page = expect_cursor(
        list_posts(&repo, "where__title=nothing%20here")
            .await
            .unwrap(),
    );

    assert!(page.data.is_empty());
    assert_eq!(page.count, 0);
    assert_eq!(page.cursor.after, None);
    assert_eq!(page.next, None);

    let json = serde_json::to_value(&page).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"data": [], "cursor": {"after": null}, "count": 0, "next": null})
    );
}

#[tokio::test]
async fn test_base_predicate_cannot_be_overridden() {
    let repo = InMemoryRepository::new(comments());
    let base = [FilterCondition::eq("post.id", 5_i64)];

    let page = expect_cursor(
        Paginator::default()
            .paginate::<Comment, _>(
                QueryParams::parse("where__post__id=999"),
                &repo,
                &base,
                "/posts/5/comments",
            )
            .await
            .unwrap(),
    );

    assert_eq!(ids(&page.data), int_ids(&[1, 3, 5]));
}

#[tokio::test]
async fn test_unknown_operator_rejected_regardless_of_base() {
    let repo = InMemoryRepository::new(comments());
    let scoped = [FilterCondition::eq("post.id", 5_i64)];
    let unscoped: [FilterCondition; 0] = [];

    for base in [&scoped[..], &unscoped[..]] {
        let error = Paginator::default()
            .paginate::<Comment, _>(
                QueryParams::parse("where__post__bogus=1"),
                &repo,
                base,
                "/posts/5/comments",
            )
            .await
            .unwrap_err();
        assert!(
            matches!(error, Error::InvalidFilterOperator { ref operator, .. } if operator == "bogus"),
            "base {base:?} gave {error:?}"
        );
    }
}

#[tokio::test]
async fn test_base_path_in_next_link() {
    let repo = InMemoryRepository::new(comments());
    let base = [FilterCondition::eq("post.id", 5_i64)];

    let page = expect_cursor(
        Paginator::default()
            .paginate::<Comment, _>(
                QueryParams::parse("take=2&where__post__id=999"),
                &repo,
                &base,
                "/posts/5/comments",
            )
            .await
            .unwrap(),
    );

    assert_eq!(ids(&page.data), int_ids(&[1, 3]));
    assert_eq!(
        page.next.as_deref(),
        Some("http://localhost:3000/posts/5/comments?take=2&where__post__id=999&where__id__more_than=3")
    );
}

#[tokio::test]
async fn test_malformed_keys_rejected() {
    let repo = InMemoryRepository::new(posts(3));

    for query in ["where__title__like__extra=x", "where__=x"] {
        let error = list_posts(&repo, query).await.unwrap_err();
        assert!(
            matches!(error, Error::MalformedFilterKey { .. }),
            "{query} gave {error:?}"
        );
        assert!(error.is_client_error());
    }
}

#[tokio::test]
async fn test_client_errors() {
    let repo = InMemoryRepository::new(posts(3));

    let error = list_posts(&repo, "where__title__near=x").await.unwrap_err();
    assert!(matches!(error, Error::InvalidFilterOperator { .. }));

    let error = list_posts(&repo, "order__createdAt=up").await.unwrap_err();
    assert!(matches!(error, Error::InvalidSortDirection { .. }));

    let error = list_posts(&repo, "take=0").await.unwrap_err();
    assert!(matches!(error, Error::InvalidTakeValue(_)));

    let error = list_posts(&repo, "page=0").await.unwrap_err();
    assert!(matches!(error, Error::InvalidPageValue(_)));
}

#[tokio::test]
async fn test_i_like_matches_any_case() {
    let repo = InMemoryRepository::new(mixed_case_posts());
    let page = expect_cursor(list_posts(&repo, "where__title__i_like=rust").await.unwrap());

    assert_eq!(ids(&page.data), int_ids(&[1, 2, 3]));
}

#[tokio::test]
async fn test_like_is_case_sensitive_and_verbatim() {
    let repo = InMemoryRepository::new(mixed_case_posts());

    let page = expect_cursor(list_posts(&repo, "where__title__like=rust").await.unwrap());
    assert!(page.data.is_empty());

    let page = expect_cursor(
        list_posts(&repo, "where__title__like=Rust%25")
            .await
            .unwrap(),
    );
    assert_eq!(ids(&page.data), int_ids(&[3]));
}

#[tokio::test]
async fn test_between_filter() {
    let repo = InMemoryRepository::new(posts(10));
    let page = expect_cursor(
        list_posts(&repo, "where__likes__between=30,50")
            .await
            .unwrap(),
    );
    assert_eq!(ids(&page.data), int_ids(&[3, 4, 5]));
}

#[tokio::test]
async fn test_next_repeats_every_non_boundary_key_once() {
    let repo = InMemoryRepository::new(posts(10));
    let incoming = [
        ("take", "2"),
        ("where__likes__more_than", "20"),
        ("order__createdAt", "ASC"),
        ("order__likes", "DESC"),
        ("search", "hello world"),
        ("where__id__more_than", "3"),
    ];
    let params: QueryParams = incoming.iter().copied().collect();

    let page = expect_cursor(
        Paginator::default()
            .paginate::<Post, _>(params, &repo, &[], "/posts")
            .await
            .unwrap(),
    );
    assert_eq!(ids(&page.data), int_ids(&[4, 5]));

    let next = Url::parse(&page.next.unwrap()).unwrap();
    let pairs: Vec<(String, String)> = next.query_pairs().into_owned().collect();

    for (key, value) in incoming.iter().filter(|(k, _)| *k != "where__id__more_than") {
        let occurrences = pairs
            .iter()
            .filter(|(k, v)| k == key && v == value)
            .count();
        assert_eq!(occurrences, 1, "{key}={value} should appear exactly once");
    }
    let boundaries: Vec<_> = pairs
        .iter()
        .filter(|(k, _)| k == "where__id__more_than" || k == "where__id__less_than")
        .collect();
    assert_eq!(
        boundaries,
        vec![&("where__id__more_than".to_string(), "5".to_string())]
    );
}

#[tokio::test]
async fn test_more_than_wins_when_both_bounds_given() {
    let repo = InMemoryRepository::new(posts(10));

    let both = expect_cursor(
        list_posts(&repo, "take=3&where__id__less_than=2&where__id__more_than=6")
            .await
            .unwrap(),
    );
    let only_more_than = expect_cursor(
        list_posts(&repo, "take=3&where__id__more_than=6")
            .await
            .unwrap(),
    );

    assert_eq!(ids(&both.data), int_ids(&[7, 8, 9]));
    assert_eq!(both, only_more_than);
}

#[tokio::test]
async fn test_deterministic() {
    let repo = InMemoryRepository::new(posts(10));
    let query = "take=3&order__likes=DESC&where__likes__less_than=90";

    let first = list_posts(&repo, query).await.unwrap();
    let second = list_posts(&repo, query).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_unknown_sort_key_is_server_error() {
    let repo = InMemoryRepository::new(posts(3));
    let error = list_posts(&repo, "order__password=ASC").await.unwrap_err();

    assert!(matches!(
        error,
        Error::InvalidSortKey { entity: "Post", ref field } if field == "password"
    ));
    assert!(!error.is_client_error());
}

#[tokio::test]
async fn test_storage_error_passes_through() {
    let repo = InMemoryRepository::new(posts(3));
    let failure = RepositoryError::timeout(RepositoryOperation::FindMany, "statement timeout");
    repo.set_failure(Some(failure.clone())).await;

    let error = list_posts(&repo, "take=2").await.unwrap_err();
    match error {
        Error::Storage(inner) => assert_eq!(inner, failure.clone().with_entity("Post")),
        other => panic!("expected storage error, got {other:?}"),
    }

    let error = list_posts(&repo, "page=1").await.unwrap_err();
    match error {
        Error::Storage(inner) => {
            assert_eq!(inner.operation, RepositoryOperation::FindManyWithCount);
            assert_eq!(inner.entity_type.as_deref(), Some("Post"));
            assert!(inner.is_retriable());
        }
        other => panic!("expected storage error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_concurrent_calls_do_not_interfere() {
    let repo = InMemoryRepository::new(posts(10));
    let paginator = Paginator::default();

    let (a, b) = tokio::join!(
        paginator.paginate::<Post, _>(QueryParams::parse("page=2&take=3"), &repo, &[], "/posts"),
        paginator.paginate::<Post, _>(QueryParams::parse("take=4&order__createdAt=DESC"), &repo, &[], "/posts"),
    );

    assert_eq!(ids(&expect_page(a.unwrap()).data), int_ids(&[4, 5, 6]));
    assert_eq!(ids(&expect_cursor(b.unwrap()).data), int_ids(&[10, 9, 8, 7]));
}
