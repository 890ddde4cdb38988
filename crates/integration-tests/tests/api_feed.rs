//! Post CRUD over the REST arm, including ownership enforcement and the
//! delete cascade.

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use domains::ports::UserRepo;
use integration_tests::TestApp;

#[tokio::test]
async fn anonymous_create_is_rejected_and_nothing_persists() {
    let app = TestApp::spawn();
    let (status, body) = app
        .call(
            Method::POST,
            "/feed/post",
            None,
            Some(json!({
                "title": "Sneaky post",
                "content": "Should never land",
                "imageUrl": "images/x.png",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "not authenticated");

    let token = app.token_for("reader@b.com").await;
    let (_, body) = app.call(Method::GET, "/feed/posts", Some(&token), None).await;
    assert_eq!(body["totalItems"], 0);
}

#[tokio::test]
async fn created_posts_appear_on_the_feed_with_their_creator() {
    let app = TestApp::spawn();
    let token = app.token_for("a@b.com").await;
    let post_id = app.create_post(&token, "First post").await;

    let (status, body) = app.call(Method::GET, "/feed/posts", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Posts fetched");
    assert_eq!(body["totalItems"], 1);
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts[0]["id"], json!(post_id));
    assert_eq!(posts[0]["creator"]["name"], "Test User");
    assert_eq!(posts[0]["imageUrl"], "images/fixture.png");
}

#[tokio::test]
async fn the_feed_requires_authentication() {
    let app = TestApp::spawn();
    let (status, _) = app.call(Method::GET, "/feed/posts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn fetching_an_unknown_post_is_404() {
    let app = TestApp::spawn();
    let token = app.token_for("a@b.com").await;
    let (status, body) = app
        .call(
            Method::GET,
            &format!("/feed/post/{}", Uuid::now_v7()),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "post not found");
}

#[tokio::test]
async fn only_the_creator_may_update_or_delete() {
    let app = TestApp::spawn();
    let owner = app.token_for("owner@b.com").await;
    let intruder = app.token_for("intruder@b.com").await;
    let post_id = app.create_post(&owner, "Owned post").await;

    let (status, _) = app
        .call(
            Method::PUT,
            &format!("/feed/post/{post_id}"),
            Some(&intruder),
            Some(json!({ "title": "Hijacked title", "content": "Hijacked body" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/feed/post/{post_id}"),
            Some(&intruder),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Unchanged and still present.
    let (status, body) = app
        .call(
            Method::GET,
            &format!("/feed/post/{post_id}"),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["title"], "Owned post");
}

#[tokio::test]
async fn updates_by_the_creator_go_through() {
    let app = TestApp::spawn();
    let owner = app.token_for("owner@b.com").await;
    let post_id = app.create_post(&owner, "Original title").await;

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/feed/post/{post_id}"),
            Some(&owner),
            Some(json!({ "title": "Edited title", "content": "Edited body text" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Post updated");
    assert_eq!(body["post"]["title"], "Edited title");
    // No imageUrl in the body means no image change.
    assert_eq!(body["post"]["imageUrl"], "images/fixture.png");
}

#[tokio::test]
async fn delete_cascades_to_owner_reference_and_stored_image() {
    let app = TestApp::spawn();
    let user_id = app.signup("owner@b.com").await;
    let owner = {
        let (status, body) = app
            .call(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "email": "owner@b.com", "password": "abcde" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_owned()
    };
    let post_id = app.create_post(&owner, "Doomed post").await;

    let (status, body) = app
        .call(
            Method::DELETE,
            &format!("/feed/post/{post_id}"),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Post deleted");

    // Subsequent fetch is a NotFound.
    let (status, _) = app
        .call(
            Method::GET,
            &format!("/feed/post/{post_id}"),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The owner's post list no longer references it.
    let uid = Uuid::parse_str(user_id.as_str().unwrap()).unwrap();
    let stored = app.store.find_by_id(uid).await.unwrap().unwrap();
    assert!(stored.posts.is_empty());

    // The stored image was removed (best effort, but recorded).
    assert!(app.media.was_removed("images/fixture.png"));
}
