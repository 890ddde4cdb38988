//! The GraphQL arm: the full operation set, and the uniform error shape
//! (`message` plus `status`/`data` extensions).

use axum::http::StatusCode;
use serde_json::{json, Value};

use integration_tests::TestApp;

fn first_error(body: &Value) -> &Value {
    &body["errors"][0]
}

#[tokio::test]
async fn create_user_then_login_then_whoami() {
    let app = TestApp::spawn();

    let (status, body) = app
        .graphql(
            None,
            "mutation($input: UserInputData!) { createUser(userInput: $input) { id email status } }",
            json!({ "input": { "email": "a@b.com", "name": "Maria", "password": "abcde" } }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["createUser"]["email"], "a@b.com");
    assert_eq!(body["data"]["createUser"]["status"], "I am new!");

    let (_, body) = app
        .graphql(
            None,
            r#"query { login(email: "a@b.com", password: "abcde") { token userId } }"#,
            json!({}),
        )
        .await;
    let token = body["data"]["login"]["token"].as_str().unwrap().to_owned();
    let user_id = body["data"]["login"]["userId"].clone();

    let (_, body) = app
        .graphql(Some(&token), "query { user { id email name } }", json!({}))
        .await;
    assert_eq!(body["data"]["user"]["id"], user_id);
    assert_eq!(body["data"]["user"]["name"], "Maria");
}

#[tokio::test]
async fn duplicate_create_user_reports_a_conflict() {
    let app = TestApp::spawn();
    let mutation =
        "mutation($input: UserInputData!) { createUser(userInput: $input) { id } }";
    let input = json!({ "input": { "email": "a@b.com", "name": "Maria", "password": "abcde" } });

    app.graphql(None, mutation, input.clone()).await;
    let (status, body) = app.graphql(None, mutation, input).await;

    // GraphQL transports errors in-band; HTTP stays 200.
    assert_eq!(status, StatusCode::OK);
    let error = first_error(&body);
    assert_eq!(error["message"], "conflict: User exists");
    assert_eq!(error["extensions"]["status"], 409);
}

#[tokio::test]
async fn invalid_input_carries_field_details_in_extensions() {
    let app = TestApp::spawn();
    let (_, body) = app
        .graphql(
            None,
            "mutation($input: UserInputData!) { createUser(userInput: $input) { id } }",
            json!({ "input": { "email": "nope", "name": "", "password": "abc" } }),
        )
        .await;
    let error = first_error(&body);
    assert_eq!(error["extensions"]["status"], 422);
    assert_eq!(error["extensions"]["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn anonymous_create_post_is_rejected_in_band_and_persists_nothing() {
    let app = TestApp::spawn();
    let (status, body) = app
        .graphql(
            None,
            r#"mutation { createPost(postInput: {
                title: "Sneaky post", content: "Should never land",
                imageUrl: "images/x.png"
            }) { id } }"#,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let error = first_error(&body);
    assert_eq!(error["message"], "not authenticated");
    assert_eq!(error["extensions"]["status"], 401);

    let token = app.token_for("reader@b.com").await;
    let (_, body) = app
        .graphql(Some(&token), "query { posts { totalPosts } }", json!({}))
        .await;
    assert_eq!(body["data"]["posts"]["totalPosts"], 0);
}

#[tokio::test]
async fn posts_are_paged_newest_first() {
    let app = TestApp::spawn();
    let token = app.token_for("a@b.com").await;
    for n in 0..3 {
        let (_, body) = app
            .graphql(
                Some(&token),
                "mutation($input: PostInputData!) { createPost(postInput: $input) { id } }",
                json!({ "input": {
                    "title": format!("Post number {n}"),
                    "content": format!("Body of post number {n}"),
                    "imageUrl": format!("images/{n}.png"),
                }}),
            )
            .await;
        assert!(body["errors"].is_null(), "createPost failed: {body}");
    }

    let (_, body) = app
        .graphql(
            Some(&token),
            "query { posts(page: 1) { posts { title creator { name } } totalPosts } }",
            json!({}),
        )
        .await;
    let page = &body["data"]["posts"];
    assert_eq!(page["totalPosts"], 3);
    let posts = page["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["title"], "Post number 2");
    assert_eq!(posts[0]["creator"]["name"], "Test User");

    let (_, body) = app
        .graphql(
            Some(&token),
            "query { posts(page: 2) { posts { title } totalPosts } }",
            json!({}),
        )
        .await;
    let page = &body["data"]["posts"];
    assert_eq!(page["posts"].as_array().unwrap().len(), 1);
    assert_eq!(page["posts"][0]["title"], "Post number 0");
}

#[tokio::test]
async fn update_post_with_null_image_keeps_the_stored_one() {
    let app = TestApp::spawn();
    let token = app.token_for("a@b.com").await;
    let post_id = app.create_post(&token, "Original title").await;

    let (_, body) = app
        .graphql(
            Some(&token),
            "mutation($id: ID!, $input: PostUpdateData!) {
                updatePost(id: $id, postInput: $input) { title imageUrl }
            }",
            json!({ "id": post_id, "input": {
                "title": "Edited title", "content": "Edited body text"
            }}),
        )
        .await;
    let updated = &body["data"]["updatePost"];
    assert_eq!(updated["title"], "Edited title");
    assert_eq!(updated["imageUrl"], "images/fixture.png");

    let (_, body) = app
        .graphql(
            Some(&token),
            "mutation($id: ID!, $input: PostUpdateData!) {
                updatePost(id: $id, postInput: $input) { imageUrl }
            }",
            json!({ "id": post_id, "input": {
                "title": "Edited title", "content": "Edited body text",
                "imageUrl": "images/replacement.png"
            }}),
        )
        .await;
    assert_eq!(body["data"]["updatePost"]["imageUrl"], "images/replacement.png");
    assert!(app.media.was_removed("images/fixture.png"));
}

#[tokio::test]
async fn delete_post_roundtrip() {
    let app = TestApp::spawn();
    let token = app.token_for("a@b.com").await;
    let post_id = app.create_post(&token, "Doomed post").await;

    let (_, body) = app
        .graphql(
            Some(&token),
            "mutation($id: ID!) { deletePost(id: $id) }",
            json!({ "id": post_id }),
        )
        .await;
    assert_eq!(body["data"]["deletePost"], true);

    let (_, body) = app
        .graphql(
            Some(&token),
            "query($id: ID!) { post(id: $id) { id } }",
            json!({ "id": post_id }),
        )
        .await;
    assert_eq!(first_error(&body)["extensions"]["status"], 404);
}

#[tokio::test]
async fn update_status_mutation_roundtrips() {
    let app = TestApp::spawn();
    let token = app.token_for("a@b.com").await;

    let (_, body) = app
        .graphql(
            Some(&token),
            r#"mutation { updateStatus(status: "Exploring GraphQL") { status } }"#,
            json!({}),
        )
        .await;
    assert_eq!(body["data"]["updateStatus"]["status"], "Exploring GraphQL");

    let (_, body) = app
        .graphql(Some(&token), "query { user { status } }", json!({}))
        .await;
    assert_eq!(body["data"]["user"]["status"], "Exploring GraphQL");
}
