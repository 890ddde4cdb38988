//! The REST arm: feed CRUD and account routes, plus the GraphQL HTTP
//! glue. Response bodies mirror the wire contract: `{message, ...}` on
//! success, `{message, data}` on failure.

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use domains::auth::AuthContext;
use services::{PostInput, PostUpdate, SignupInput};

use crate::error::ApiError;
use crate::state::ApiState;
use crate::wire;

#[derive(Deserialize)]
pub struct PageQuery {
    page: Option<u32>,
}

#[derive(Deserialize)]
pub struct LoginBody {
    email: String,
    password: String,
}

#[derive(Deserialize)]
pub struct StatusBody {
    status: String,
}

// ── Feed ────────────────────────────────────────────────────────────────────

pub async fn get_posts(
    State(state): State<ApiState>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.posts.page(&ctx, query.page).await?;
    let posts: Vec<_> = page
        .items
        .iter()
        .map(|item| wire::post_body(&item.post, &item.author))
        .collect();
    Ok(Json(json!({
        "message": "Posts fetched",
        "posts": posts,
        "totalItems": page.total,
    })))
}

pub async fn create_post(
    State(state): State<ApiState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<PostInput>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.posts.create(&ctx, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Post created successfully",
            "post": wire::post_body(&item.post, &item.author),
            "creator": { "id": item.author.id, "name": item.author.name },
        })),
    ))
}

pub async fn get_post(
    State(state): State<ApiState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.posts.single(&ctx, id).await?;
    Ok(Json(json!({
        "message": "Post found",
        "post": wire::post_body(&item.post, &item.author),
    })))
}

pub async fn update_post(
    State(state): State<ApiState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(input): Json<PostUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.posts.update(&ctx, id, input).await?;
    Ok(Json(json!({
        "message": "Post updated",
        "post": wire::post_body(&item.post, &item.author),
    })))
}

pub async fn delete_post(
    State(state): State<ApiState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.posts.delete(&ctx, id).await?;
    Ok(Json(json!({ "message": "Post deleted" })))
}

// ── Accounts ────────────────────────────────────────────────────────────────

pub async fn signup(
    State(state): State<ApiState>,
    Json(input): Json<SignupInput>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.auth.signup(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created", "userId": user.id })),
    ))
}

pub async fn login(
    State(state): State<ApiState>,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = state.auth.login(&body.email, &body.password).await?;
    Ok(Json(json!({
        "message": "Signed in",
        "token": payload.token,
        "userId": payload.user_id,
    })))
}

pub async fn get_status(
    State(state): State<ApiState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<impl IntoResponse, ApiError> {
    let status = state.auth.status(&ctx).await?;
    Ok(Json(json!({ "status": status })))
}

pub async fn update_status(
    State(state): State<ApiState>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<StatusBody>,
) -> Result<impl IntoResponse, ApiError> {
    state.auth.update_status(&ctx, &body.status).await?;
    Ok(Json(json!({ "message": "User updated" })))
}

// ── GraphQL glue ────────────────────────────────────────────────────────────

/// `POST /graphql`. The per-request `AuthContext` rides into the
/// schema as context data, so resolvers run the same guard the REST
/// handlers do.
pub async fn graphql_handler(
    State(state): State<ApiState>,
    Extension(ctx): Extension<AuthContext>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    state.schema.execute(req.into_inner().data(ctx)).await.into()
}

/// `GET /graphql`, the interactive playground.
pub async fn graphql_playground() -> Html<String> {
    Html(
        async_graphql::http::GraphiQLSource::build()
            .endpoint("/graphql")
            .finish(),
    )
}
