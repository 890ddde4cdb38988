//! The GraphQL arm. One schema covering `createUser`, `login`,
//! `createPost`, `posts(page)`, `post(id)`, `updatePost`, `deletePost`,
//! `user` and `updateStatus`, with domain errors mapped to the uniform
//! `{message, status, data}` shape through error extensions.

use std::sync::Arc;

use async_graphql::{
    Context, EmptySubscription, Error, ErrorExtensions, InputObject, Object, Schema, SimpleObject,
    Value, ID,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use domains::auth::AuthContext;
use domains::error::DomainError;
use domains::models::{FeedItem, FeedPage, User};
use services::{AuthService, PostInput, PostService, PostUpdate, SignupInput};

use crate::error::{client_data, client_message};

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(auth: Arc<AuthService>, posts: Arc<PostService>) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(auth)
        .data(posts)
        .finish()
}

/// Domain errors cross into GraphQL with their stable numeric code in
/// `extensions.status` and field details in `extensions.data`.
fn gql_error(err: DomainError) -> Error {
    let status = err.status();
    let data = Value::from_json(client_data(&err)).unwrap_or_default();
    Error::new(client_message(&err)).extend_with(|_, ext| {
        ext.set("status", status);
        ext.set("data", data.clone());
    })
}

fn parse_id(id: &ID) -> Result<Uuid, Error> {
    Uuid::parse_str(id.as_str()).map_err(|_| {
        gql_error(DomainError::validation(
            "Invalid id",
            vec![domains::error::FieldError::new("id", "Not a valid id")],
        ))
    })
}

#[derive(SimpleObject)]
#[graphql(name = "User")]
struct UserObject {
    id: ID,
    email: String,
    name: String,
    status: String,
    posts: Vec<ID>,
}

impl From<User> for UserObject {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string().into(),
            email: user.email,
            name: user.name,
            status: user.status,
            posts: user.posts.iter().map(|id| id.to_string().into()).collect(),
        }
    }
}

#[derive(SimpleObject)]
struct AuthorObject {
    id: ID,
    name: String,
}

#[derive(SimpleObject)]
#[graphql(name = "Post")]
struct PostObject {
    id: ID,
    title: String,
    content: String,
    image_url: String,
    creator: AuthorObject,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FeedItem> for PostObject {
    fn from(item: FeedItem) -> Self {
        Self {
            id: item.post.id.to_string().into(),
            title: item.post.title,
            content: item.post.content,
            image_url: item.post.image_url,
            creator: AuthorObject {
                id: item.author.id.to_string().into(),
                name: item.author.name,
            },
            created_at: item.post.created_at,
            updated_at: item.post.updated_at,
        }
    }
}

#[derive(SimpleObject)]
struct AuthData {
    token: String,
    user_id: ID,
}

#[derive(SimpleObject)]
struct PostsPage {
    posts: Vec<PostObject>,
    total_posts: i64,
}

impl From<FeedPage> for PostsPage {
    fn from(page: FeedPage) -> Self {
        Self {
            posts: page.items.into_iter().map(PostObject::from).collect(),
            total_posts: page.total,
        }
    }
}

#[derive(InputObject)]
struct UserInputData {
    email: String,
    name: String,
    password: String,
}

#[derive(InputObject)]
struct PostInputData {
    title: String,
    content: String,
    image_url: String,
}

/// `imageUrl: null` (or absent) means "no image change requested".
#[derive(InputObject)]
struct PostUpdateData {
    title: String,
    content: String,
    image_url: Option<String>,
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn login(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> Result<AuthData, Error> {
        let auth = ctx.data_unchecked::<Arc<AuthService>>();
        let payload = auth.login(&email, &password).await.map_err(gql_error)?;
        Ok(AuthData {
            token: payload.token,
            user_id: payload.user_id.to_string().into(),
        })
    }

    async fn posts(&self, ctx: &Context<'_>, page: Option<u32>) -> Result<PostsPage, Error> {
        let posts = ctx.data_unchecked::<Arc<PostService>>();
        let auth_ctx = ctx.data_unchecked::<AuthContext>();
        let page = posts.page(auth_ctx, page).await.map_err(gql_error)?;
        Ok(page.into())
    }

    async fn post(&self, ctx: &Context<'_>, id: ID) -> Result<PostObject, Error> {
        let posts = ctx.data_unchecked::<Arc<PostService>>();
        let auth_ctx = ctx.data_unchecked::<AuthContext>();
        let item = posts
            .single(auth_ctx, parse_id(&id)?)
            .await
            .map_err(gql_error)?;
        Ok(item.into())
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<UserObject, Error> {
        let auth = ctx.data_unchecked::<Arc<AuthService>>();
        let auth_ctx = ctx.data_unchecked::<AuthContext>();
        let user = auth.current_user(auth_ctx).await.map_err(gql_error)?;
        Ok(user.into())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        user_input: UserInputData,
    ) -> Result<UserObject, Error> {
        let auth = ctx.data_unchecked::<Arc<AuthService>>();
        let user = auth
            .signup(SignupInput {
                email: user_input.email,
                name: user_input.name,
                password: user_input.password,
            })
            .await
            .map_err(gql_error)?;
        Ok(user.into())
    }

    async fn create_post(
        &self,
        ctx: &Context<'_>,
        post_input: PostInputData,
    ) -> Result<PostObject, Error> {
        let posts = ctx.data_unchecked::<Arc<PostService>>();
        let auth_ctx = ctx.data_unchecked::<AuthContext>();
        let item = posts
            .create(
                auth_ctx,
                PostInput {
                    title: post_input.title,
                    content: post_input.content,
                    image_url: post_input.image_url,
                },
            )
            .await
            .map_err(gql_error)?;
        Ok(item.into())
    }

    async fn update_post(
        &self,
        ctx: &Context<'_>,
        id: ID,
        post_input: PostUpdateData,
    ) -> Result<PostObject, Error> {
        let posts = ctx.data_unchecked::<Arc<PostService>>();
        let auth_ctx = ctx.data_unchecked::<AuthContext>();
        let item = posts
            .update(
                auth_ctx,
                parse_id(&id)?,
                PostUpdate {
                    title: post_input.title,
                    content: post_input.content,
                    image_url: post_input.image_url,
                },
            )
            .await
            .map_err(gql_error)?;
        Ok(item.into())
    }

    async fn delete_post(&self, ctx: &Context<'_>, id: ID) -> Result<bool, Error> {
        let posts = ctx.data_unchecked::<Arc<PostService>>();
        let auth_ctx = ctx.data_unchecked::<AuthContext>();
        posts
            .delete(auth_ctx, parse_id(&id)?)
            .await
            .map_err(gql_error)?;
        Ok(true)
    }

    async fn update_status(&self, ctx: &Context<'_>, status: String) -> Result<UserObject, Error> {
        let auth = ctx.data_unchecked::<Arc<AuthService>>();
        let auth_ctx = ctx.data_unchecked::<AuthContext>();
        let user = auth
            .update_status(auth_ctx, &status)
            .await
            .map_err(gql_error)?;
        Ok(user.into())
    }
}
