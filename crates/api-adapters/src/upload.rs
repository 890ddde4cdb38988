//! `PUT /post-image`: authenticated multipart upload.
//!
//! Fields: `image` (the file) and optionally `oldPath` (a previously
//! stored path to delete once the replacement is safely stored). The
//! MIME allowlist comes from configuration; anything else is rejected
//! outright rather than silently dropped.

use axum::extract::{Extension, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mime::Mime;
use serde_json::json;

use domains::auth::AuthContext;
use domains::error::{DomainError, FieldError};

use crate::error::ApiError;
use crate::state::ApiState;

pub async fn put_post_image(
    State(state): State<ApiState>,
    Extension(ctx): Extension<AuthContext>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    ctx.require().map_err(ApiError)?;

    let mut stored: Option<String> = None;
    let mut old_path: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| malformed(err.to_string()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("image") => {
                let content_type = field
                    .content_type()
                    .ok_or_else(|| unsupported("missing content type"))?
                    .to_owned();
                if !state.allowed_mime.iter().any(|allowed| *allowed == content_type) {
                    return Err(unsupported(&content_type));
                }
                let mime: Mime = content_type
                    .parse()
                    .map_err(|_| unsupported(&content_type))?;
                let name = field.file_name().unwrap_or("upload").to_owned();
                let data = field
                    .bytes()
                    .await
                    .map_err(|err| malformed(err.to_string()))?;
                stored = Some(state.media.store(&name, &mime, data).await?);
            }
            Some("oldPath") => {
                old_path = Some(
                    field
                        .text()
                        .await
                        .map_err(|err| malformed(err.to_string()))?,
                );
            }
            _ => {}
        }
    }

    let Some(file_path) = stored else {
        return Ok((StatusCode::OK, Json(json!({ "message": "No file provided" }))));
    };

    // The old file goes only after the replacement is durably stored.
    if let Some(old) = old_path.filter(|p| !p.is_empty()) {
        state.media.remove(&old).await;
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "File stored", "filePath": file_path })),
    ))
}

fn malformed(detail: String) -> ApiError {
    ApiError(DomainError::validation(
        "Malformed upload",
        vec![FieldError::new("image", detail)],
    ))
}

fn unsupported(content_type: &str) -> ApiError {
    ApiError(DomainError::validation(
        "Invalid input",
        vec![FieldError::new(
            "image",
            format!("Unsupported image type: {content_type}"),
        )],
    ))
}
