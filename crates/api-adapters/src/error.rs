//! Error mapping for both arms. REST responses are
//! `{message, data}` with the mapped HTTP status; internal failures are
//! logged server-side and never leak their driver message.

use serde_json::{json, Value};

use domains::error::DomainError;

/// The client-facing message for a domain error. Internal errors are
/// replaced with a generic line; everything else surfaces verbatim.
pub fn client_message(err: &DomainError) -> String {
    match err {
        DomainError::Internal(detail) => {
            tracing::error!(%detail, "internal error reached the API boundary");
            "An error occurred".into()
        }
        other => other.to_string(),
    }
}

/// The `data` slot: field-level details for validation failures, null
/// otherwise.
pub fn client_data(err: &DomainError) -> Value {
    err.details()
        .and_then(|details| serde_json::to_value(details).ok())
        .unwrap_or(Value::Null)
}

#[cfg(feature = "web-axum")]
mod response {
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;

    use super::*;

    /// Newtype so `?` works in handlers: any `DomainError` becomes the
    /// uniform `{message, data}` body.
    #[derive(Debug)]
    pub struct ApiError(pub DomainError);

    impl From<DomainError> for ApiError {
        fn from(err: DomainError) -> Self {
            Self(err)
        }
    }

    impl IntoResponse for ApiError {
        fn into_response(self) -> Response {
            let status = StatusCode::from_u16(self.0.status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let body = json!({
                "message": client_message(&self.0),
                "data": client_data(&self.0),
            });
            (status, Json(body)).into_response()
        }
    }
}

#[cfg(feature = "web-axum")]
pub use response::ApiError;
