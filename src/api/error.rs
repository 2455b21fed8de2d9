use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use snafu::{Location, Snafu};

use crate::database::DatabaseError;
use crate::model::UserId;

#[derive(Debug, Snafu, Serialize)]
#[snafu(visibility(pub(crate)))]
#[serde(tag = "error", content = "data")]
pub enum ApiError {
    #[snafu(display("video `{id}` does not exist"))]
    VideoNotFound { id: String },

    #[snafu(display("user `{id}` does not exist"))]
    UserNotFound { id: UserId },

    #[snafu(display("failed to load subscribers"))]
    Subscribers {
        #[serde(skip)]
        source: DatabaseError,

        #[serde(skip)]
        #[snafu(implicit)]
        location: Location,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::VideoNotFound { .. } | ApiError::UserNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Subscribers { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse<'a> {
    message: String,
    #[serde(flatten)]
    data: &'a ApiError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if self.status().is_server_error() {
            tracing::error!(error = ?self, "{}", self);
        }

        let content = ErrorResponse {
            message: self.to_string(),
            data: &self,
        };

        (self.status(), Json(content)).into_response()
    }
}
