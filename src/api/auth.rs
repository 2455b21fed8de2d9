use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use snafu::{ensure, Location, OptionExt as _, Snafu};

use super::App;

#[derive(Debug, Snafu, Serialize)]
#[snafu(visibility(pub(crate)))]
#[serde(tag = "error", content = "data")]
pub enum AuthError {
    #[snafu(display("request is not authenticated"))]
    ExtractToken {
        #[serde(skip)]
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("the provided token is not valid"))]
    InvalidToken {
        #[serde(skip)]
        #[snafu(implicit)]
        location: Location,
    },
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    message: String,
    #[serde(flatten)]
    data: AuthError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let content = AuthResponse {
            message: self.to_string(),
            data: self,
        };

        (StatusCode::UNAUTHORIZED, Json(content)).into_response()
    }
}

/// Shared secret of the admin area.
#[derive(Clone)]
pub struct AdminToken(Arc<str>);

impl std::fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminToken(..)")
    }
}

impl AdminToken {
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self(token.into())
    }

    pub fn extract_token(request: &Request) -> Result<&str, AuthError> {
        let header = request
            .headers()
            .get(header::AUTHORIZATION)
            .context(ExtractTokenSnafu)?;

        let token = header.to_str().ok().context(ExtractTokenSnafu)?;
        token.strip_prefix("Bearer ").context(ExtractTokenSnafu)
    }

    /// An empty configured token never matches anything.
    pub fn verify(&self, request: &Request) -> Result<(), AuthError> {
        let token = Self::extract_token(request)?;
        ensure!(!self.0.is_empty() && constant_time_eq(token.as_bytes(), self.0.as_bytes()), InvalidTokenSnafu);

        Ok(())
    }
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    left.len() == right.len() && left.iter().zip(right).fold(0, |acc, (a, b)| acc | (a ^ b)) == 0
}

pub async fn require_admin(
    State(app): State<App>, request: Request, next: Next,
) -> Result<Response, AuthError> {
    if let Err(error) = app.admin_token.verify(&request) {
        tracing::warn!(path = %request.uri().path(), "rejected admin request: {}", error);
        return Err(error);
    }

    Ok(next.run(request).await)
}
