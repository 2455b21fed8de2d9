use axum::extract::{FromRequest, Path, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use axum_extra::extract::Query;
use serde::Deserialize;
use tracing::instrument;

use super::error::{ApiError, VideoNotFoundSnafu};
use super::view::{HomeView, TokenView, VideoCard, VideoDetail};
use super::App;
use crate::model::{today, Category};
use crate::newsletter::{subscribe as add_subscriber, Subscription};

pub async fn home(State(app): State<App>) -> Json<HomeView> {
    Json(HomeView::build(&app.catalog.snapshot(), app.token.current(), today()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VideosQuery {
    pub category: Option<Category>,
}

/// Published videos only, newest first.
pub async fn videos(State(app): State<App>, Query(query): Query<VideosQuery>) -> Json<Vec<VideoCard>> {
    let snapshot = app.catalog.snapshot();
    let today = today();

    let videos = crate::catalog::views::latest(&snapshot, usize::MAX)
        .into_iter()
        .filter(|video| query.category.map_or(true, |category| video.category == category))
        .map(|video| VideoCard::new(video, today))
        .collect();

    Json(videos)
}

pub async fn video(State(app): State<App>, Path(id): Path<String>) -> Result<Json<VideoDetail>, ApiError> {
    match VideoDetail::build(&app.catalog.snapshot(), &id, today()) {
        Some(detail) => Ok(Json(detail)),
        None => VideoNotFoundSnafu { id }.fail(),
    }
}

pub async fn token(State(app): State<App>) -> Json<TokenView> {
    Json(TokenView::new(app.token.current(), &app.token_info))
}

#[derive(Debug, Default, Deserialize)]
pub struct SubscribeForm {
    #[serde(default)]
    pub email: String,
}

/// Newsletter signup from the site form, or from JSON clients.
#[instrument(skip(app, request))]
pub async fn subscribe(State(app): State<App>, request: Request) -> Response {
    let is_json = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    let form = if is_json {
        Json::<SubscribeForm>::from_request(request, &app)
            .await
            .map(|Json(form)| form)
            .map_err(IntoResponse::into_response)
    } else {
        Form::<SubscribeForm>::from_request(request, &app)
            .await
            .map(|Form(form)| form)
            .map_err(IntoResponse::into_response)
    };

    let form = match form {
        Ok(form) => form,
        Err(rejection) => return rejection,
    };

    let outcome = add_subscriber(&app.database, &form.email).await;
    let status = match outcome {
        Subscription::Subscribed | Subscription::AlreadySubscribed => StatusCode::OK,
        Subscription::InvalidEmail => StatusCode::UNPROCESSABLE_ENTITY,
        Subscription::Failed => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(outcome.response())).into_response()
}
