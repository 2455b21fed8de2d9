use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};
use snafu::ResultExt as _;
use tracing::instrument;

use super::error::{ApiError, SubscribersSnafu, UserNotFoundSnafu, VideoNotFoundSnafu};
use super::App;
use crate::catalog::views::{self, AdminQuery};
use crate::model::{
    today, AdminUser, NewUser, NewVideo, Subscriber, SubscriberRow, UserId, UserPatch, Video,
    VideoPatch, VideoStatus,
};
use crate::newsletter::{self, SubscriberRepository as _};
use crate::settings::{SettingsPatch, SiteSettings};
use crate::users::UserQuery;

/// How many videos the dashboard ranks by views.
const TOP_VIDEOS: usize = 3;

pub async fn videos(State(app): State<App>, Query(query): Query<AdminQuery>) -> Json<Vec<Video>> {
    let snapshot = app.catalog.snapshot();
    Json(query.apply(snapshot.videos()).into_iter().cloned().collect())
}

pub async fn video(State(app): State<App>, Path(id): Path<String>) -> Result<Json<Video>, ApiError> {
    match app.catalog.get_video(&id) {
        Some(video) => Ok(Json(video)),
        None => VideoNotFoundSnafu { id }.fail(),
    }
}

pub async fn create_video(State(app): State<App>, Json(video): Json<NewVideo>) -> impl IntoResponse {
    (StatusCode::CREATED, Json(app.catalog.insert_video(video)))
}

/// Applies `patch` and answers with the record exactly as this patch left it.
fn patched(app: &App, id: String, patch: VideoPatch) -> Result<Json<Video>, ApiError> {
    match app.catalog.patch_video(&id, patch) {
        Some(video) => Ok(Json(video)),
        None => VideoNotFoundSnafu { id }.fail(),
    }
}

pub async fn update_video(
    State(app): State<App>, Path(id): Path<String>, Json(patch): Json<VideoPatch>,
) -> Result<Json<Video>, ApiError> {
    patched(&app, id, patch)
}

pub async fn delete_video(State(app): State<App>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    if app.catalog.delete_video(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        VideoNotFoundSnafu { id }.fail()
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Toggle {
    pub value: bool,
}

pub async fn set_featured(
    State(app): State<App>, Path(id): Path<String>, Json(toggle): Json<Toggle>,
) -> Result<Json<Video>, ApiError> {
    patched(&app, id, VideoPatch::featured(toggle.value))
}

pub async fn set_featured_on_home(
    State(app): State<App>, Path(id): Path<String>, Json(toggle): Json<Toggle>,
) -> Result<Json<Video>, ApiError> {
    patched(&app, id, VideoPatch::featured_on_home(toggle.value))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_videos: usize,
    pub published: usize,
    pub scheduled: usize,
    pub drafts: usize,
    pub total_views: u64,
    pub total_comments: u64,
    pub total_likes: u64,
    pub top_videos: Vec<Video>,
    pub featured: Vec<Video>,
    pub featured_on_home: Vec<Video>,
    pub subscribers: usize,
    pub users: usize,
}

#[instrument(skip(app))]
pub async fn dashboard(State(app): State<App>) -> Result<Json<Dashboard>, ApiError> {
    let snapshot = app.catalog.snapshot();
    let videos = snapshot.videos();
    let count = |status: VideoStatus| videos.iter().filter(|video| video.status == status).count();

    let subscribers = app.database.subscribers().await.context(SubscribersSnafu)?;

    Ok(Json(Dashboard {
        total_videos: videos.len(),
        published: count(VideoStatus::Published),
        scheduled: count(VideoStatus::Scheduled),
        drafts: count(VideoStatus::Draft),
        total_views: videos.iter().map(|video| video.views).sum(),
        total_comments: videos.iter().map(|video| video.comments).sum(),
        total_likes: videos.iter().map(|video| video.likes).sum(),
        top_videos: views::most_popular(&snapshot, TOP_VIDEOS).into_iter().cloned().collect(),
        featured: videos.iter().filter(|video| video.featured).cloned().collect(),
        featured_on_home: videos.iter().filter(|video| video.is_featured_on_home).cloned().collect(),
        subscribers: subscribers.len(),
        users: app.users.count(),
    }))
}

pub async fn users(State(app): State<App>, Query(query): Query<UserQuery>) -> Json<Vec<AdminUser>> {
    Json(app.users.list(&query))
}

pub async fn create_user(State(app): State<App>, Json(user): Json<NewUser>) -> impl IntoResponse {
    (StatusCode::CREATED, Json(app.users.add(user)))
}

pub async fn update_user(
    State(app): State<App>, Path(id): Path<u64>, Json(patch): Json<UserPatch>,
) -> Result<Json<AdminUser>, ApiError> {
    let id = UserId(id);
    match app.users.update(id, patch) {
        Some(user) => Ok(Json(user)),
        None => UserNotFoundSnafu { id }.fail(),
    }
}

pub async fn delete_user(State(app): State<App>, Path(id): Path<u64>) -> Result<StatusCode, ApiError> {
    let id = UserId(id);
    if app.users.delete(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        UserNotFoundSnafu { id }.fail()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubscriberQuery {
    pub search: Option<String>,
}

async fn matching_subscribers(app: &App, query: &SubscriberQuery) -> Result<Vec<Subscriber>, ApiError> {
    let subscribers = app.database.subscribers().await.context(SubscribersSnafu)?;

    Ok(match query.search.as_deref() {
        Some(search) => newsletter::search(&subscribers, search).into_iter().cloned().collect(),
        None => subscribers,
    })
}

pub async fn subscribers(
    State(app): State<App>, Query(query): Query<SubscriberQuery>,
) -> Result<Json<Vec<SubscriberRow>>, ApiError> {
    let subscribers = matching_subscribers(&app, &query).await?;
    Ok(Json(subscribers.iter().map(SubscriberRow::from).collect()))
}

pub async fn export_subscribers(
    State(app): State<App>, Query(query): Query<SubscriberQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let subscribers = matching_subscribers(&app, &query).await?;
    let disposition = format!("attachment; filename=\"{}\"", newsletter::export_file_name(today()));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        newsletter::export_csv(&subscribers),
    ))
}

pub async fn settings(State(app): State<App>) -> Json<SiteSettings> {
    Json(app.settings.current())
}

pub async fn update_settings(State(app): State<App>, Json(patch): Json<SettingsPatch>) -> Json<SiteSettings> {
    Json(app.settings.update(patch))
}
