use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Method;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, patch, post, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

mod admin;
mod auth;
mod error;
mod pages;
mod public;
mod state;
mod view;

pub use auth::{AdminToken, AuthError};
pub use error::ApiError;
pub use pages::templates;
pub use state::{App, Templates, TokenInfo};
pub use view::{HomeView, TokenView, VideoCard, VideoDetail, VideosView};

/// Server-rendered pages, closed while maintenance mode is on.
fn pages(app: &App) -> Router<App> {
    Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/videos", get(pages::videos))
        .route("/videos/:id", get(pages::video))
        .route("/token", get(pages::token))
        .route("/blog", get(pages::blog))
        .route_layer(from_fn_with_state(app.clone(), pages::maintenance))
}

fn public() -> Router<App> {
    Router::new()
        .route("/home", get(public::home))
        .route("/videos", get(public::videos))
        .route("/videos/:id", get(public::video))
        .route("/token", get(public::token))
        .route("/subscribe", post(public::subscribe))
}

fn admin(app: &App) -> Router<App> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/videos", get(admin::videos).post(admin::create_video))
        .route(
            "/videos/:id",
            get(admin::video).patch(admin::update_video).delete(admin::delete_video),
        )
        .route("/videos/:id/featured", put(admin::set_featured))
        .route("/videos/:id/featured-on-home", put(admin::set_featured_on_home))
        .route("/users", get(admin::users).post(admin::create_user))
        .route("/users/:id", patch(admin::update_user).delete(admin::delete_user))
        .route("/subscribers", get(admin::subscribers))
        .route("/subscribers.csv", get(admin::export_subscribers))
        .route("/settings", get(admin::settings).patch(admin::update_settings))
        .route_layer(from_fn_with_state(app.clone(), auth::require_admin))
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(3600))
}

pub fn router(app: App) -> Router {
    Router::new()
        .merge(pages(&app))
        .nest("/api", public())
        .nest("/admin/api", admin(&app))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(cors()),
        )
        .with_state(app)
}
