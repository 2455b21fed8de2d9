use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_template::RenderHtml;
use serde::Serialize;
use tera::Tera;

use super::view::{HomeView, TokenView, VideoDetail, VideosView};
use super::{App, Templates};
use crate::model::today;
use crate::settings::SiteSettings;

const TEMPLATES: [(&str, &str); 10] = [
    ("base.html", include_str!("../../templates/base.html")),
    ("home.html", include_str!("../../templates/home.html")),
    ("about.html", include_str!("../../templates/about.html")),
    ("videos.html", include_str!("../../templates/videos.html")),
    ("video.html", include_str!("../../templates/video.html")),
    ("video_not_found.html", include_str!("../../templates/video_not_found.html")),
    ("token.html", include_str!("../../templates/token.html")),
    ("blog.html", include_str!("../../templates/blog.html")),
    ("maintenance.html", include_str!("../../templates/maintenance.html")),
    ("card.html", include_str!("../../templates/card.html")),
];

/// Compiles the page templates bundled into the binary.
pub fn templates() -> Result<Templates, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES)?;

    Ok(Templates::from(tera))
}

/// Every page gets the site settings for the layout.
#[derive(Debug, Serialize)]
struct Page<T> {
    site: SiteSettings,
    #[serde(flatten)]
    view: T,
}

fn render<T: Serialize>(app: &App, key: &'static str, view: T) -> Response {
    let page = Page {
        site: app.settings.current(),
        view,
    };

    RenderHtml(key, app.templates.clone(), page).into_response()
}

#[derive(Debug, Serialize)]
struct Empty {}

/// Answers every page with 503 while maintenance mode is on.
pub async fn maintenance(State(app): State<App>, request: Request, next: Next) -> Response {
    if app.settings.maintenance_mode() {
        let page = render(&app, "maintenance.html", Empty {});
        return (StatusCode::SERVICE_UNAVAILABLE, page).into_response();
    }

    next.run(request).await
}

pub async fn home(State(app): State<App>) -> Response {
    let view = HomeView::build(&app.catalog.snapshot(), app.token.current(), today());
    render(&app, "home.html", view)
}

pub async fn about(State(app): State<App>) -> Response {
    render(&app, "about.html", Empty {})
}

pub async fn videos(State(app): State<App>) -> Response {
    let view = VideosView::build(&app.catalog.snapshot(), today());
    render(&app, "videos.html", view)
}

#[derive(Debug, Serialize)]
struct Missing {
    id: String,
}

pub async fn video(State(app): State<App>, Path(id): Path<String>) -> Response {
    match VideoDetail::build(&app.catalog.snapshot(), &id, today()) {
        Some(view) => render(&app, "video.html", view),
        None => {
            let page = render(&app, "video_not_found.html", Missing { id });
            (StatusCode::NOT_FOUND, page).into_response()
        }
    }
}

pub async fn token(State(app): State<App>) -> Response {
    let view = TokenView::new(app.token.current(), &app.token_info);
    render(&app, "token.html", view)
}

pub async fn blog(State(app): State<App>) -> Response {
    render(&app, "blog.html", Empty {})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_templates_compile() {
        assert!(templates().is_ok());
    }
}
