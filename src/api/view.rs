//! Shapes handed to templates and to the public JSON API.

use chrono::NaiveDate;
use serde::Serialize;

use super::TokenInfo;
use crate::catalog::{views, CatalogSnapshot};
use crate::format::{format_relative_date, format_views};
use crate::model::{Category, Video, VideoId};
use crate::ticker::TokenStats;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoCard {
    pub id: VideoId,
    pub href: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub video_url: String,
    pub duration: String,
    pub host: String,
    pub category: Category,
    pub category_label: &'static str,
    pub tags: Vec<String>,
    pub views: String,
    pub date: NaiveDate,
    pub date_label: String,
}

impl VideoCard {
    pub fn new(video: &Video, today: NaiveDate) -> Self {
        Self {
            id: video.id.clone(),
            href: format!("/videos/{}", video.id),
            title: video.title.clone(),
            description: video.description.clone(),
            thumbnail: video.thumbnail.clone(),
            video_url: video.video_url.clone(),
            duration: video.duration.clone(),
            host: video.host.clone(),
            category: video.category,
            category_label: video.category.label(),
            tags: video.tags.clone(),
            views: format_views(video.views),
            date: video.date,
            date_label: format_relative_date(video.date, today),
        }
    }

    fn list(videos: &[&Video], today: NaiveDate) -> Vec<Self> {
        videos.iter().map(|video| Self::new(video, today)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub hero: Option<VideoCard>,
    pub latest: Vec<VideoCard>,
    pub popular: Vec<VideoCard>,
    pub token: TokenStats,
}

impl HomeView {
    pub fn build(snapshot: &CatalogSnapshot, token: TokenStats, today: NaiveDate) -> Self {
        Self {
            hero: views::hero(snapshot).map(|video| VideoCard::new(video, today)),
            latest: VideoCard::list(&views::latest(snapshot, views::HOME_LIST_LEN), today),
            popular: VideoCard::list(&views::most_popular(snapshot, views::HOME_LIST_LEN), today),
            token,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideosView {
    pub spotlight: Option<VideoCard>,
    pub more: Vec<VideoCard>,
    pub videos: Vec<VideoCard>,
}

impl VideosView {
    pub fn build(snapshot: &CatalogSnapshot, today: NaiveDate) -> Self {
        let (spotlight, more) = match views::spotlight(snapshot) {
            Some(spotlight) => (
                Some(VideoCard::new(spotlight.video, today)),
                VideoCard::list(&spotlight.more, today),
            ),
            None => (None, vec![]),
        };

        Self {
            spotlight,
            more,
            videos: VideoCard::list(&views::latest(snapshot, usize::MAX), today),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetail {
    pub video: VideoCard,
    pub likes: u64,
    pub comments: u64,
    pub related: Vec<VideoCard>,
}

impl VideoDetail {
    /// `None` unless `id` names a published video.
    pub fn build(snapshot: &CatalogSnapshot, id: &str, today: NaiveDate) -> Option<Self> {
        let video = snapshot.get(id).filter(|video| video.is_published())?;
        let related = views::related(snapshot, id, views::RELATED_LEN);

        Some(Self {
            video: VideoCard::new(video, today),
            likes: video.likes,
            comments: video.comments,
            related: VideoCard::list(&related, today),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenView {
    #[serde(flatten)]
    pub stats: TokenStats,
    pub change_label: String,
    pub is_up: bool,
    #[serde(flatten)]
    pub info: TokenInfo,
    pub chart_url: String,
}

impl TokenView {
    pub fn new(stats: TokenStats, info: &TokenInfo) -> Self {
        Self {
            change_label: stats.change_label(),
            is_up: stats.is_up(),
            chart_url: info.chart_url(),
            info: info.clone(),
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VideoCatalog;
    use crate::model::{VideoPatch, VideoStatus};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 23).unwrap()
    }

    #[test]
    fn card_formats_counters_and_dates() {
        let catalog = VideoCatalog::seeded().unwrap();
        let video = catalog.get_video("1").unwrap();

        let card = VideoCard::new(&video, today());
        assert_eq!(card.href, "/videos/1");
        assert_eq!(card.views, "24.5K");
        assert_eq!(card.date_label, "Yesterday");
        assert_eq!(card.category_label, "Educational");
    }

    #[test]
    fn home_view_uses_the_hero_chain() {
        let catalog = VideoCatalog::seeded().unwrap();
        let home = HomeView::build(&catalog.snapshot(), TokenStats::fallback(), today());

        assert_eq!(home.hero.unwrap().id.as_ref(), "1");
        assert_eq!(home.latest.len(), 2);
        assert_eq!(home.popular[0].id.as_ref(), "1");
    }

    #[test]
    fn detail_hides_unpublished_videos() {
        let catalog = VideoCatalog::seeded().unwrap();
        let patch = VideoPatch {
            status: Some(VideoStatus::Draft),
            ..VideoPatch::default()
        };
        catalog.update_video("2", patch);
        let snapshot = catalog.snapshot();

        assert!(VideoDetail::build(&snapshot, "2", today()).is_none());
        assert!(VideoDetail::build(&snapshot, "404", today()).is_none());

        let detail = VideoDetail::build(&snapshot, "1", today()).unwrap();
        assert!(detail.related.is_empty());
    }

    #[test]
    fn token_view_links_the_chart() {
        let info = TokenInfo::new("0xtoken".to_string(), "0xpair".to_string());
        let view = TokenView::new(TokenStats::fallback(), &info);

        assert_eq!(view.chart_url, "https://dexscreener.com/bsc/0xpair");
        assert_eq!(view.change_label, "-40.49%");
        assert!(!view.is_up);
    }
}
