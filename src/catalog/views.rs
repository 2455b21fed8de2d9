//! Read-only selections over a [`CatalogSnapshot`] used by the pages.

use std::cmp::Ordering;

use serde::Deserialize;

use super::CatalogSnapshot;
use crate::model::{Category, Video, VideoStatus};

/// How many videos the home page lists under "latest" and "most popular".
pub const HOME_LIST_LEN: usize = 3;

/// How many videos follow the spotlight on the videos page.
pub const SPOTLIGHT_MORE_LEN: usize = 2;

/// How many related videos the detail page shows.
pub const RELATED_LEN: usize = 2;

/// Published videos marked for the home hero, in insertion order.
pub fn featured_on_home(snapshot: &CatalogSnapshot) -> Vec<&Video> {
    snapshot
        .published()
        .filter(|video| video.is_featured_on_home)
        .collect()
}

/// Published videos, newest first. Videos from the same day keep insertion order.
pub fn latest(snapshot: &CatalogSnapshot, n: usize) -> Vec<&Video> {
    let mut videos: Vec<_> = snapshot.published().collect();
    videos.sort_by(|a, b| b.date.cmp(&a.date));
    videos.truncate(n);
    videos
}

/// Published videos, most viewed first. Ties keep insertion order.
pub fn most_popular(snapshot: &CatalogSnapshot, n: usize) -> Vec<&Video> {
    let mut videos: Vec<_> = snapshot.published().collect();
    videos.sort_by(|a, b| b.views.cmp(&a.views));
    videos.truncate(n);
    videos
}

/// The home page hero: the first video featured on home, else the latest one.
pub fn hero(snapshot: &CatalogSnapshot) -> Option<&Video> {
    snapshot
        .published()
        .find(|video| video.is_featured_on_home)
        .or_else(|| latest(snapshot, 1).into_iter().next())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spotlight<'a> {
    pub video: &'a Video,
    pub more: Vec<&'a Video>,
}

/// The videos page header: the newest `featured` video (or simply the newest)
/// followed by the next couple of published videos.
pub fn spotlight(snapshot: &CatalogSnapshot) -> Option<Spotlight<'_>> {
    let videos = latest(snapshot, usize::MAX);
    let video = videos
        .iter()
        .find(|video| video.featured)
        .or_else(|| videos.first())
        .copied()?;

    let more = videos
        .into_iter()
        .filter(|other| other.id != video.id)
        .take(SPOTLIGHT_MORE_LEN)
        .collect();

    Some(Spotlight { video, more })
}

/// Other published videos to suggest next to `id`.
pub fn related<'a>(snapshot: &'a CatalogSnapshot, id: &str, n: usize) -> Vec<&'a Video> {
    snapshot
        .published()
        .filter(|video| video.id != *id)
        .take(n)
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    #[serde(untagged)]
    Only(VideoStatus),
}

impl StatusFilter {
    pub fn matches(self, status: VideoStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(only) => only == status,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Date,
    Views,
    Title,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Search, filter and sort options of the admin video tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AdminQuery {
    pub search: Option<String>,
    pub status: StatusFilter,
    pub category: Option<Category>,
    pub sort: SortKey,
    pub order: SortOrder,
}

impl AdminQuery {
    /// Matches `search` against title and host, ignoring case.
    pub fn matches(&self, video: &Video) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(search) => {
                let search = search.to_lowercase();
                video.title.to_lowercase().contains(&search)
                    || video.host.to_lowercase().contains(&search)
            }
        };

        let matches_category = self
            .category
            .map_or(true, |category| video.category == category);

        matches_search && matches_category && self.status.matches(video.status)
    }

    pub fn apply<'a>(&self, videos: &'a [Video]) -> Vec<&'a Video> {
        let mut selected: Vec<_> = videos.iter().filter(|video| self.matches(video)).collect();

        selected.sort_by(|a, b| {
            let ordering = self.compare(a, b);
            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        selected
    }

    fn compare(&self, a: &Video, b: &Video) -> Ordering {
        match self.sort {
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::Views => a.views.cmp(&b.views),
            SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::catalog::VideoCatalog;
    use crate::model::VideoId;

    fn video(id: &str, day: u32, views: u64) -> Video {
        Video {
            id: VideoId::from(id),
            title: format!("Video {id}"),
            description: String::new(),
            thumbnail: String::new(),
            video_url: String::new(),
            views,
            comments: 0,
            likes: 0,
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            duration: "10:00".to_string(),
            status: VideoStatus::Published,
            host: "CZ".to_string(),
            category: Category::Educational,
            tags: vec![],
            featured: false,
            is_featured_on_home: false,
        }
    }

    fn snapshot(videos: Vec<Video>) -> std::sync::Arc<CatalogSnapshot> {
        VideoCatalog::new(videos).unwrap().snapshot()
    }

    fn ids(videos: &[&Video]) -> Vec<String> {
        videos.iter().map(|video| video.id.to_string()).collect()
    }

    #[test]
    fn hero_prefers_the_first_featured_on_home() {
        let mut a = video("a", 1, 0);
        a.is_featured_on_home = true;
        let mut b = video("b", 20, 0);
        b.is_featured_on_home = true;
        let snapshot = snapshot(vec![video("c", 25, 0), a, b]);

        assert_eq!(hero(&snapshot).unwrap().id.as_ref(), "a");
        assert_eq!(ids(&featured_on_home(&snapshot)), ["a", "b"]);
    }

    #[test]
    fn hero_falls_back_to_the_latest_video() {
        let snapshot = snapshot(vec![video("old", 1, 0), video("new", 9, 0)]);
        assert_eq!(hero(&snapshot).unwrap().id.as_ref(), "new");

        let empty = self::snapshot(vec![]);
        assert_eq!(hero(&empty), None);
    }

    #[test]
    fn hero_ignores_unpublished_featured_videos() {
        let mut draft = video("draft", 30, 0);
        draft.status = VideoStatus::Draft;
        draft.is_featured_on_home = true;
        let snapshot = snapshot(vec![draft, video("live", 2, 0)]);

        assert_eq!(hero(&snapshot).unwrap().id.as_ref(), "live");
    }

    #[test]
    fn latest_is_stable_on_equal_dates() {
        let snapshot = snapshot(vec![
            video("1", 5, 0),
            video("2", 7, 0),
            video("3", 5, 0),
            video("4", 7, 0),
        ]);

        assert_eq!(ids(&latest(&snapshot, 3)), ["2", "4", "1"]);
    }

    #[test]
    fn most_popular_skips_unpublished_and_keeps_ties_in_order() {
        let mut hidden = video("hidden", 1, 1_000_000);
        hidden.status = VideoStatus::Scheduled;
        let snapshot = snapshot(vec![
            video("1", 1, 50),
            hidden,
            video("2", 1, 90),
            video("3", 1, 50),
            video("4", 1, 10),
        ]);

        assert_eq!(
            ids(&most_popular(&snapshot, HOME_LIST_LEN)),
            ["2", "1", "3"]
        );
    }

    #[test]
    fn spotlight_prefers_featured_over_newest() {
        let mut featured = video("featured", 2, 0);
        featured.featured = true;
        let snapshot = snapshot(vec![
            video("a", 9, 0),
            featured,
            video("b", 8, 0),
            video("c", 7, 0),
        ]);

        let spotlight = spotlight(&snapshot).unwrap();
        assert_eq!(spotlight.video.id.as_ref(), "featured");
        assert_eq!(ids(&spotlight.more), ["a", "b"]);
    }

    #[test]
    fn spotlight_without_featured_uses_newest() {
        let snapshot = snapshot(vec![video("a", 1, 0), video("b", 3, 0)]);

        let spotlight = spotlight(&snapshot).unwrap();
        assert_eq!(spotlight.video.id.as_ref(), "b");
        assert_eq!(ids(&spotlight.more), ["a"]);
    }

    #[test]
    fn related_excludes_the_current_video() {
        let snapshot = snapshot(vec![video("1", 1, 0), video("2", 1, 0), video("3", 1, 0)]);
        assert_eq!(ids(&related(&snapshot, "2", RELATED_LEN)), ["1", "3"]);
    }

    #[test]
    fn admin_query_searches_title_and_host() {
        let mut yi = video("1", 1, 0);
        yi.host = "Yi He".to_string();
        let mut defi = video("2", 1, 0);
        defi.title = "DeFi explained".to_string();
        let videos = vec![yi, defi, video("3", 1, 0)];

        let query = AdminQuery {
            search: Some("yI".to_string()),
            ..AdminQuery::default()
        };
        assert_eq!(ids(&query.apply(&videos)), ["1"]);

        let query = AdminQuery {
            search: Some("defi".to_string()),
            ..AdminQuery::default()
        };
        assert_eq!(ids(&query.apply(&videos)), ["2"]);
    }

    #[test]
    fn admin_query_sorts_and_filters() {
        let mut draft = video("draft", 3, 5);
        draft.status = VideoStatus::Draft;
        let videos = vec![video("1", 1, 30), draft, video("2", 2, 10)];

        let query: AdminQuery = serde_json::from_value(serde_json::json!({
            "status": "published",
            "sort": "views",
            "order": "asc",
        }))
        .unwrap();
        assert_eq!(ids(&query.apply(&videos)), ["2", "1"]);

        let query: AdminQuery = serde_json::from_value(serde_json::json!({ "status": "all" })).unwrap();
        assert_eq!(ids(&query.apply(&videos)), ["draft", "2", "1"]);
    }
}
