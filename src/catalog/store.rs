use std::collections::HashSet;
use std::sync::Arc;

use snafu::ensure;
use tokio::sync::watch;
use tracing::instrument;

use super::{seed_videos, CatalogError, DuplicateIdSnafu};
use crate::model::{NewVideo, Video, VideoId, VideoPatch, VideoStatus};

/// An immutable view of the catalog at one revision.
///
/// Snapshots are never modified after they are published; every successful
/// mutation produces a new one with a higher revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSnapshot {
    revision: u64,
    videos: Vec<Video>,
}

impl CatalogSnapshot {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// All videos in insertion order, regardless of status.
    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn get(&self, id: &str) -> Option<&Video> {
        self.videos.iter().find(|video| video.id == *id)
    }

    pub fn published(&self) -> impl Iterator<Item = &Video> {
        self.videos.iter().filter(|video| video.is_published())
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.videos.iter().position(|video| video.id == *id)
    }

    fn next(&self, videos: Vec<Video>) -> Arc<Self> {
        Arc::new(Self {
            revision: self.revision + 1,
            videos,
        })
    }
}

/// The only way to narrow [`VideoCatalog::get_videos`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoFilter {
    Status(VideoStatus),
}

impl VideoFilter {
    pub fn matches(&self, video: &Video) -> bool {
        match self {
            VideoFilter::Status(status) => video.status == *status,
        }
    }
}

/// The in-memory authority over video records.
///
/// Readers take a snapshot or subscribe for changes; writers go through the
/// methods below, which serialize on the channel and publish whole snapshots.
#[derive(Debug, Clone)]
pub struct VideoCatalog {
    sender: Arc<watch::Sender<Arc<CatalogSnapshot>>>,
}

impl VideoCatalog {
    pub fn new(videos: Vec<Video>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(videos.len());
        for video in &videos {
            ensure!(
                seen.insert(&video.id),
                DuplicateIdSnafu {
                    id: video.id.clone()
                }
            );
        }

        let snapshot = CatalogSnapshot {
            revision: 0,
            videos,
        };

        Ok(Self {
            sender: Arc::new(watch::Sender::new(Arc::new(snapshot))),
        })
    }

    /// A catalog loaded with the bundled seed videos.
    pub fn seeded() -> Result<Self, CatalogError> {
        Self::new(seed_videos()?)
    }

    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.sender.borrow().clone()
    }

    /// Receives every snapshot published after a successful mutation.
    pub fn subscribe(&self) -> watch::Receiver<Arc<CatalogSnapshot>> {
        self.sender.subscribe()
    }

    pub fn get_video(&self, id: &str) -> Option<Video> {
        self.sender.borrow().get(id).cloned()
    }

    /// A fresh list in insertion order, narrowed by `filter` when one is given.
    pub fn get_videos(&self, filter: Option<VideoFilter>) -> Vec<Video> {
        let snapshot = self.sender.borrow();

        match filter {
            Some(filter) => snapshot
                .videos
                .iter()
                .filter(|video| filter.matches(video))
                .cloned()
                .collect(),
            None => snapshot.videos.clone(),
        }
    }

    pub fn update_video(&self, id: &str, patch: VideoPatch) -> bool {
        self.patch_video(id, patch).is_some()
    }

    /// Like [`VideoCatalog::update_video`], answering with the record as this
    /// patch left it.
    #[instrument(skip(self, patch))]
    pub fn patch_video(&self, id: &str, patch: VideoPatch) -> Option<Video> {
        let updated = self.modify(id, |videos, index| {
            patch.apply(&mut videos[index]);
            videos[index].clone()
        });

        if updated.is_some() {
            tracing::info!("updated video `{}`", id);
        }

        updated
    }

    #[instrument(skip(self))]
    pub fn delete_video(&self, id: &str) -> bool {
        let deleted = self
            .modify(id, |videos, index| {
                videos.remove(index);
            })
            .is_some();

        if deleted {
            tracing::info!("deleted video `{}`", id);
        }

        deleted
    }

    pub fn set_featured(&self, id: &str, featured: bool) -> bool {
        self.update_video(id, VideoPatch::featured(featured))
    }

    pub fn set_featured_on_home(&self, id: &str, featured: bool) -> bool {
        self.update_video(id, VideoPatch::featured_on_home(featured))
    }

    /// Appends a new video under the next free numeric id.
    #[instrument(skip(self, video), fields(title = %video.title))]
    pub fn insert_video(&self, video: NewVideo) -> Video {
        let mut video = video.into_video(VideoId::new(""));

        self.sender.send_modify(|current| {
            video.id = next_id(current.videos());
            let mut videos = current.videos.clone();
            videos.push(video.clone());

            *current = current.next(videos);
        });

        tracing::info!("inserted video `{}`", video.id);
        video
    }

    /// Runs `edit` on a copy of the videos when `id` exists and publishes the copy.
    ///
    /// `None` when there is no such video; nothing is published then.
    fn modify<R>(&self, id: &str, edit: impl FnOnce(&mut Vec<Video>, usize) -> R) -> Option<R> {
        let mut outcome = None;

        self.sender.send_if_modified(|current| {
            let Some(index) = current.position(id) else {
                return false;
            };

            let mut videos = current.videos.clone();
            outcome = Some(edit(&mut videos, index));

            *current = current.next(videos);
            true
        });

        outcome
    }
}

fn next_id(videos: &[Video]) -> VideoId {
    let next = videos
        .iter()
        .filter_map(|video| video.id.sequence())
        .max()
        .map_or(1, |max| max + 1);

    VideoId::new(next.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::Category;

    fn video(id: &str, status: VideoStatus) -> Video {
        Video {
            id: VideoId::from(id),
            title: format!("Video {id}"),
            description: String::new(),
            thumbnail: String::new(),
            video_url: String::new(),
            views: 100,
            comments: 0,
            likes: 0,
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            duration: "10:00".to_string(),
            status,
            host: "CZ".to_string(),
            category: Category::Educational,
            tags: vec![],
            featured: false,
            is_featured_on_home: false,
        }
    }

    fn catalog() -> VideoCatalog {
        VideoCatalog::new(vec![
            video("1", VideoStatus::Published),
            video("2", VideoStatus::Draft),
            video("3", VideoStatus::Scheduled),
        ])
        .unwrap()
    }

    #[test]
    fn update_changes_only_the_patched_field() {
        let catalog = catalog();
        let before = catalog.get_video("1").unwrap();

        assert!(catalog.update_video("1", VideoPatch::title("Renamed")));

        let after = catalog.get_video("1").unwrap();
        assert_eq!(after.title, "Renamed");
        assert_eq!(Video { title: before.title.clone(), ..after }, before);
    }

    #[test]
    fn update_of_missing_video_returns_false() {
        let catalog = catalog();
        assert!(!catalog.update_video("99", VideoPatch::title("Nope")));
        assert!(!catalog.set_featured("99", true));
        assert!(!catalog.set_featured_on_home("99", true));
    }

    #[test]
    fn deleted_video_is_gone() {
        let catalog = catalog();

        assert!(catalog.delete_video("2"));
        assert_eq!(catalog.get_video("2"), None);
        assert_eq!(catalog.snapshot().len(), 2);
    }

    #[test]
    fn deleting_missing_video_keeps_the_same_snapshot() {
        let catalog = catalog();
        let before = catalog.snapshot();

        assert!(!catalog.delete_video("99"));

        let after = catalog.snapshot();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(after.revision(), before.revision());
        assert_eq!(after.len(), 3);
    }

    #[test]
    fn held_snapshot_goes_stale_after_a_mutation() {
        let catalog = catalog();
        let held = catalog.snapshot();

        assert!(catalog.set_featured("1", true));

        let fresh = catalog.snapshot();
        assert!(!Arc::ptr_eq(&held, &fresh));
        assert!(fresh.revision() > held.revision());
        assert!(!held.get("1").unwrap().featured);
        assert!(fresh.get("1").unwrap().featured);
    }

    #[test]
    fn published_filter_never_leaks_other_statuses() {
        let catalog = catalog();
        let published = Some(VideoFilter::Status(VideoStatus::Published));

        let check = |catalog: &VideoCatalog| {
            let videos = catalog.get_videos(published);
            assert!(videos.iter().all(Video::is_published));
            videos.len()
        };

        assert_eq!(check(&catalog), 1);

        let patch = VideoPatch {
            status: Some(VideoStatus::Published),
            ..VideoPatch::default()
        };
        catalog.update_video("3", patch);
        assert_eq!(check(&catalog), 2);

        let patch = VideoPatch {
            status: Some(VideoStatus::Draft),
            ..VideoPatch::default()
        };
        catalog.update_video("1", patch);
        catalog.delete_video("2");
        assert_eq!(check(&catalog), 1);
    }

    #[test]
    fn unfiltered_list_keeps_insertion_order() {
        let ids: Vec<_> = catalog()
            .get_videos(None)
            .into_iter()
            .map(|video| video.id.to_string())
            .collect();

        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn subscribers_see_successful_mutations_only() {
        let catalog = catalog();
        let mut receiver = catalog.subscribe();
        receiver.borrow_and_update();

        assert!(!catalog.delete_video("99"));
        assert!(!receiver.has_changed().unwrap());

        assert!(catalog.set_featured_on_home("2", true));
        assert!(receiver.has_changed().unwrap());
        assert!(receiver.borrow_and_update().get("2").unwrap().is_featured_on_home);
    }

    #[test]
    fn insert_assigns_the_next_numeric_id() {
        let catalog = VideoCatalog::new(vec![
            video("4", VideoStatus::Published),
            video("intro", VideoStatus::Published),
            video("2", VideoStatus::Published),
        ])
        .unwrap();
        let revision = catalog.snapshot().revision();

        let new: NewVideo = serde_json::from_value(serde_json::json!({
            "title": "Wallet Safety",
            "date": "2025-04-01",
        }))
        .unwrap();
        let inserted = catalog.insert_video(new);

        assert_eq!(inserted.id.as_ref(), "5");
        assert_eq!(catalog.get_video("5"), Some(inserted));
        assert_eq!(catalog.snapshot().revision(), revision + 1);
    }

    #[test]
    fn first_insert_into_empty_catalog_gets_id_one() {
        let catalog = VideoCatalog::new(vec![]).unwrap();
        let new: NewVideo = serde_json::from_value(serde_json::json!({
            "title": "Hello",
            "date": "2025-04-01",
        }))
        .unwrap();

        assert_eq!(catalog.insert_video(new).id.as_ref(), "1");
    }

    #[test]
    fn patch_answers_with_the_record_it_wrote() {
        let catalog = catalog();

        std::thread::scope(|scope| {
            for writer in 0..8 {
                let catalog = &catalog;
                scope.spawn(move || {
                    for round in 0..200 {
                        let title = format!("Video {writer}/{round}");
                        let patched = catalog.patch_video("1", VideoPatch::title(title.clone())).unwrap();

                        assert_eq!(patched.id.as_ref(), "1");
                        assert_eq!(patched.title, title);
                    }
                });
            }
        });

        assert_eq!(catalog.snapshot().revision(), 8 * 200);
    }

    #[test]
    fn patching_a_missing_video_publishes_nothing() {
        let catalog = catalog();
        let revision = catalog.snapshot().revision();

        assert_eq!(catalog.patch_video("404", VideoPatch::title("Nope")), None);
        assert_eq!(catalog.snapshot().revision(), revision);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = VideoCatalog::new(vec![
            video("1", VideoStatus::Published),
            video("1", VideoStatus::Draft),
        ]);

        assert!(matches!(result, Err(CatalogError::DuplicateId { .. })));
    }
}
