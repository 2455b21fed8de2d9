use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Numeric value of ids assigned by the catalog, `None` for free-form ids.
    pub fn sequence(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VideoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl PartialEq<str> for VideoId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    Published,
    Scheduled,
    Draft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Educational,
    MarketAnalysis,
    Regulatory,
    Technology,
    Interview,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Educational => "Educational",
            Category::MarketAnalysis => "Market Analysis",
            Category::Regulatory => "Regulatory",
            Category::Technology => "Technology",
            Category::Interview => "Interviews",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: VideoId,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub video_url: String,
    pub views: u64,
    pub comments: u64,
    pub likes: u64,
    pub date: NaiveDate,
    pub duration: String,
    pub status: VideoStatus,
    pub host: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub featured: bool,
    pub is_featured_on_home: bool,
}

impl Video {
    pub fn is_published(&self) -> bool {
        self.status == VideoStatus::Published
    }
}

/// Splits an edit-form tag string on commas, trimming each tag and dropping empty ones.
pub fn split_tags(text: &str) -> Vec<String> {
    normalize_tags(text.split(','))
}

fn normalize_tags<'a>(tags: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    tags.into_iter()
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tags as submitted by a client, either a list or the comma separated form field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Text(String),
}

impl TagsInput {
    pub fn into_tags(self) -> Vec<String> {
        match self {
            TagsInput::List(list) => normalize_tags(list.iter().map(String::as_str)),
            TagsInput::Text(text) => split_tags(&text),
        }
    }
}

/// A shallow update: only the fields that are present replace the stored ones.
/// The id cannot be patched and unknown fields are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VideoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub video_url: Option<String>,
    pub views: Option<u64>,
    pub comments: Option<u64>,
    pub likes: Option<u64>,
    pub date: Option<NaiveDate>,
    pub duration: Option<String>,
    pub status: Option<VideoStatus>,
    pub host: Option<String>,
    pub category: Option<Category>,
    pub tags: Option<TagsInput>,
    pub featured: Option<bool>,
    pub is_featured_on_home: Option<bool>,
}

impl VideoPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn featured(featured: bool) -> Self {
        Self {
            featured: Some(featured),
            ..Self::default()
        }
    }

    pub fn featured_on_home(featured: bool) -> Self {
        Self {
            is_featured_on_home: Some(featured),
            ..Self::default()
        }
    }

    pub fn apply(self, video: &mut Video) {
        let VideoPatch {
            title,
            description,
            thumbnail,
            video_url,
            views,
            comments,
            likes,
            date,
            duration,
            status,
            host,
            category,
            tags,
            featured,
            is_featured_on_home,
        } = self;

        merge!(
            video;
            title,
            description,
            thumbnail,
            video_url,
            views,
            comments,
            likes,
            date,
            duration,
            status,
            host,
            category,
            featured,
            is_featured_on_home,
        );

        if let Some(tags) = tags {
            video.tags = tags.into_tags();
        }
    }
}

fn default_thumbnail() -> String {
    "/placeholder.svg?height=720&width=1280".to_string()
}

fn default_host() -> String {
    "CZ".to_string()
}

fn default_status() -> VideoStatus {
    VideoStatus::Published
}

fn default_category() -> Category {
    Category::Educational
}

/// Payload of the admin upload form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewVideo {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_thumbnail")]
    pub thumbnail: String,
    #[serde(default)]
    pub video_url: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub duration: String,
    #[serde(default = "default_status")]
    pub status: VideoStatus,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_category")]
    pub category: Category,
    #[serde(default)]
    pub tags: Option<TagsInput>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub is_featured_on_home: bool,
}

impl NewVideo {
    pub fn into_video(self, id: VideoId) -> Video {
        Video {
            id,
            title: self.title,
            description: self.description,
            thumbnail: self.thumbnail,
            video_url: self.video_url,
            views: 0,
            comments: 0,
            likes: 0,
            date: self.date,
            duration: self.duration,
            status: self.status,
            host: self.host,
            category: self.category,
            tags: self.tags.map(TagsInput::into_tags).unwrap_or_default(),
            featured: self.featured,
            is_featured_on_home: self.is_featured_on_home,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Video {
        Video {
            id: VideoId::from("7"),
            title: "Stablecoins 101".to_string(),
            description: "What keeps a peg".to_string(),
            thumbnail: default_thumbnail(),
            video_url: "/videos/stablecoins.mp4".to_string(),
            views: 10,
            comments: 2,
            likes: 3,
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            duration: "12:00".to_string(),
            status: VideoStatus::Draft,
            host: "Yi He".to_string(),
            category: Category::Educational,
            tags: vec!["Stablecoins".to_string()],
            featured: false,
            is_featured_on_home: false,
        }
    }

    #[test]
    fn split_tags_trims_and_drops_empty_entries() {
        assert_eq!(
            split_tags(" Blockchain, Crypto ,, Education ,"),
            vec!["Blockchain", "Crypto", "Education"]
        );
        assert!(split_tags("  ,  ").is_empty());
    }

    #[test]
    fn video_uses_camel_case_wire_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["videoUrl"], "/videos/stablecoins.mp4");
        assert_eq!(value["isFeaturedOnHome"], false);
        assert_eq!(value["status"], "draft");
        assert_eq!(value["category"], "educational");
        assert_eq!(value["date"], "2025-03-01");
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut video = sample();
        let patch: VideoPatch = serde_json::from_value(json!({
            "title": "Stablecoins 102",
            "status": "published",
            "tags": "Stablecoins, Pegs",
        }))
        .unwrap();

        patch.apply(&mut video);

        let mut expected = sample();
        expected.title = "Stablecoins 102".to_string();
        expected.status = VideoStatus::Published;
        expected.tags = vec!["Stablecoins".to_string(), "Pegs".to_string()];
        assert_eq!(video, expected);
    }

    #[test]
    fn patch_rejects_unknown_fields_and_id() {
        assert!(serde_json::from_value::<VideoPatch>(json!({ "titel": "x" })).is_err());
        assert!(serde_json::from_value::<VideoPatch>(json!({ "id": "9" })).is_err());
    }

    #[test]
    fn category_wire_names_are_kebab_case() {
        let category: Category = serde_json::from_value(json!("market-analysis")).unwrap();
        assert_eq!(category, Category::MarketAnalysis);
        assert!(serde_json::from_value::<Category>(json!("memes")).is_err());
    }

    #[test]
    fn new_video_starts_with_zero_counters() {
        let new: NewVideo = serde_json::from_value(json!({
            "title": "Layer 2s",
            "date": "2025-04-02",
            "tags": ["Scaling", " Rollups "],
        }))
        .unwrap();

        let video = new.into_video(VideoId::from("3"));
        assert_eq!(video.views, 0);
        assert_eq!(video.host, "CZ");
        assert_eq!(video.category, Category::Educational);
        assert_eq!(video.status, VideoStatus::Published);
        assert_eq!(video.tags, vec!["Scaling", "Rollups"]);
    }
}
