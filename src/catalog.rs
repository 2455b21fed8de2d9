use snafu::{Location, ResultExt as _, Snafu};

use crate::model::{Video, VideoId};

pub mod store;
pub mod views;

pub use store::{CatalogSnapshot, VideoCatalog, VideoFilter};

const SEED: &str = include_str!("../data/videos.json");

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CatalogError {
    #[snafu(display("video id `{id}` appears more than once in the catalog"))]
    DuplicateId {
        id: VideoId,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to parse the seed catalog at {location}: {source}"))]
    ParseSeed {
        source: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

/// Videos the site starts with on every boot.
pub fn seed_videos() -> Result<Vec<Video>, CatalogError> {
    serde_json::from_str(SEED).context(ParseSeedSnafu)
}
