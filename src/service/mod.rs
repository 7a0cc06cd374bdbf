//! External music-catalog service contract.
//!
//! The engine never talks to the outside world except through
//! [`MusicService`]. Every method is a batch call: one blocking round-trip
//! resolves a whole id list, which is the dominant performance lever of a
//! catalog build. There are deliberately no single-item lookups.

mod web;

pub use web::WebMusicService;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::genome::RawFeatureBundle;

/// Errors from the external catalog service. Propagated to the caller
/// verbatim — the engine never retries or masks them.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request to catalog service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog service returned status {status} for {endpoint}")]
    Status { endpoint: &'static str, status: u16 },

    #[error("failed to decode {endpoint} response: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },
}

/// Track metadata as returned by the catalog service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub id: String,
    pub name: String,
    pub duration_ms: u64,
    pub explicit: bool,
    pub popularity: u8,
    pub album_name: String,
    pub album_type: String,
    pub album_release_date: String,
    pub cover_url: Option<String>,
    pub external_url: String,
    /// Credited artists in credit order; the first is the primary artist.
    pub artists: Vec<ArtistRef>,
}

/// An artist as credited on a track.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
    pub link: String,
}

/// Full artist metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArtistMetadata {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    pub popularity: u8,
    pub external_url: String,
}

/// Blocking batch contract with the external music-catalog service.
///
/// Result alignment: `audio_features` and `is_in_library` return one entry
/// per requested id, in request order. `tracks_by_ids` may return fewer
/// rows than requested (deleted or region-blocked tracks); `artists_by_ids`
/// must cover every requested id or the consuming build fails.
pub trait MusicService: Send + Sync {
    /// Ids of the listener's most recently played tracks, newest first.
    fn recent_track_ids(&self, limit: usize) -> Result<Vec<String>, ServiceError>;

    /// Ids of the listener's top tracks for the service's default window.
    fn top_track_ids(&self, limit: usize) -> Result<Vec<String>, ServiceError>;

    /// Resolve track metadata for a batch of ids.
    fn tracks_by_ids(&self, ids: &[String]) -> Result<Vec<TrackMetadata>, ServiceError>;

    /// Resolve artist metadata for a batch of ids.
    fn artists_by_ids(&self, ids: &[String]) -> Result<Vec<ArtistMetadata>, ServiceError>;

    /// Per-track audio features; `None` where the upstream analysis is
    /// unavailable for a track.
    fn audio_features(&self, ids: &[String])
        -> Result<Vec<Option<RawFeatureBundle>>, ServiceError>;

    /// Library-membership flags for a batch of track ids.
    fn is_in_library(&self, ids: &[String]) -> Result<Vec<bool>, ServiceError>;

    /// Query the similarity recommender with artist and track seeds.
    fn recommendations(
        &self,
        seed_artists: &[String],
        seed_tracks: &[String],
        limit: usize,
    ) -> Result<Vec<String>, ServiceError>;
}
