//! Catalog models.
//!
//! A [`Catalog`] is an ordered, deduplicated set of [`Track`] records for
//! one listener, one source window and one build. It is rebuilt wholesale
//! on refresh and never mutated after construction.

use serde::{Deserialize, Serialize};

use crate::genome::{AudioFeatures, GeneCode};

/// Which retrieval window a catalog was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogSource {
    Recent,
    Top,
    Recommended,
}

impl CatalogSource {
    /// Convert from API string representation.
    pub fn from_api_str(s: &str) -> Option<Self> {
        match s {
            "recent" => Some(CatalogSource::Recent),
            "top" => Some(CatalogSource::Top),
            "recommended" => Some(CatalogSource::Recommended),
            _ => None,
        }
    }

    /// Convert to API string representation.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            CatalogSource::Recent => "recent",
            CatalogSource::Top => "top",
            CatalogSource::Recommended => "recommended",
        }
    }
}

/// Album type classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlbumKind {
    Album,
    Single,
    Compilation,
    Unknown,
}

impl AlbumKind {
    /// Convert from API string representation.
    pub fn from_api_str(s: &str) -> Self {
        match s {
            "album" => AlbumKind::Album,
            "single" => AlbumKind::Single,
            "compilation" => AlbumKind::Compilation,
            _ => AlbumKind::Unknown,
        }
    }

    /// Convert to API string representation.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            AlbumKind::Album => "album",
            AlbumKind::Single => "single",
            AlbumKind::Compilation => "compilation",
            AlbumKind::Unknown => "unknown",
        }
    }
}

/// One credited artist on a track, for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistCredit {
    pub name: String,
    pub link: String,
}

/// A fully assembled track record: service metadata joined with the
/// validated audio features and the computed gene code.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub duration_ms: u64,
    pub explicit: bool,
    pub popularity: u8,
    pub album_name: String,
    pub album_kind: AlbumKind,
    pub album_release_date: String,
    /// Primary artist (first credit on the track).
    pub artist_id: String,
    pub artist_name: String,
    pub artist_genres: Vec<String>,
    pub artist_popularity: u8,
    /// All credited artists in credit order.
    pub artists: Vec<ArtistCredit>,
    pub cover_url: Option<String>,
    pub external_url: String,
    pub in_library: bool,
    pub features: AudioFeatures,
    pub gene: GeneCode,
}

/// An ordered track set scoped to one listener, source and build.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Catalog {
    pub source: CatalogSource,
    pub tracks: Vec<Track>,
}

impl Catalog {
    pub fn new(source: CatalogSource, tracks: Vec<Track>) -> Self {
        Self { source, tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Tracks carrying the given gene code, in catalog order.
    pub fn tracks_by_gene(&self, code: &GeneCode) -> Vec<&Track> {
        self.tracks.iter().filter(|t| &t.gene == code).collect()
    }
}
