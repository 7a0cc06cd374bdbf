//! Catalog construction.
//!
//! Joins raw track metadata, artist metadata, audio features and
//! library-membership flags into [`Track`] records, one batched service
//! round-trip per concern, then classifies every record.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::genome::{AudioFeatures, Taxonomy};
use crate::service::{ArtistMetadata, MusicService, ServiceError, TrackMetadata};

use super::models::{AlbumKind, ArtistCredit, Catalog, CatalogSource, Track};

/// Errors raised while building a catalog.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The artist-info set is missing an artist referenced by a track.
    /// This is a service-contract violation, fatal to the build.
    #[error("artist '{0}' referenced by a track is missing from the service response")]
    IncompleteArtistData(String),

    /// A positionally-aligned batch came back with the wrong length.
    #[error("catalog service returned {got} {what} entries for {expected} requested ids")]
    MismatchedBatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Builds catalogs against a [`MusicService`].
pub struct CatalogBuilder<'a> {
    service: &'a dyn MusicService,
    taxonomy: Taxonomy,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(service: &'a dyn MusicService, taxonomy: Taxonomy) -> Self {
        Self { service, taxonomy }
    }

    /// Build a catalog from one of the listener's retrieval windows.
    ///
    /// `Recommended` is a label for catalogs produced by the seeder, which
    /// supplies explicit ids via [`CatalogBuilder::build`]; requesting it
    /// here yields an empty catalog.
    pub fn build_catalog(
        &self,
        source: CatalogSource,
        limit: usize,
    ) -> Result<Catalog, BuildError> {
        let ids = match source {
            CatalogSource::Recent => self.service.recent_track_ids(limit)?,
            CatalogSource::Top => self.service.top_track_ids(limit)?,
            CatalogSource::Recommended => Vec::new(),
        };
        self.build(source, &ids)
    }

    /// Build a catalog from an explicit id list.
    ///
    /// Tracks the service cannot resolve are silently omitted. A track
    /// with missing or incomplete per-track feature data is dropped and
    /// the build continues; a missing referenced artist aborts the build.
    pub fn build(&self, source: CatalogSource, ids: &[String]) -> Result<Catalog, BuildError> {
        if ids.is_empty() {
            return Ok(Catalog::new(source, Vec::new()));
        }

        let resolved = self.service.tracks_by_ids(ids)?;
        if resolved.len() < ids.len() {
            debug!(
                requested = ids.len(),
                resolved = resolved.len(),
                "service resolved fewer tracks than requested"
            );
        }

        // First occurrence wins on duplicate ids.
        let mut seen = HashSet::new();
        let metadata: Vec<_> = resolved
            .into_iter()
            .filter(|track| seen.insert(track.id.clone()))
            .collect();

        let artist_info = self.resolve_artists(&metadata)?;

        let track_ids: Vec<String> = metadata.iter().map(|t| t.id.clone()).collect();

        let features = self.service.audio_features(&track_ids)?;
        if features.len() != track_ids.len() {
            return Err(BuildError::MismatchedBatch {
                what: "audio-feature",
                expected: track_ids.len(),
                got: features.len(),
            });
        }

        let membership = self.service.is_in_library(&track_ids)?;
        if membership.len() != track_ids.len() {
            return Err(BuildError::MismatchedBatch {
                what: "library-membership",
                expected: track_ids.len(),
                got: membership.len(),
            });
        }

        let mut tracks = Vec::with_capacity(metadata.len());
        for ((meta, raw), in_library) in metadata.into_iter().zip(features).zip(membership) {
            let Some(raw) = raw else {
                warn!(track = %meta.id, "no audio features available, dropping track");
                continue;
            };
            let features = match AudioFeatures::from_raw(&raw) {
                Ok(features) => features,
                Err(err) => {
                    warn!(track = %meta.id, error = %err, "unclassifiable track dropped");
                    continue;
                }
            };
            let Some(primary) = meta.artists.first() else {
                warn!(track = %meta.id, "track has no artist credits, dropping track");
                continue;
            };
            // resolve_artists guarantees every referenced id is present.
            let primary_info = &artist_info[&primary.id];

            let gene = self.taxonomy.classify(&features);
            tracks.push(Track {
                id: meta.id,
                name: meta.name,
                duration_ms: meta.duration_ms,
                explicit: meta.explicit,
                popularity: meta.popularity,
                album_name: meta.album_name,
                album_kind: AlbumKind::from_api_str(&meta.album_type),
                album_release_date: meta.album_release_date,
                artist_id: primary.id.clone(),
                artist_name: primary.name.clone(),
                artist_genres: primary_info.genres.clone(),
                artist_popularity: primary_info.popularity,
                artists: meta
                    .artists
                    .iter()
                    .map(|a| ArtistCredit {
                        name: a.name.clone(),
                        link: a.link.clone(),
                    })
                    .collect(),
                cover_url: meta.cover_url,
                external_url: meta.external_url,
                in_library,
                features,
                gene,
            });
        }

        info!(
            source = source.as_api_str(),
            tracks = tracks.len(),
            "catalog built"
        );
        Ok(Catalog::new(source, tracks))
    }

    /// Resolve every distinct artist referenced by the track set in one
    /// batched call and index the result by id.
    fn resolve_artists(
        &self,
        metadata: &[TrackMetadata],
    ) -> Result<HashMap<String, ArtistMetadata>, BuildError> {
        let mut artist_ids = Vec::new();
        let mut distinct = HashSet::new();
        for track in metadata {
            for artist in &track.artists {
                if distinct.insert(artist.id.clone()) {
                    artist_ids.push(artist.id.clone());
                }
            }
        }
        if artist_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let resolved = self.service.artists_by_ids(&artist_ids)?;
        let info: HashMap<String, ArtistMetadata> = resolved
            .into_iter()
            .map(|artist| (artist.id.clone(), artist))
            .collect();

        for id in &artist_ids {
            if !info.contains_key(id) {
                return Err(BuildError::IncompleteArtistData(id.clone()));
            }
        }
        Ok(info)
    }
}
