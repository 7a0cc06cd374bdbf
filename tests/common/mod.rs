//! Common test infrastructure
//!
//! A deterministic in-memory `MusicService` plus the fixture catalog used
//! across the integration suites. Tests should only import from this
//! module, not build their own service state.

// Not every suite uses every fixture.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use trackgene::recommend::SeedSampler;
use trackgene::service::{ArtistMetadata, ArtistRef, MusicService, ServiceError, TrackMetadata};
use trackgene::RawFeatureBundle;

// Fixture ids. The standard catalog is five tracks: three classify to
// HPFE and two to LNSA under the classic taxonomy.
pub const TRACK_1_ID: &str = "track-night-drive";
pub const TRACK_2_ID: &str = "track-circuit-breaker";
pub const TRACK_3_ID: &str = "track-driftwood";
pub const TRACK_4_ID: &str = "track-solar-flare";
pub const TRACK_5_ID: &str = "track-undertow";
pub const TRACK_6_ID: &str = "track-afterglow";
pub const TRACK_7_ID: &str = "track-static-bloom";

pub const ARTIST_1_ID: &str = "artist-velvet-circuit";
pub const ARTIST_2_ID: &str = "artist-low-tide";
pub const ARTIST_3_ID: &str = "artist-iron-choir";
pub const ARTIST_4_ID: &str = "artist-glass-meridian";

/// Arguments of one `recommendations` call, recorded for assertions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecommendationCall {
    pub seed_artists: Vec<String>,
    pub seed_tracks: Vec<String>,
    pub limit: usize,
}

/// In-memory `MusicService` with deterministic responses.
pub struct FakeMusicService {
    tracks: HashMap<String, TrackMetadata>,
    artists: HashMap<String, ArtistMetadata>,
    features: HashMap<String, RawFeatureBundle>,
    library: HashSet<String>,
    recent: Vec<String>,
    top: Vec<String>,
    recommended: Vec<String>,
    failing: bool,
    pub recommendation_calls: Mutex<Vec<RecommendationCall>>,
    pub artist_calls: Mutex<Vec<Vec<String>>>,
}

pub fn energetic_features() -> RawFeatureBundle {
    RawFeatureBundle {
        energy: Some(0.8),
        valence: Some(0.6),
        mode: Some(1.0),
        tempo: Some(120.0),
        acousticness: Some(0.2),
        danceability: Some(0.7),
        speechiness: Some(0.05),
        instrumentalness: Some(0.0),
        time_signature: Some(4.0),
    }
}

pub fn mellow_features() -> RawFeatureBundle {
    RawFeatureBundle {
        energy: Some(0.2),
        valence: Some(0.3),
        mode: Some(0.0),
        tempo: Some(80.0),
        acousticness: Some(0.9),
        danceability: Some(0.4),
        speechiness: Some(0.03),
        instrumentalness: Some(0.6),
        time_signature: Some(4.0),
    }
}

pub fn fixture_track(id: &str, name: &str, artist_id: &str, artist_name: &str) -> TrackMetadata {
    TrackMetadata {
        id: id.to_string(),
        name: name.to_string(),
        duration_ms: 214_000,
        explicit: false,
        popularity: 55,
        album_name: format!("{name} EP"),
        album_type: "album".to_string(),
        album_release_date: "2022-09-16".to_string(),
        cover_url: Some(format!("https://img.example/{id}.jpg")),
        external_url: format!("https://open.example/track/{id}"),
        artists: vec![ArtistRef {
            id: artist_id.to_string(),
            name: artist_name.to_string(),
            link: format!("https://open.example/artist/{artist_id}"),
        }],
    }
}

fn fixture_artist(id: &str, name: &str, genres: &[&str]) -> ArtistMetadata {
    ArtistMetadata {
        id: id.to_string(),
        name: name.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        popularity: 61,
        external_url: format!("https://open.example/artist/{id}"),
    }
}

impl FakeMusicService {
    /// The standard fixture catalog: five listener tracks, two tracks
    /// reserved as recommendation results, `TRACK_1_ID` in the library.
    pub fn with_fixtures() -> Self {
        let mut service = Self {
            tracks: HashMap::new(),
            artists: HashMap::new(),
            features: HashMap::new(),
            library: HashSet::new(),
            recent: vec![
                TRACK_1_ID.to_string(),
                TRACK_2_ID.to_string(),
                TRACK_3_ID.to_string(),
                TRACK_4_ID.to_string(),
                TRACK_5_ID.to_string(),
            ],
            top: vec![
                TRACK_4_ID.to_string(),
                TRACK_1_ID.to_string(),
                TRACK_5_ID.to_string(),
            ],
            recommended: vec![TRACK_6_ID.to_string(), TRACK_7_ID.to_string()],
            failing: false,
            recommendation_calls: Mutex::new(Vec::new()),
            artist_calls: Mutex::new(Vec::new()),
        };

        service.insert_track(
            fixture_track(TRACK_1_ID, "Night Drive", ARTIST_1_ID, "Velvet Circuit"),
            energetic_features(),
        );
        service.insert_track(
            fixture_track(TRACK_2_ID, "Circuit Breaker", ARTIST_1_ID, "Velvet Circuit"),
            energetic_features(),
        );
        service.insert_track(
            fixture_track(TRACK_3_ID, "Driftwood", ARTIST_2_ID, "Low Tide"),
            mellow_features(),
        );
        service.insert_track(
            fixture_track(TRACK_4_ID, "Solar Flare", ARTIST_3_ID, "Iron Choir"),
            energetic_features(),
        );
        service.insert_track(
            fixture_track(TRACK_5_ID, "Undertow", ARTIST_2_ID, "Low Tide"),
            mellow_features(),
        );
        service.insert_track(
            fixture_track(TRACK_6_ID, "Afterglow", ARTIST_4_ID, "Glass Meridian"),
            energetic_features(),
        );
        service.insert_track(
            fixture_track(TRACK_7_ID, "Static Bloom", ARTIST_1_ID, "Velvet Circuit"),
            mellow_features(),
        );

        service.artists.insert(
            ARTIST_1_ID.to_string(),
            fixture_artist(ARTIST_1_ID, "Velvet Circuit", &["synthwave", "electropop"]),
        );
        service.artists.insert(
            ARTIST_2_ID.to_string(),
            fixture_artist(ARTIST_2_ID, "Low Tide", &["ambient", "slowcore"]),
        );
        service.artists.insert(
            ARTIST_3_ID.to_string(),
            fixture_artist(ARTIST_3_ID, "Iron Choir", &["industrial"]),
        );
        service.artists.insert(
            ARTIST_4_ID.to_string(),
            fixture_artist(ARTIST_4_ID, "Glass Meridian", &["darkwave"]),
        );

        service.library.insert(TRACK_1_ID.to_string());
        service
    }

    pub fn insert_track(&mut self, track: TrackMetadata, features: RawFeatureBundle) {
        self.features.insert(track.id.clone(), features);
        self.tracks.insert(track.id.clone(), track);
    }

    pub fn remove_artist(&mut self, id: &str) {
        self.artists.remove(id);
    }

    pub fn clear_features(&mut self, id: &str) {
        self.features.remove(id);
    }

    pub fn set_features(&mut self, id: &str, features: RawFeatureBundle) {
        self.features.insert(id.to_string(), features);
    }

    pub fn set_recommended(&mut self, ids: &[&str]) {
        self.recommended = ids.iter().map(|id| id.to_string()).collect();
    }

    /// Make every subsequent call fail with a status error.
    pub fn fail_requests(&mut self) {
        self.failing = true;
    }

    fn check_available(&self) -> Result<(), ServiceError> {
        if self.failing {
            return Err(ServiceError::Status {
                endpoint: "fake",
                status: 500,
            });
        }
        Ok(())
    }
}

impl MusicService for FakeMusicService {
    fn recent_track_ids(&self, limit: usize) -> Result<Vec<String>, ServiceError> {
        self.check_available()?;
        Ok(self.recent.iter().take(limit).cloned().collect())
    }

    fn top_track_ids(&self, limit: usize) -> Result<Vec<String>, ServiceError> {
        self.check_available()?;
        Ok(self.top.iter().take(limit).cloned().collect())
    }

    fn tracks_by_ids(&self, ids: &[String]) -> Result<Vec<TrackMetadata>, ServiceError> {
        self.check_available()?;
        Ok(ids
            .iter()
            .filter_map(|id| self.tracks.get(id).cloned())
            .collect())
    }

    fn artists_by_ids(&self, ids: &[String]) -> Result<Vec<ArtistMetadata>, ServiceError> {
        self.check_available()?;
        self.artist_calls.lock().unwrap().push(ids.to_vec());
        Ok(ids
            .iter()
            .filter_map(|id| self.artists.get(id).cloned())
            .collect())
    }

    fn audio_features(
        &self,
        ids: &[String],
    ) -> Result<Vec<Option<RawFeatureBundle>>, ServiceError> {
        self.check_available()?;
        Ok(ids.iter().map(|id| self.features.get(id).cloned()).collect())
    }

    fn is_in_library(&self, ids: &[String]) -> Result<Vec<bool>, ServiceError> {
        self.check_available()?;
        Ok(ids.iter().map(|id| self.library.contains(id)).collect())
    }

    fn recommendations(
        &self,
        seed_artists: &[String],
        seed_tracks: &[String],
        limit: usize,
    ) -> Result<Vec<String>, ServiceError> {
        self.check_available()?;
        self.recommendation_calls
            .lock()
            .unwrap()
            .push(RecommendationCall {
                seed_artists: seed_artists.to_vec(),
                seed_tracks: seed_tracks.to_vec(),
                limit,
            });
        Ok(self.recommended.iter().take(limit).cloned().collect())
    }
}

/// Sampler that always draws the first `k` indices, so sampled seeds are
/// exact and assertable.
pub struct FirstKSampler;

impl SeedSampler for FirstKSampler {
    fn draw(&mut self, n: usize, k: usize) -> Vec<usize> {
        (0..k.min(n)).collect()
    }
}
