//! Blocking HTTP client for the music-catalog service.
//!
//! Implements [`MusicService`] against a Spotify-shaped REST API. The
//! bearer token is handed in by the caller; token acquisition and refresh
//! live outside this crate.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::genome::RawFeatureBundle;

use super::{ArtistMetadata, ArtistRef, MusicService, ServiceError, TrackMetadata};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct WebMusicService {
    client: Client,
    base_url: String,
    token: String,
}

impl WebMusicService {
    pub fn new(base_url: &str, token: &str) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: &str,
    ) -> Result<T, ServiceError> {
        let response = self.client.get(url).bearer_auth(&self.token).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        response.json().map_err(|err| ServiceError::Decode {
            endpoint,
            message: err.to_string(),
        })
    }
}

impl MusicService for WebMusicService {
    fn recent_track_ids(&self, limit: usize) -> Result<Vec<String>, ServiceError> {
        let url = format!(
            "{}/v1/me/player/recently-played?limit={}",
            self.base_url, limit
        );
        let body: PlayHistoryResponse = self.get_json("recently-played", &url)?;
        Ok(body
            .items
            .into_iter()
            .filter_map(|item| item.track.and_then(|t| t.id))
            .collect())
    }

    fn top_track_ids(&self, limit: usize) -> Result<Vec<String>, ServiceError> {
        let url = format!("{}/v1/me/top/tracks?limit={}", self.base_url, limit);
        let body: TopTracksResponse = self.get_json("top-tracks", &url)?;
        Ok(body.items.into_iter().filter_map(|item| item.id).collect())
    }

    fn tracks_by_ids(&self, ids: &[String]) -> Result<Vec<TrackMetadata>, ServiceError> {
        let url = format!("{}/v1/tracks?ids={}", self.base_url, ids.join(","));
        let body: TracksResponse = self.get_json("tracks", &url)?;
        Ok(body
            .tracks
            .into_iter()
            .flatten()
            .filter_map(ApiTrack::into_metadata)
            .collect())
    }

    fn artists_by_ids(&self, ids: &[String]) -> Result<Vec<ArtistMetadata>, ServiceError> {
        let url = format!("{}/v1/artists?ids={}", self.base_url, ids.join(","));
        let body: ArtistsResponse = self.get_json("artists", &url)?;
        Ok(body
            .artists
            .into_iter()
            .flatten()
            .filter_map(ApiArtist::into_metadata)
            .collect())
    }

    fn audio_features(
        &self,
        ids: &[String],
    ) -> Result<Vec<Option<RawFeatureBundle>>, ServiceError> {
        let url = format!("{}/v1/audio-features?ids={}", self.base_url, ids.join(","));
        let body: AudioFeaturesResponse = self.get_json("audio-features", &url)?;
        Ok(body.audio_features)
    }

    fn is_in_library(&self, ids: &[String]) -> Result<Vec<bool>, ServiceError> {
        let url = format!("{}/v1/me/tracks/contains?ids={}", self.base_url, ids.join(","));
        self.get_json("library-contains", &url)
    }

    fn recommendations(
        &self,
        seed_artists: &[String],
        seed_tracks: &[String],
        limit: usize,
    ) -> Result<Vec<String>, ServiceError> {
        let url = format!(
            "{}/v1/recommendations?limit={}&seed_artists={}&seed_tracks={}",
            self.base_url,
            limit,
            seed_artists.join(","),
            seed_tracks.join(",")
        );
        let body: TracksResponse = self.get_json("recommendations", &url)?;
        Ok(body
            .tracks
            .into_iter()
            .flatten()
            .filter_map(|t| t.id)
            .collect())
    }
}

// Wire shapes. Fields the engine does not consume are omitted; missing or
// null values degrade to defaults rather than failing the whole batch.

#[derive(Deserialize)]
struct PlayHistoryResponse {
    items: Vec<PlayHistoryItem>,
}

#[derive(Deserialize)]
struct PlayHistoryItem {
    track: Option<ApiTrackId>,
}

#[derive(Deserialize)]
struct TopTracksResponse {
    items: Vec<ApiTrackId>,
}

#[derive(Deserialize)]
struct ApiTrackId {
    id: Option<String>,
}

#[derive(Deserialize)]
struct TracksResponse {
    tracks: Vec<Option<ApiTrack>>,
}

#[derive(Deserialize)]
struct ApiTrack {
    id: Option<String>,
    name: Option<String>,
    duration_ms: Option<u64>,
    explicit: Option<bool>,
    popularity: Option<u8>,
    album: Option<ApiAlbum>,
    artists: Option<Vec<ApiArtistRef>>,
    external_urls: Option<ApiExternalUrls>,
}

#[derive(Deserialize, Default)]
struct ApiAlbum {
    name: Option<String>,
    album_type: Option<String>,
    release_date: Option<String>,
    images: Option<Vec<ApiImage>>,
}

#[derive(Deserialize)]
struct ApiImage {
    url: Option<String>,
}

#[derive(Deserialize)]
struct ApiArtistRef {
    id: Option<String>,
    name: Option<String>,
    external_urls: Option<ApiExternalUrls>,
}

#[derive(Deserialize)]
struct ApiExternalUrls {
    spotify: Option<String>,
}

#[derive(Deserialize)]
struct ArtistsResponse {
    artists: Vec<Option<ApiArtist>>,
}

#[derive(Deserialize)]
struct ApiArtist {
    id: Option<String>,
    name: Option<String>,
    genres: Option<Vec<String>>,
    popularity: Option<u8>,
    external_urls: Option<ApiExternalUrls>,
}

#[derive(Deserialize)]
struct AudioFeaturesResponse {
    audio_features: Vec<Option<RawFeatureBundle>>,
}

impl ApiTrack {
    fn into_metadata(self) -> Option<TrackMetadata> {
        let id = self.id?;
        let name = self.name?;
        let album = self.album.unwrap_or_default();
        let artists = self
            .artists
            .unwrap_or_default()
            .into_iter()
            .filter_map(|artist| {
                Some(ArtistRef {
                    id: artist.id?,
                    name: artist.name?,
                    link: artist
                        .external_urls
                        .and_then(|urls| urls.spotify)
                        .unwrap_or_default(),
                })
            })
            .collect();

        Some(TrackMetadata {
            id,
            name,
            duration_ms: self.duration_ms.unwrap_or_default(),
            explicit: self.explicit.unwrap_or_default(),
            popularity: self.popularity.unwrap_or_default(),
            album_name: album.name.unwrap_or_default(),
            album_type: album.album_type.unwrap_or_default(),
            album_release_date: album.release_date.unwrap_or_default(),
            cover_url: album
                .images
                .unwrap_or_default()
                .into_iter()
                .next()
                .and_then(|image| image.url),
            external_url: self
                .external_urls
                .and_then(|urls| urls.spotify)
                .unwrap_or_default(),
            artists,
        })
    }
}

impl ApiArtist {
    fn into_metadata(self) -> Option<ArtistMetadata> {
        Some(ArtistMetadata {
            id: self.id?,
            name: self.name?,
            genres: self.genres.unwrap_or_default(),
            popularity: self.popularity.unwrap_or_default(),
            external_url: self
                .external_urls
                .and_then(|urls| urls.spotify)
                .unwrap_or_default(),
        })
    }
}
