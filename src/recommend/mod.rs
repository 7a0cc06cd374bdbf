//! Similarity-recommendation seeding.
//!
//! Takes one gene bucket of a built catalog, samples a small artist/track
//! seed from it, queries the external similarity recommender and rebuilds
//! the returned ids into a full catalog.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::{BuildError, Catalog, CatalogBuilder, CatalogSource, Track};
use crate::genome::{GeneCode, Taxonomy};
use crate::service::{MusicService, ServiceError};

/// Seed-size bounds, per the external recommender's contract.
pub const MAX_SEED_ARTISTS: usize = 2;
pub const MAX_SEED_TRACKS: usize = 2;
pub const MAX_SEED_GENRES: usize = 1;

/// A caller-provided gene code that cannot seed a recommendation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeedError {
    #[error("a seed gene code must be provided")]
    Empty,

    #[error("'{code}' is not a valid {taxonomy} gene code")]
    Unrecognized { code: String, taxonomy: &'static str },
}

/// Errors raised while seeding recommendations.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Uniform draw-without-replacement over row indices.
///
/// Object-safe so tests can inject a deterministic implementation and
/// assert exact sampled sets.
pub trait SeedSampler {
    /// Draw `min(k, n)` distinct indices in `0..n`.
    fn draw(&mut self, n: usize, k: usize) -> Vec<usize>;
}

/// Default sampler backed by the process RNG.
pub struct RngSampler;

impl SeedSampler for RngSampler {
    fn draw(&mut self, n: usize, k: usize) -> Vec<usize> {
        let mut rng = rand::rng();
        rand::seq::index::sample(&mut rng, n, k.min(n)).into_vec()
    }
}

/// The transient seed drawn from one gene bucket. Consumed by a single
/// recommender query and discarded.
#[derive(Clone, Debug, Serialize)]
pub struct RecommendationSeed {
    pub gene: GeneCode,
    pub artist_ids: Vec<String>,
    pub track_ids: Vec<String>,
    /// Supplementary tag drawn from the seed artists' genre lists. Kept as
    /// seed metadata; the external call takes artist and track seeds only.
    pub genre: Option<String>,
}

/// Seeds similarity recommendations from gene buckets.
pub struct Recommender<'a> {
    service: &'a dyn MusicService,
    taxonomy: Taxonomy,
    sampler: Box<dyn SeedSampler + 'a>,
}

impl<'a> Recommender<'a> {
    pub fn new(
        service: &'a dyn MusicService,
        taxonomy: Taxonomy,
        sampler: Box<dyn SeedSampler + 'a>,
    ) -> Self {
        Self {
            service,
            taxonomy,
            sampler,
        }
    }

    /// Recommend up to `limit` tracks similar to the catalog's `code`
    /// bucket.
    ///
    /// An empty or malformed code is a [`SeedError`]; a well-formed code
    /// with no matching tracks yields an empty catalog.
    pub fn recommend(
        &mut self,
        catalog: &Catalog,
        code: &str,
        limit: usize,
    ) -> Result<Catalog, RecommendError> {
        let code = self.parse_code(code)?;

        let bucket = catalog.tracks_by_gene(&code);
        if bucket.is_empty() {
            debug!(gene = %code, "no tracks carry the seed gene");
            return Ok(Catalog::new(CatalogSource::Recommended, Vec::new()));
        }

        let seed = self.sample_seed(code, &bucket)?;
        info!(
            gene = %seed.gene,
            seed_artists = ?seed.artist_ids,
            seed_tracks = ?seed.track_ids,
            "querying similarity recommender"
        );

        let ids = self
            .service
            .recommendations(&seed.artist_ids, &seed.track_ids, limit)?;

        let builder = CatalogBuilder::new(self.service, self.taxonomy);
        Ok(builder.build(CatalogSource::Recommended, &ids)?)
    }

    fn parse_code(&self, code: &str) -> Result<GeneCode, SeedError> {
        if code.is_empty() {
            return Err(SeedError::Empty);
        }
        self.taxonomy
            .parse_code(code)
            .ok_or_else(|| SeedError::Unrecognized {
                code: code.to_string(),
                taxonomy: self.taxonomy.as_config_str(),
            })
    }

    fn sample_seed(
        &mut self,
        gene: GeneCode,
        bucket: &[&Track],
    ) -> Result<RecommendationSeed, ServiceError> {
        let artist_ids: Vec<String> = self
            .sampler
            .draw(bucket.len(), MAX_SEED_ARTISTS)
            .into_iter()
            .map(|row| bucket[row].artist_id.clone())
            .collect();
        let track_ids: Vec<String> = self
            .sampler
            .draw(bucket.len(), MAX_SEED_TRACKS)
            .into_iter()
            .map(|row| bucket[row].id.clone())
            .collect();
        let genre = self.sample_genre(&artist_ids)?;

        Ok(RecommendationSeed {
            gene,
            artist_ids,
            track_ids,
            genre,
        })
    }

    /// Draw one tag from the union of the seed artists' genre lists.
    fn sample_genre(&mut self, artist_ids: &[String]) -> Result<Option<String>, ServiceError> {
        if artist_ids.is_empty() {
            return Ok(None);
        }
        let artists = self.service.artists_by_ids(artist_ids)?;

        let mut pool: Vec<String> = Vec::new();
        for artist in artists {
            for genre in artist.genres {
                if !pool.contains(&genre) {
                    pool.push(genre);
                }
            }
        }
        if pool.is_empty() {
            return Ok(None);
        }

        let drawn = self.sampler.draw(pool.len(), MAX_SEED_GENRES);
        Ok(drawn.first().map(|&row| pool[row].clone()))
    }
}
