//! Trackgene Library
//!
//! Computes a categorical "gene" code per track from audio features,
//! aggregates a listener's tracks into gene buckets and seeds
//! similarity-based recommendations from those buckets. The external
//! music-catalog service is consumed through the batch-only
//! [`service::MusicService`] trait.

pub mod catalog;
pub mod config;
pub mod genome;
pub mod recommend;
pub mod service;

// Re-export commonly used types for convenience
pub use catalog::{BuildError, Catalog, CatalogBuilder, CatalogSource, Track};
pub use genome::{
    exemplars, gene_distribution, overall_gene, AudioFeatures, GeneBucket, GeneCode, GeneTrait,
    RawFeatureBundle, Taxonomy, TraitExemplars,
};
pub use recommend::{RecommendError, Recommender, RngSampler, SeedError, SeedSampler};
pub use service::{MusicService, ServiceError, WebMusicService};
