//! The gene taxonomy engine: feature validation, classification and
//! distributional summaries.

mod aggregate;
mod classifier;
mod features;

pub use aggregate::{
    exemplars, gene_distribution, overall_gene, GeneBucket, GeneTrait, TraitExemplars,
};
pub use classifier::{GeneCode, Taxonomy};
pub use features::{AudioFeatures, FeatureError, RawFeatureBundle};
