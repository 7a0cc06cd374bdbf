//! Distributional summaries over a built catalog.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::{Catalog, Track};

use super::classifier::{GeneCode, Taxonomy};
use super::features::AudioFeatures;

/// One gene bucket of a catalog's distribution.
#[derive(Clone, Debug, Serialize)]
pub struct GeneBucket {
    pub code: GeneCode,
    pub count: usize,
    pub percentage: f64,
}

/// Count tracks per gene code and express each bucket as a percentage of
/// the catalog. Buckets are ordered by count descending, then by code, so
/// the output is deterministic. Percentages sum to 100 over a non-empty
/// catalog (within floating rounding).
pub fn gene_distribution(catalog: &Catalog) -> Vec<GeneBucket> {
    let mut counts: BTreeMap<&GeneCode, usize> = BTreeMap::new();
    for track in &catalog.tracks {
        *counts.entry(&track.gene).or_default() += 1;
    }

    let total = catalog.len() as f64;
    let mut buckets: Vec<GeneBucket> = counts
        .into_iter()
        .map(|(code, count)| GeneBucket {
            code: code.clone(),
            count,
            percentage: count as f64 / total * 100.0,
        })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.code.cmp(&b.code)));
    buckets
}

/// A trait axis tracks can be ranked by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GeneTrait {
    Energy,
    Mood,
    Tempo,
    Instrumentation,
}

impl GeneTrait {
    pub const ALL: [GeneTrait; 4] = [
        GeneTrait::Energy,
        GeneTrait::Mood,
        GeneTrait::Tempo,
        GeneTrait::Instrumentation,
    ];

    /// Convert from API string representation.
    pub fn from_api_str(s: &str) -> Option<Self> {
        match s {
            "energy" => Some(GeneTrait::Energy),
            "mood" => Some(GeneTrait::Mood),
            "tempo" => Some(GeneTrait::Tempo),
            "instrumentation" => Some(GeneTrait::Instrumentation),
            _ => None,
        }
    }

    /// Convert to API string representation.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            GeneTrait::Energy => "energy",
            GeneTrait::Mood => "mood",
            GeneTrait::Tempo => "tempo",
            GeneTrait::Instrumentation => "instrumentation",
        }
    }

    /// The feature column this trait ranks by.
    fn metric(&self, features: &AudioFeatures) -> f64 {
        match self {
            GeneTrait::Energy => features.energy,
            GeneTrait::Mood => features.valence,
            GeneTrait::Tempo => features.tempo,
            GeneTrait::Instrumentation => features.instrumentalness,
        }
    }
}

/// Representative tracks for one trait axis: the top three by the trait's
/// metric plus one contrary example at the bottom.
#[derive(Clone, Debug, Serialize)]
pub struct TraitExemplars {
    pub top: Vec<Track>,
    pub bottom: Option<Track>,
}

/// Pick trait exemplars from a catalog.
///
/// The top list is sorted descending by the trait metric; ties keep
/// catalog order. With fewer than four tracks the bottom exemplar may
/// overlap the top list.
pub fn exemplars(catalog: &Catalog, gene_trait: GeneTrait) -> TraitExemplars {
    let mut ranked: Vec<&Track> = catalog.tracks.iter().collect();
    // Stable sort, so equal metrics stay in catalog order.
    ranked.sort_by(|a, b| {
        f64::total_cmp(&gene_trait.metric(&b.features), &gene_trait.metric(&a.features))
    });

    let top: Vec<Track> = ranked.iter().take(3).map(|t| (*t).clone()).collect();

    let mut bottom: Option<&Track> = None;
    for track in &catalog.tracks {
        let better = match bottom {
            // Strict comparison keeps the first occurrence on ties.
            Some(current) => {
                gene_trait.metric(&track.features) < gene_trait.metric(&current.features)
            }
            None => true,
        };
        if better {
            bottom = Some(track);
        }
    }

    TraitExemplars {
        top,
        bottom: bottom.cloned(),
    }
}

/// Classify the catalog's mean feature vector, summarizing the listener's
/// overall profile in a single code. `None` on an empty catalog.
pub fn overall_gene(catalog: &Catalog, taxonomy: Taxonomy) -> Option<GeneCode> {
    if catalog.is_empty() {
        return None;
    }

    let n = catalog.len() as f64;
    let mut mean = AudioFeatures {
        energy: 0.0,
        valence: 0.0,
        mode: 0.0,
        tempo: 0.0,
        acousticness: 0.0,
        danceability: 0.0,
        speechiness: 0.0,
        instrumentalness: 0.0,
        time_signature: 0.0,
    };
    for track in &catalog.tracks {
        let f = &track.features;
        mean.energy += f.energy;
        mean.valence += f.valence;
        mean.mode += f.mode;
        mean.tempo += f.tempo;
        mean.acousticness += f.acousticness;
        mean.danceability += f.danceability;
        mean.speechiness += f.speechiness;
        mean.instrumentalness += f.instrumentalness;
        mean.time_signature += f.time_signature;
    }
    mean.energy /= n;
    mean.valence /= n;
    mean.mode /= n;
    mean.tempo /= n;
    mean.acousticness /= n;
    mean.danceability /= n;
    mean.speechiness /= n;
    mean.instrumentalness /= n;
    mean.time_signature /= n;

    Some(taxonomy.classify(&mean))
}
