//! Gene classification.
//!
//! A gene code is a 4-symbol string summarizing a track's audio profile,
//! one symbol per trait axis. Two taxonomy variants exist and are selected
//! at configuration time; `classic` is the canonical default. Thresholds
//! are fixed constants so the 16 possible codes per variant stay stable
//! and usable as UI facets.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::features::AudioFeatures;

/// A track's gene code: exactly four symbols, one per taxonomy axis.
///
/// Codes are only produced by [`Taxonomy::classify`] and
/// [`Taxonomy::parse_code`], so a `GeneCode` in hand is always a
/// well-formed word of its taxonomy's alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeneCode(String);

impl GeneCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classification taxonomy variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Taxonomy {
    /// Simple per-axis thresholds over energy, mode, tempo and acousticness.
    #[default]
    Classic,
    /// Weighted composite scores for mood and arrangement complexity.
    Composite,
}

impl Taxonomy {
    /// Parse from configuration string representation.
    pub fn from_config_str(s: &str) -> Option<Self> {
        match s {
            "classic" => Some(Taxonomy::Classic),
            "composite" => Some(Taxonomy::Composite),
            _ => None,
        }
    }

    /// Convert to configuration string representation.
    pub fn as_config_str(&self) -> &'static str {
        match self {
            Taxonomy::Classic => "classic",
            Taxonomy::Composite => "composite",
        }
    }

    /// The two symbols of each of the four axes, in code order.
    fn axes(&self) -> [[char; 2]; 4] {
        match self {
            Taxonomy::Classic => [['H', 'L'], ['P', 'N'], ['F', 'S'], ['E', 'A']],
            Taxonomy::Composite => [['H', 'S'], ['F', 'L'], ['D', 'M'], ['V', 'I']],
        }
    }

    /// Compute the gene code for a validated feature record.
    ///
    /// Pure and deterministic: the same features always yield the same
    /// code. Boundary values resolve to the second symbol of the axis
    /// (strict comparisons throughout).
    pub fn classify(&self, features: &AudioFeatures) -> GeneCode {
        match self {
            Taxonomy::Classic => classify_classic(features),
            Taxonomy::Composite => classify_composite(features),
        }
    }

    /// Parse a caller-provided code, returning `None` unless it is a
    /// well-formed word of this taxonomy's alphabet.
    pub fn parse_code(&self, s: &str) -> Option<GeneCode> {
        let symbols: Vec<char> = s.chars().collect();
        if symbols.len() != 4 {
            return None;
        }
        let valid = self
            .axes()
            .iter()
            .zip(&symbols)
            .all(|(axis, symbol)| axis.contains(symbol));
        valid.then(|| GeneCode(s.to_string()))
    }

    /// Human-readable legend for a single gene symbol.
    pub fn describe_symbol(&self, symbol: char) -> Option<&'static str> {
        let description = match (self, symbol) {
            (Taxonomy::Classic, 'H') => "High Energy",
            (Taxonomy::Classic, 'L') => "Low Energy",
            (Taxonomy::Classic, 'P') => "Positive Mood",
            (Taxonomy::Classic, 'N') => "Negative Mood",
            (Taxonomy::Classic, 'F') => "Fast Tempo",
            (Taxonomy::Classic, 'S') => "Slow Tempo",
            (Taxonomy::Classic, 'E') => "Electronic Instrumentation",
            (Taxonomy::Classic, 'A') => "Acoustic Instrumentation",
            (Taxonomy::Composite, 'H') => "Upbeat Mood",
            (Taxonomy::Composite, 'S') => "Somber Mood",
            (Taxonomy::Composite, 'F') => "Fast Tempo",
            (Taxonomy::Composite, 'L') => "Laid-back Tempo",
            (Taxonomy::Composite, 'D') => "Dense Arrangement",
            (Taxonomy::Composite, 'M') => "Minimal Arrangement",
            (Taxonomy::Composite, 'V') => "Vocal",
            (Taxonomy::Composite, 'I') => "Instrumental",
            _ => return None,
        };
        Some(description)
    }
}

fn classify_classic(f: &AudioFeatures) -> GeneCode {
    let energy = if f.energy > 0.5 { 'H' } else { 'L' };
    let mood = if f.mode > 0.49 { 'P' } else { 'N' };
    let tempo = if f.tempo > 100.0 { 'F' } else { 'S' };
    let instrumentation = if f.acousticness < 0.5 { 'E' } else { 'A' };
    GeneCode([energy, mood, tempo, instrumentation].into_iter().collect())
}

fn classify_composite(f: &AudioFeatures) -> GeneCode {
    let mood_score = 0.8 * f.valence + 0.2 * f.mode;
    let mood = if mood_score > 0.5 { 'H' } else { 'S' };

    let tempo = if f.tempo > 100.0 { 'F' } else { 'L' };

    let odd_meter = if f.time_signature != 4.0 { 1.0 } else { 0.0 };
    let weighted = -0.15 * f.instrumentalness + 0.25 * f.speechiness - 0.15 * f.acousticness
        + 0.2 * f.energy
        + 0.1 * f.danceability
        + 0.15 * f.tempo / 200.0
        + 0.2 * odd_meter;
    // Map the weighted sum from [-1, 1] onto [0, 1] before thresholding.
    let complexity_score = (weighted + 1.0) / 2.0;
    let complexity = if complexity_score > 0.55 { 'D' } else { 'M' };

    let vocals = if f.instrumentalness < 0.5 { 'V' } else { 'I' };

    GeneCode([mood, tempo, complexity, vocals].into_iter().collect())
}
