//! Audio-feature validation.
//!
//! The catalog service hands back per-track feature bundles in which any
//! field may be absent (upstream analysis can fail per-track or per-field).
//! Classification requires the full record, so the raw bundle is validated
//! into [`AudioFeatures`] before any gene code is computed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while validating a raw feature bundle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeatureError {
    #[error("audio feature '{0}' is missing")]
    Missing(&'static str),

    #[error("audio feature '{0}' is not a finite number")]
    NotFinite(&'static str),
}

/// Per-track audio features as returned by the catalog service.
///
/// Every field is optional on the wire; a `None` means the upstream lookup
/// did not produce a value for that field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawFeatureBundle {
    pub energy: Option<f64>,
    pub valence: Option<f64>,
    pub mode: Option<f64>,
    pub tempo: Option<f64>,
    pub acousticness: Option<f64>,
    pub danceability: Option<f64>,
    pub speechiness: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub time_signature: Option<f64>,
}

/// A validated feature record. All fields are present and finite.
///
/// Out-of-range values (a non-positive tempo, an energy above 1.0) pass
/// through unchanged: thresholding must be consistent, sanity-checking the
/// upstream analysis is not this crate's job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub energy: f64,
    pub valence: f64,
    pub mode: f64,
    pub tempo: f64,
    pub acousticness: f64,
    pub danceability: f64,
    pub speechiness: f64,
    pub instrumentalness: f64,
    pub time_signature: f64,
}

impl AudioFeatures {
    /// Validate a raw bundle into a complete feature record.
    ///
    /// Fails with [`FeatureError::Missing`] naming the first absent field,
    /// or [`FeatureError::NotFinite`] if a present value is NaN or infinite.
    pub fn from_raw(raw: &RawFeatureBundle) -> Result<Self, FeatureError> {
        Ok(Self {
            energy: required(raw.energy, "energy")?,
            valence: required(raw.valence, "valence")?,
            mode: required(raw.mode, "mode")?,
            tempo: required(raw.tempo, "tempo")?,
            acousticness: required(raw.acousticness, "acousticness")?,
            danceability: required(raw.danceability, "danceability")?,
            speechiness: required(raw.speechiness, "speechiness")?,
            instrumentalness: required(raw.instrumentalness, "instrumentalness")?,
            time_signature: required(raw.time_signature, "time_signature")?,
        })
    }
}

fn required(value: Option<f64>, field: &'static str) -> Result<f64, FeatureError> {
    let value = value.ok_or(FeatureError::Missing(field))?;
    if !value.is_finite() {
        return Err(FeatureError::NotFinite(field));
    }
    Ok(value)
}
