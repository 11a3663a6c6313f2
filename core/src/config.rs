use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tokenizer::NormalizerKind;

/// Hit counts are clamped into this range.
pub const MIN_HIT_COUNT: usize = 1;
pub const MAX_HIT_COUNT: usize = 100;

/// How an index is built from a corpus.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub fields: Vec<String>,
    pub compressed: bool,
    pub normalizer: NormalizerKind,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            fields: vec!["body".to_string()],
            compressed: false,
            normalizer: NormalizerKind::Simple,
        }
    }
}

/// Weights for blending TF-IDF with a per-document static score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BetterRankerConfig {
    pub dynamic_weight: f64,
    pub static_weight: f64,
    pub static_score_field: String,
}

impl Default for BetterRankerConfig {
    fn default() -> Self {
        Self {
            dynamic_weight: 1.0,
            static_weight: 1.0,
            static_score_field: "static_quality_score".to_string(),
        }
    }
}

/// Per-query evaluation options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchOptions {
    match_threshold: f64,
    hit_count: usize,
}

impl SearchOptions {
    /// `match_threshold` must lie in (0, 1]. `hit_count` is clamped to
    /// [`MIN_HIT_COUNT`, `MAX_HIT_COUNT`].
    pub fn new(match_threshold: f64, hit_count: usize) -> Result<Self> {
        if !(match_threshold > 0.0 && match_threshold <= 1.0) {
            return Err(Error::InvalidMatchThreshold(match_threshold));
        }
        Ok(Self { match_threshold, hit_count: hit_count.clamp(MIN_HIT_COUNT, MAX_HIT_COUNT) })
    }

    pub fn match_threshold(&self) -> f64 {
        self.match_threshold
    }

    pub fn hit_count(&self) -> usize {
        self.hit_count
    }

    /// N for a query with `unique_terms` distinct terms.
    pub fn required_matches(&self, unique_terms: usize) -> usize {
        let n = (self.match_threshold * unique_terms as f64).floor() as usize;
        n.min(unique_terms).max(1)
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { match_threshold: 1.0, hit_count: 10 }
    }
}
