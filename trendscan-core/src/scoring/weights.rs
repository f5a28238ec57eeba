//! Versioned weight table injected into the scoring engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::signals::{Bias, SignalKind};

/// Maps each signal kind to its score.
///
/// Kinds without an override use their static default score. The table is
/// named by `version` and identified by `fingerprint`, so two reports can be
/// compared only when they were scored by the same weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightTable {
    pub version: String,
    pub overrides: BTreeMap<SignalKind, f64>,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            version: "baseline-1".to_string(),
            overrides: BTreeMap::new(),
        }
    }
}

impl WeightTable {
    pub fn score(&self, kind: SignalKind) -> f64 {
        self.overrides
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.spec().default_score)
    }

    pub fn with_override(mut self, kind: SignalKind, score: f64) -> Self {
        self.overrides.insert(kind, score);
        self
    }

    /// Every kind with its effective score, in stable order.
    pub fn resolved(&self) -> BTreeMap<SignalKind, f64> {
        SignalKind::ALL
            .into_iter()
            .map(|kind| (kind, self.score(kind)))
            .collect()
    }

    /// BLAKE3 hex digest of the version and the fully resolved table.
    pub fn fingerprint(&self) -> String {
        // Keys are labels and values are finite after validation, so the
        // canonical JSON is a plain string map; fall back to Debug otherwise.
        let resolved: BTreeMap<&str, f64> = self
            .resolved()
            .into_iter()
            .map(|(kind, score)| (kind.label(), score))
            .collect();
        let body = serde_json::to_string(&(&self.version, &resolved))
            .unwrap_or_else(|_| format!("{:?}{:?}", self.version, resolved));
        blake3::hash(body.as_bytes()).to_hex().to_string()
    }

    /// Bullish kinds must score >= 0, bearish kinds <= 0, all finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (&kind, &score) in &self.overrides {
            if !score.is_finite() {
                return Err(ConfigError::NonFiniteWeight { kind });
            }
            let ok = match kind.spec().bias {
                Bias::Bullish => score >= 0.0,
                Bias::Bearish => score <= 0.0,
            };
            if !ok {
                return Err(ConfigError::Polarity { kind, score });
            }
        }
        Ok(())
    }
}
