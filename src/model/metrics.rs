//! Numeric metric maps.
//!
//! Every entity carries a [`MetricMap`]: metric-name to `f64` value. Later
//! writes overwrite earlier ones for the same key. Non-finite values (NaN,
//! ±∞) are silently dropped: they encode "no measurement", not a model
//! fault, so rejecting them with an error would force every caller to
//! pre-filter its inputs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Metric-name to numeric value map attached to every entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricMap {
    values: HashMap<String, f64>,
}

impl MetricMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a metric, overwriting any previous value for the same name.
    ///
    /// Non-finite values are a logged no-op.
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        if !value.is_finite() {
            debug!("dropping non-finite value for metric '{}'", name);
            return;
        }
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Merge `incoming` into this map: incoming values overwrite same-named
    /// metrics, metrics present only here are kept.
    pub fn merge_from(&mut self, incoming: MetricMap) {
        for (name, value) in incoming.values {
            self.values.insert(name, value);
        }
    }
}
