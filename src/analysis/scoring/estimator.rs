use std::collections::BTreeMap;

use crate::analysis::domain::EntityMetrics;

/// Fallback supplier for factors that have no extracted metric.
///
/// The engine depends only on this seam, so estimates can come from research
/// priors, an external reasoning system, or nothing at all without the
/// deterministic core knowing the difference. Estimated values are always
/// tagged `measured = false` downstream and degrade the evidence level.
pub trait Estimator {
    /// A raw value for `factor`, or `None` to let the factor drop out of the
    /// entity's weight vector.
    fn estimate(&self, entity: &EntityMetrics, factor: &str) -> Option<f64>;
}

/// Default estimator: never supplies a value, so missing factors stay
/// missing and weights renormalize over what was actually observed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEstimator;

impl Estimator for NoEstimator {
    fn estimate(&self, _entity: &EntityMetrics, _factor: &str) -> Option<f64> {
        None
    }
}

/// Deterministic estimator backed by a pre-computed (entity, factor) table,
/// the shape research teams hand over as a spreadsheet of priors.
#[derive(Debug, Default, Clone)]
pub struct TableEstimator {
    estimates: BTreeMap<(String, String), f64>,
}

impl TableEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_estimate(
        mut self,
        entity: impl Into<String>,
        factor: impl Into<String>,
        value: f64,
    ) -> Self {
        self.estimates.insert((entity.into(), factor.into()), value);
        self
    }

    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }
}

impl Estimator for TableEstimator {
    fn estimate(&self, entity: &EntityMetrics, factor: &str) -> Option<f64> {
        self.estimates
            .get(&(entity.entity.0.clone(), factor.to_string()))
            .copied()
    }
}
