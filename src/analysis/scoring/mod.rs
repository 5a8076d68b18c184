//! The per-run scoring engine: percentile binning, weighted aggregation,
//! track composition, tier/quadrant classification, and evidence leveling.

pub mod classify;
pub(crate) mod composite;
pub mod estimator;

mod evidence;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::fmt;

use tracing::warn;

use super::domain::{EntityId, EntityMetrics, FactorScore, ScoredEntity};
use super::framework::{FactorConfig, PopulationPolicy, ScoringFramework};
use composite::{TrackSubtotal, WeightedFactor};

pub use estimator::{Estimator, NoEstimator, TableEstimator};

/// Errors raised while scoring a batch. Configuration problems are caught
/// before this point by framework validation; these cover the two run-time
/// invariants that remain.
#[derive(Debug)]
pub enum ScoringError {
    /// A score was requested against a population with no members.
    EmptyPopulation { factor: String },
    /// A weight vector failed the unit-sum guard during aggregation.
    WeightSum { scope: String, sum: f64 },
}

impl fmt::Display for ScoringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringError::EmptyPopulation { factor } => {
                write!(f, "factor '{factor}' has an empty comparison population")
            }
            ScoringError::WeightSum { scope, sum } => {
                write!(f, "weights for '{scope}' sum to {sum:.6}, expected 1.0")
            }
        }
    }
}

impl std::error::Error for ScoringError {}

/// The outcome of one batch run: classified entities plus the ids that had
/// no scorable data at all (skipped, never fabricated).
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRun {
    pub scored: Vec<ScoredEntity>,
    pub skipped: Vec<EntityId>,
}

/// Stateless scorer applying one validated framework to a batch of
/// entities. Every run recomputes everything from its inputs; composites
/// are only comparable within the batch they were scored against.
pub struct ScoringEngine {
    framework: ScoringFramework,
}

impl ScoringEngine {
    /// Validates the framework eagerly; a bad configuration never scores.
    pub fn new(
        framework: ScoringFramework,
    ) -> Result<Self, crate::analysis::framework::FrameworkError> {
        framework.validate()?;
        Ok(Self { framework })
    }

    pub fn framework(&self) -> &ScoringFramework {
        &self.framework
    }

    /// Score every entity in the batch against populations drawn from the
    /// batch itself.
    pub fn score_all(
        &self,
        entities: &[EntityMetrics],
        estimator: &dyn Estimator,
    ) -> Result<ScoringRun, ScoringError> {
        let populations = self.populations(entities);

        let mut scored = Vec::with_capacity(entities.len());
        let mut skipped = Vec::new();

        for entity in entities {
            match self.score_entity(entity, estimator, &populations)? {
                Some(record) => scored.push(record),
                None => {
                    warn!(entity = %entity.entity.0, "no scorable data for entity; skipping");
                    skipped.push(entity.entity.clone());
                }
            }
        }

        Ok(ScoringRun { scored, skipped })
    }

    /// Comparison populations, computed once per factor per run and shared
    /// read-only across every entity's scoring.
    fn populations(&self, entities: &[EntityMetrics]) -> BTreeMap<String, Vec<f64>> {
        let mut populations = BTreeMap::new();

        for track in &self.framework.tracks {
            for factor in &track.factors {
                let values = match self.framework.population {
                    PopulationPolicy::MeasuredOnly => entities
                        .iter()
                        .filter_map(|entity| entity.raw_value(&factor.name))
                        .collect(),
                    PopulationPolicy::MissingCountsAsZero => entities
                        .iter()
                        .map(|entity| entity.raw_value(&factor.name).unwrap_or(0.0))
                        .collect(),
                };
                populations.insert(factor.name.clone(), values);
            }
        }

        populations
    }

    fn score_entity(
        &self,
        entity: &EntityMetrics,
        estimator: &dyn Estimator,
        populations: &BTreeMap<String, Vec<f64>>,
    ) -> Result<Option<ScoredEntity>, ScoringError> {
        let mut factor_scores = Vec::new();
        let mut present = Vec::new();
        let mut dropped = Vec::new();

        for track in &self.framework.tracks {
            let applicable = self.applicable_factors(entity, estimator, track.factors.as_slice());
            if applicable.is_empty() {
                dropped.push(track.name.clone());
                continue;
            }

            let weights: Vec<f64> = applicable
                .iter()
                .map(|observation| observation.config.weight)
                .collect();
            let renormalized =
                composite::renormalize(&weights).ok_or_else(|| ScoringError::WeightSum {
                    scope: track.name.clone(),
                    sum: weights.iter().sum(),
                })?;

            let mut weighted = Vec::with_capacity(applicable.len());
            for (observation, weight) in applicable.iter().zip(renormalized) {
                let population = populations
                    .get(&observation.config.name)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                let score = self
                    .framework
                    .table_for(observation.config)
                    .bin(observation.raw, population)
                    .ok_or_else(|| ScoringError::EmptyPopulation {
                        factor: observation.config.name.clone(),
                    })?;

                factor_scores.push(FactorScore {
                    factor: observation.config.name.clone(),
                    raw: observation.raw,
                    score,
                    population: population.len(),
                    source: observation.source,
                    measured: observation.measured,
                });
                weighted.push(WeightedFactor {
                    factor: observation.config.name.clone(),
                    score,
                    weight,
                });
            }

            let subtotal = composite::aggregate_track(&track.name, &weighted)?;
            present.push(TrackSubtotal {
                track: track.name.clone(),
                subtotal,
                weight: track.weight,
            });
        }

        if present.is_empty() {
            return Ok(None);
        }

        let composite = composite::compose(&present, dropped)?;
        let tier = self.framework.tiers.classify(composite.value).to_string();

        let quadrant = composite
            .breakdown
            .get(&self.framework.quadrant.axis_y)
            .copied()
            .map(|axis_y| {
                let axis_x = composite
                    .breakdown
                    .get(&self.framework.quadrant.axis_x)
                    .copied();
                self.framework.quadrant.classify(axis_x, axis_y).to_string()
            });

        let evidence = evidence::annotate(
            &factor_scores,
            self.framework.min_measured_factors,
            composite.partial,
        );

        Ok(Some(ScoredEntity {
            entity: entity.entity.clone(),
            kind: entity.kind,
            cuisine: entity.cuisine.clone(),
            factor_scores,
            track_breakdown: composite.breakdown,
            composite: composite.value,
            partial: composite.partial,
            tier,
            quadrant,
            evidence,
        }))
    }

    fn applicable_factors<'a>(
        &self,
        entity: &EntityMetrics,
        estimator: &dyn Estimator,
        factors: &'a [FactorConfig],
    ) -> Vec<FactorObservation<'a>> {
        let mut applicable = Vec::new();

        for config in factors {
            let metric = entity.metrics.get(&config.name);
            if let Some(raw) = metric.and_then(|metric| metric.value) {
                let source = metric.map(|metric| metric.source).unwrap_or(config.source);
                applicable.push(FactorObservation {
                    config,
                    raw,
                    source,
                    measured: true,
                });
            } else if let Some(raw) = estimator.estimate(entity, &config.name) {
                applicable.push(FactorObservation {
                    config,
                    raw,
                    source: config.source,
                    measured: false,
                });
            }
        }

        applicable
    }
}

struct FactorObservation<'a> {
    config: &'a FactorConfig,
    raw: f64,
    source: crate::analysis::domain::MetricSource,
    measured: bool,
}
