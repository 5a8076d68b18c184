//! Versioned scoring configuration: factor-to-track assignment, weight
//! vectors, percentile boundaries, tier thresholds, and quadrant gates.
//!
//! Everything here is validated eagerly before any entity is scored. A run
//! either starts from a well-formed framework or aborts with a diagnostic
//! naming the offending track, factor, or table.

pub mod percentile;

use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::MetricSource;
use super::scoring::classify::{QuadrantScheme, TierTable};
pub use percentile::{PercentileBand, PercentileTable, TieBreak};

/// Framework revisions this build understands.
pub const SUPPORTED_SCHEMA_VERSION: u32 = 3;

/// Weight vectors must sum to 1.0 within this tolerance.
pub(crate) const WEIGHT_TOLERANCE: f64 = 1e-6;

/// One factor inside a track: the metric it reads, its weight within the
/// track, and an optional boundary-table override for long-tail factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorConfig {
    pub name: String,
    pub weight: f64,
    pub source: MetricSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentile: Option<PercentileTable>,
}

/// A named group of weighted factors, itself weighted in the composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackConfig {
    pub name: String,
    pub weight: f64,
    pub factors: Vec<FactorConfig>,
}

/// Which entities form the comparison population for a factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopulationPolicy {
    /// Only entities that reported the metric are ranked against each other.
    #[default]
    MeasuredOnly,
    /// Entities missing the metric join the population as zero, so a dish
    /// with no orders drags the percentile floor down instead of vanishing.
    MissingCountsAsZero,
}

/// The full scoring configuration for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringFramework {
    pub schema_version: u32,
    pub tracks: Vec<TrackConfig>,
    #[serde(default)]
    pub percentile: PercentileTable,
    pub tiers: TierTable,
    pub quadrant: QuadrantScheme,
    #[serde(default = "default_min_measured_factors")]
    pub min_measured_factors: usize,
    #[serde(default)]
    pub population: PopulationPolicy,
}

fn default_min_measured_factors() -> usize {
    3
}

impl ScoringFramework {
    /// The current production framework: performance and demand tracks over
    /// the five core dish factors, quintile binning, and the v3 tier ladder.
    pub fn standard() -> Self {
        Self {
            schema_version: SUPPORTED_SCHEMA_VERSION,
            tracks: vec![
                TrackConfig {
                    name: "performance".to_string(),
                    weight: 0.6,
                    factors: vec![
                        FactorConfig {
                            name: "orders_per_zone".to_string(),
                            weight: 0.5,
                            source: MetricSource::OrderExtract,
                            percentile: None,
                        },
                        FactorConfig {
                            name: "avg_rating".to_string(),
                            weight: 0.3,
                            source: MetricSource::OrderExtract,
                            percentile: None,
                        },
                        FactorConfig {
                            name: "kids_happy_rate".to_string(),
                            weight: 0.2,
                            source: MetricSource::Survey,
                            percentile: None,
                        },
                    ],
                },
                TrackConfig {
                    name: "demand".to_string(),
                    weight: 0.4,
                    factors: vec![
                        FactorConfig {
                            name: "latent_demand".to_string(),
                            weight: 0.5,
                            source: MetricSource::Survey,
                            percentile: None,
                        },
                        FactorConfig {
                            name: "non_dinneroo_orders".to_string(),
                            weight: 0.5,
                            source: MetricSource::SupplySheet,
                            percentile: None,
                        },
                    ],
                },
            ],
            percentile: PercentileTable::quintiles(),
            tiers: TierTable::standard(),
            quadrant: QuadrantScheme::standard(),
            min_measured_factors: 3,
            population: PopulationPolicy::MeasuredOnly,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FrameworkError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FrameworkError> {
        let framework: Self = serde_json::from_reader(reader)?;
        framework.validate()?;
        Ok(framework)
    }

    /// The boundary table used for a factor, honoring per-factor overrides.
    pub fn table_for<'a>(&'a self, factor: &'a FactorConfig) -> &'a PercentileTable {
        factor.percentile.as_ref().unwrap_or(&self.percentile)
    }

    /// Eager fail-fast validation of every configured table and weight
    /// vector. Called by the engine before any entity is scored.
    pub fn validate(&self) -> Result<(), FrameworkError> {
        if self.schema_version != SUPPORTED_SCHEMA_VERSION {
            return Err(FrameworkError::UnsupportedSchemaVersion {
                found: self.schema_version,
                supported: SUPPORTED_SCHEMA_VERSION,
            });
        }

        if self.tracks.is_empty() {
            return Err(FrameworkError::EmptyTracks);
        }

        let mut seen_factors: Vec<&str> = Vec::new();
        let mut track_weight_sum = 0.0;

        for track in &self.tracks {
            if track.factors.is_empty() {
                return Err(FrameworkError::EmptyTrack {
                    track: track.name.clone(),
                });
            }
            if !track.weight.is_finite() || track.weight < 0.0 {
                return Err(FrameworkError::InvalidWeight {
                    scope: track.name.clone(),
                });
            }
            track_weight_sum += track.weight;

            let mut factor_weight_sum = 0.0;
            for factor in &track.factors {
                if !factor.weight.is_finite() || factor.weight < 0.0 {
                    return Err(FrameworkError::InvalidWeight {
                        scope: format!("{}/{}", track.name, factor.name),
                    });
                }
                factor_weight_sum += factor.weight;

                if seen_factors.contains(&factor.name.as_str()) {
                    return Err(FrameworkError::DuplicateFactor {
                        factor: factor.name.clone(),
                    });
                }
                seen_factors.push(factor.name.as_str());

                if let Some(table) = &factor.percentile {
                    table.validate()?;
                }
            }

            if (factor_weight_sum - 1.0).abs() > WEIGHT_TOLERANCE {
                return Err(FrameworkError::FactorWeightSum {
                    track: track.name.clone(),
                    sum: factor_weight_sum,
                });
            }
        }

        if (track_weight_sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(FrameworkError::TrackWeightSum {
                sum: track_weight_sum,
            });
        }

        self.percentile.validate()?;
        self.tiers.validate()?;
        self.quadrant.validate()?;

        for axis in [&self.quadrant.axis_x, &self.quadrant.axis_y] {
            if !self.tracks.iter().any(|track| &track.name == axis) {
                return Err(FrameworkError::UnknownQuadrantAxis {
                    axis: axis.clone(),
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug)]
pub enum FrameworkError {
    UnsupportedSchemaVersion { found: u32, supported: u32 },
    EmptyTracks,
    EmptyTrack { track: String },
    InvalidWeight { scope: String },
    FactorWeightSum { track: String, sum: f64 },
    TrackWeightSum { sum: f64 },
    DuplicateFactor { factor: String },
    MalformedPercentileTable { reason: &'static str },
    MalformedTierTable { reason: &'static str },
    MalformedQuadrantScheme { reason: &'static str },
    UnknownQuadrantAxis { axis: String },
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for FrameworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameworkError::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "framework schema version {found} is not supported (expected {supported})"
            ),
            FrameworkError::EmptyTracks => write!(f, "framework defines no tracks"),
            FrameworkError::EmptyTrack { track } => {
                write!(f, "track '{track}' defines no factors")
            }
            FrameworkError::InvalidWeight { scope } => {
                write!(f, "weight for '{scope}' must be finite and non-negative")
            }
            FrameworkError::FactorWeightSum { track, sum } => write!(
                f,
                "factor weights in track '{track}' sum to {sum:.6}, expected 1.0"
            ),
            FrameworkError::TrackWeightSum { sum } => {
                write!(f, "track weights sum to {sum:.6}, expected 1.0")
            }
            FrameworkError::DuplicateFactor { factor } => {
                write!(f, "factor '{factor}' is assigned to more than one track")
            }
            FrameworkError::MalformedPercentileTable { reason } => {
                write!(f, "malformed percentile table: {reason}")
            }
            FrameworkError::MalformedTierTable { reason } => {
                write!(f, "malformed tier table: {reason}")
            }
            FrameworkError::MalformedQuadrantScheme { reason } => {
                write!(f, "malformed quadrant scheme: {reason}")
            }
            FrameworkError::UnknownQuadrantAxis { axis } => {
                write!(f, "quadrant axis '{axis}' does not name a configured track")
            }
            FrameworkError::Io(err) => write!(f, "failed to read scoring framework: {err}"),
            FrameworkError::Json(err) => write!(f, "invalid scoring framework JSON: {err}"),
        }
    }
}

impl std::error::Error for FrameworkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameworkError::Io(err) => Some(err),
            FrameworkError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FrameworkError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for FrameworkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
