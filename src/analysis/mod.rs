//! The Dinneroo zone-analysis core: metric ingestion, multi-factor
//! percentile scoring, tier and quadrant classification, and run reporting.

pub mod domain;
pub mod framework;
pub mod ingest;
pub mod report;
pub mod router;
pub mod scoring;
pub mod taxonomy;

pub use domain::{
    EntityId, EntityKind, EntityMetrics, EvidenceLevel, FactorScore, Metric, MetricSource,
    ScoredEntity,
};
pub use framework::{
    FactorConfig, FrameworkError, PercentileTable, PopulationPolicy, ScoringFramework, TieBreak,
    TrackConfig,
};
pub use ingest::{MetricTableImportError, MetricTableImporter};
pub use report::AnalysisReport;
pub use router::analysis_router;
pub use scoring::{
    Estimator, NoEstimator, ScoringEngine, ScoringError, ScoringRun, TableEstimator,
};
pub use taxonomy::{Taxonomy, TaxonomyError};
