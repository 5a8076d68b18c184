use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for scored entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The kinds of business objects the pipeline ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Dish,
    Zone,
    Cuisine,
    Partner,
}

impl EntityKind {
    pub const fn ordered() -> [Self; 4] {
        [Self::Dish, Self::Zone, Self::Cuisine, Self::Partner]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dish => "Dish",
            Self::Zone => "Zone",
            Self::Cuisine => "Cuisine",
            Self::Partner => "Partner",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dish" => Some(Self::Dish),
            "zone" => Some(Self::Zone),
            "cuisine" => Some(Self::Cuisine),
            "partner" => Some(Self::Partner),
            _ => None,
        }
    }
}

/// Upstream dataset a metric was extracted from. Order extracts are
/// behavioral data, surveys are stated preference, supply sheets describe
/// partner availability; evidence leveling treats them as independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricSource {
    OrderExtract,
    Survey,
    SupplySheet,
}

impl MetricSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OrderExtract => "Order Extract",
            Self::Survey => "Survey",
            Self::SupplySheet => "Supply Sheet",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "order_extract" | "orders" | "snowflake" => Some(Self::OrderExtract),
            "survey" => Some(Self::Survey),
            "supply_sheet" | "supply" => Some(Self::SupplySheet),
            _ => None,
        }
    }
}

/// A raw numeric observation about an entity. A missing value is valid
/// input and triggers estimation or factor dropping, never a crash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub value: Option<f64>,
    pub source: MetricSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_on: Option<NaiveDate>,
}

/// Per-entity input assembled by ingestion: one row of the metric table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMetrics {
    pub entity: EntityId,
    pub kind: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    pub metrics: BTreeMap<String, Metric>,
}

impl EntityMetrics {
    pub fn new(entity: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            entity: EntityId(entity.into()),
            kind,
            cuisine: None,
            metrics: BTreeMap::new(),
        }
    }

    pub fn with_metric(mut self, name: impl Into<String>, metric: Metric) -> Self {
        self.metrics.insert(name.into(), metric);
        self
    }

    /// The raw value reported for a factor, if the upstream datasets had one.
    pub fn raw_value(&self, factor: &str) -> Option<f64> {
        self.metrics.get(factor).and_then(|metric| metric.value)
    }
}

/// Ordinal score derived for one factor, retained with its provenance so
/// reports can show where each composite came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    pub factor: String,
    pub raw: f64,
    pub score: u8,
    pub population: usize,
    pub source: MetricSource,
    pub measured: bool,
}

/// Confidence tag reflecting how much real data backed a composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceLevel {
    Validated,
    Corroborated,
    Estimated,
}

impl EvidenceLevel {
    pub const fn ordered() -> [Self; 3] {
        [Self::Validated, Self::Corroborated, Self::Estimated]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Validated => "Validated",
            Self::Corroborated => "Corroborated",
            Self::Estimated => "Estimated",
        }
    }
}

/// Fully classified output record for one entity, consumed by report and
/// dashboard generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEntity {
    pub entity: EntityId,
    pub kind: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    pub factor_scores: Vec<FactorScore>,
    pub track_breakdown: BTreeMap<String, f64>,
    pub composite: f64,
    pub partial: bool,
    pub tier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quadrant: Option<String>,
    pub evidence: EvidenceLevel,
}
