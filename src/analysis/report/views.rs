use serde::Serialize;

use crate::analysis::domain::{EntityKind, EvidenceLevel};

#[derive(Debug, Clone, Serialize)]
pub struct TierCountEntry {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuadrantCountEntry {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvidenceCountEntry {
    pub level: EvidenceLevel,
    pub level_label: &'static str,
    pub count: usize,
}

/// One row of the composite-ranked output table.
#[derive(Debug, Clone, Serialize)]
pub struct RankedEntityView {
    pub rank: usize,
    pub entity: String,
    pub kind: EntityKind,
    pub kind_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    pub composite: f64,
    pub tier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quadrant: Option<String>,
    pub evidence: EvidenceLevel,
    pub evidence_label: &'static str,
    pub partial: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub total_scored: usize,
    pub skipped: usize,
    pub tier_distribution: Vec<TierCountEntry>,
    pub quadrant_distribution: Vec<QuadrantCountEntry>,
    pub evidence_distribution: Vec<EvidenceCountEntry>,
    pub rankings: Vec<RankedEntityView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisInsights {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub observations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommended_actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub watchlist: Vec<String>,
}
