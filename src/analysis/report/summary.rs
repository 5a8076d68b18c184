use crate::analysis::domain::EvidenceLevel;
use crate::analysis::scoring::ScoringRun;

use super::views::{
    AnalysisInsights, AnalysisSummary, EvidenceCountEntry, QuadrantCountEntry, RankedEntityView,
    TierCountEntry,
};

/// Stakeholder-facing wrapper over one scoring run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    run: ScoringRun,
}

impl AnalysisReport {
    pub fn new(run: ScoringRun) -> Self {
        Self { run }
    }

    pub fn run(&self) -> &ScoringRun {
        &self.run
    }

    /// Distributions plus the composite-ranked table. Ranking order is
    /// deterministic: composite descending, entity name ascending on ties.
    pub fn summary(&self) -> AnalysisSummary {
        let mut ranked: Vec<&crate::analysis::domain::ScoredEntity> =
            self.run.scored.iter().collect();
        ranked.sort_by(|a, b| {
            b.composite
                .partial_cmp(&a.composite)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.entity.cmp(&b.entity))
        });

        let rankings: Vec<RankedEntityView> = ranked
            .iter()
            .enumerate()
            .map(|(index, record)| RankedEntityView {
                rank: index + 1,
                entity: record.entity.0.clone(),
                kind: record.kind,
                kind_label: record.kind.label(),
                cuisine: record.cuisine.clone(),
                composite: record.composite,
                tier: record.tier.clone(),
                quadrant: record.quadrant.clone(),
                evidence: record.evidence,
                evidence_label: record.evidence.label(),
                partial: record.partial,
            })
            .collect();

        let mut tier_distribution: Vec<TierCountEntry> = Vec::new();
        for view in &rankings {
            match tier_distribution
                .iter_mut()
                .find(|entry| entry.label == view.tier)
            {
                Some(entry) => entry.count += 1,
                None => tier_distribution.push(TierCountEntry {
                    label: view.tier.clone(),
                    count: 1,
                }),
            }
        }

        let mut quadrant_distribution: Vec<QuadrantCountEntry> = Vec::new();
        for view in &rankings {
            let Some(quadrant) = &view.quadrant else {
                continue;
            };
            match quadrant_distribution
                .iter_mut()
                .find(|entry| &entry.label == quadrant)
            {
                Some(entry) => entry.count += 1,
                None => quadrant_distribution.push(QuadrantCountEntry {
                    label: quadrant.clone(),
                    count: 1,
                }),
            }
        }

        let evidence_distribution = EvidenceLevel::ordered()
            .into_iter()
            .filter_map(|level| {
                let count = rankings
                    .iter()
                    .filter(|view| view.evidence == level)
                    .count();
                (count > 0).then(|| EvidenceCountEntry {
                    level,
                    level_label: level.label(),
                    count,
                })
            })
            .collect();

        AnalysisSummary {
            total_scored: rankings.len(),
            skipped: self.run.skipped.len(),
            tier_distribution,
            quadrant_distribution,
            evidence_distribution,
            rankings,
        }
    }
}

impl AnalysisSummary {
    pub fn insights(&self) -> AnalysisInsights {
        super::generate_insights(self)
    }
}
