use crate::analysis::domain::EvidenceLevel;

use super::views::{AnalysisInsights, AnalysisSummary};

pub(crate) fn generate_insights(summary: &AnalysisSummary) -> AnalysisInsights {
    let mut observations = Vec::new();
    let mut recommended_actions = Vec::new();
    let mut watchlist = Vec::new();

    if summary.total_scored == 0 {
        observations.push("No entities produced a composite this run".to_string());
        if summary.skipped > 0 {
            recommended_actions.push(format!(
                "Check upstream extracts: {} entit{} arrived with no scorable data",
                summary.skipped,
                if summary.skipped == 1 { "y" } else { "ies" }
            ));
        }
        return AnalysisInsights {
            observations,
            recommended_actions,
            watchlist,
        };
    }

    if let Some(top_tier) = summary.tier_distribution.first() {
        observations.push(format!(
            "{} of {} entities reach the {} tier",
            top_tier.count, summary.total_scored, top_tier.label
        ));
    }

    let estimated = summary
        .evidence_distribution
        .iter()
        .find(|entry| entry.level == EvidenceLevel::Estimated)
        .map(|entry| entry.count)
        .unwrap_or(0);
    if estimated > 0 {
        observations.push(format!(
            "{estimated} ranking(s) rest on estimated evidence only"
        ));
        recommended_actions.push(format!(
            "Commission survey coverage for the {estimated} estimated-only entit{} before acting on their rankings",
            if estimated == 1 { "y" } else { "ies" }
        ));
    }

    let partial = summary.rankings.iter().filter(|view| view.partial).count();
    if partial > 0 {
        observations.push(format!(
            "{partial} entit{} scored without full track coverage",
            if partial == 1 { "y" } else { "ies" }
        ));
        recommended_actions.push(format!(
            "Backfill the missing track data for {partial} partially scored entit{} to unlock full-grid placement",
            if partial == 1 { "y" } else { "ies" }
        ));
    }

    if summary.skipped > 0 {
        observations.push(format!(
            "{} entit{} had no scorable data and were skipped",
            summary.skipped,
            if summary.skipped == 1 { "y" } else { "ies" }
        ));
        recommended_actions.push(format!(
            "Reconcile the {} skipped entit{} against the source extracts",
            summary.skipped,
            if summary.skipped == 1 { "y" } else { "ies" }
        ));
    }

    if let Some(bottom_tier) = summary.tier_distribution.last() {
        if summary.tier_distribution.len() > 1 {
            for view in summary
                .rankings
                .iter()
                .filter(|view| view.tier == bottom_tier.label)
                .take(5)
            {
                watchlist.push(format!(
                    "{} ({}, composite {:.2})",
                    view.entity, view.tier, view.composite
                ));
            }
        }
    }

    if observations.is_empty() {
        observations.push("Rankings are stable; no data-quality flags this run".to_string());
    }

    AnalysisInsights {
        observations,
        recommended_actions,
        watchlist,
    }
}
