use std::collections::BTreeSet;

use crate::analysis::domain::{EvidenceLevel, FactorScore, MetricSource};

/// Assign the confidence tag for one entity's score set.
///
/// `Validated` needs at least `min_measured` factors backed by real metric
/// data spanning two independent upstream datasets (the behavioral + survey
/// triangulation rule). Anything measured that falls short of that is
/// `Corroborated`; a score built entirely from fallback values is
/// `Estimated`. A track-partial composite never reaches `Validated` because
/// a whole track of its evidence is absent.
pub(crate) fn annotate(
    scores: &[FactorScore],
    min_measured: usize,
    track_partial: bool,
) -> EvidenceLevel {
    let measured: Vec<&FactorScore> = scores.iter().filter(|score| score.measured).collect();
    if measured.is_empty() {
        return EvidenceLevel::Estimated;
    }

    let sources: BTreeSet<MetricSource> = measured.iter().map(|score| score.source).collect();
    if !track_partial && measured.len() >= min_measured && sources.len() >= 2 {
        EvidenceLevel::Validated
    } else {
        EvidenceLevel::Corroborated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(factor: &str, source: MetricSource, measured: bool) -> FactorScore {
        FactorScore {
            factor: factor.to_string(),
            raw: 10.0,
            score: 3,
            population: 5,
            source,
            measured,
        }
    }

    #[test]
    fn four_measured_factors_across_sources_validate() {
        let scores = vec![
            score("orders_per_zone", MetricSource::OrderExtract, true),
            score("avg_rating", MetricSource::OrderExtract, true),
            score("kids_happy_rate", MetricSource::Survey, true),
            score("latent_demand", MetricSource::Survey, true),
            score("non_dinneroo_orders", MetricSource::SupplySheet, false),
        ];

        assert_eq!(annotate(&scores, 3, false), EvidenceLevel::Validated);
    }

    #[test]
    fn single_source_coverage_only_corroborates() {
        let scores = vec![
            score("orders_per_zone", MetricSource::OrderExtract, true),
            score("avg_rating", MetricSource::OrderExtract, true),
            score("repeat_rate", MetricSource::OrderExtract, true),
        ];

        assert_eq!(annotate(&scores, 3, false), EvidenceLevel::Corroborated);
    }

    #[test]
    fn one_measured_factor_corroborates_and_none_estimates() {
        let one = vec![
            score("latent_demand", MetricSource::Survey, true),
            score("avg_rating", MetricSource::OrderExtract, false),
        ];
        assert_eq!(annotate(&one, 3, false), EvidenceLevel::Corroborated);

        let none = vec![
            score("latent_demand", MetricSource::Survey, false),
            score("avg_rating", MetricSource::OrderExtract, false),
        ];
        assert_eq!(annotate(&none, 3, false), EvidenceLevel::Estimated);
        assert_eq!(annotate(&[], 3, false), EvidenceLevel::Estimated);
    }

    #[test]
    fn track_partial_composites_never_validate() {
        let scores = vec![
            score("orders_per_zone", MetricSource::OrderExtract, true),
            score("kids_happy_rate", MetricSource::Survey, true),
            score("latent_demand", MetricSource::Survey, true),
        ];

        assert_eq!(annotate(&scores, 3, true), EvidenceLevel::Corroborated);
    }

    #[test]
    fn fully_measured_entities_never_rank_below_unmeasured_ones() {
        let full = vec![
            score("orders_per_zone", MetricSource::OrderExtract, true),
            score("latent_demand", MetricSource::Survey, true),
            score("kids_happy_rate", MetricSource::Survey, true),
        ];
        let empty = vec![
            score("orders_per_zone", MetricSource::OrderExtract, false),
            score("latent_demand", MetricSource::Survey, false),
            score("kids_happy_rate", MetricSource::Survey, false),
        ];

        let strong = annotate(&full, 3, false);
        let weak = annotate(&empty, 3, false);
        assert!(strong <= weak, "ordering relies on enum declaration order");
        assert_eq!(strong, EvidenceLevel::Validated);
        assert_eq!(weak, EvidenceLevel::Estimated);
    }
}
