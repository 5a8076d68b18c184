//! End-to-end specifications for the scoring pipeline: CSV metric table in,
//! classified and ranked report out, driven entirely through the public API.

use dinneroo_insights::analysis::report::AnalysisReport;
use dinneroo_insights::analysis::scoring::{NoEstimator, ScoringEngine};
use dinneroo_insights::analysis::{
    EvidenceLevel, MetricTableImporter, ScoringFramework, Taxonomy,
};
use std::io::Cursor;

const METRIC_TABLE: &str = "\
Entity,Kind,Metric,Value,Source,Extracted On
Margherita Pizza,dish,Orders Per Zone,10,snowflake,2026-07-01
Margherita Pizza,dish,Avg Rating,3.8,snowflake,2026-07-01
Margherita Pizza,dish,Kids Happy Rate,0.58,survey,2026-06-12
Margherita Pizza,dish,Latent Demand,90,survey,2026-06-12
Margherita Pizza,dish,Non Dinneroo Orders,20,supply,2026-06-20
Butter Chicken,dish,Orders Per Zone,20,snowflake,2026-07-01
Butter Chicken,dish,Avg Rating,4.1,snowflake,2026-07-01
Butter Chicken,dish,Kids Happy Rate,0.66,survey,2026-06-12
Butter Chicken,dish,Latent Demand,80,survey,2026-06-12
Butter Chicken,dish,Non Dinneroo Orders,40,supply,2026-06-20
Pad Thai,dish,Orders Per Zone,30,snowflake,2026-07-01
Pad Thai,dish,Avg Rating,4.4,snowflake,2026-07-01
Pad Thai,dish,Kids Happy Rate,0.74,survey,2026-06-12
Pad Thai,dish,Latent Demand,70,survey,2026-06-12
Pad Thai,dish,Non Dinneroo Orders,60,supply,2026-06-20
Fish And Chips,dish,Orders Per Zone,40,snowflake,2026-07-01
Fish And Chips,dish,Avg Rating,4.7,snowflake,2026-07-01
Fish And Chips,dish,Kids Happy Rate,0.82,survey,2026-06-12
Fish And Chips,dish,Latent Demand,60,survey,2026-06-12
Fish And Chips,dish,Non Dinneroo Orders,80,supply,2026-06-20
Katsu Curry,dish,Orders Per Zone,50,snowflake,2026-07-01
Katsu Curry,dish,Avg Rating,5.0,snowflake,2026-07-01
Katsu Curry,dish,Kids Happy Rate,0.90,survey,2026-06-12
Katsu Curry,dish,Latent Demand,50,survey,2026-06-12
Katsu Curry,dish,Non Dinneroo Orders,100,supply,2026-06-20
Gyoza Platter,dish,Latent Demand,95,survey,2026-06-12
Gyoza Platter,dish,Non Dinneroo Orders,150,supply,2026-06-20
Mystery Dish,dish,Orders Per Zone,,snowflake,
";

fn score_table() -> AnalysisReport {
    let entities =
        MetricTableImporter::from_reader(Cursor::new(METRIC_TABLE), &Taxonomy::standard())
            .expect("metric table imports");
    let engine = ScoringEngine::new(ScoringFramework::standard()).expect("framework validates");
    let run = engine
        .score_all(&entities, &NoEstimator)
        .expect("batch scores");
    AnalysisReport::new(run)
}

#[test]
fn pipeline_classifies_every_entity_with_data() {
    let report = score_table();
    let summary = report.summary();

    assert_eq!(summary.total_scored, 6);
    assert_eq!(summary.skipped, 1);

    for view in &summary.rankings {
        assert!((1.0..=5.0).contains(&view.composite));
        assert!(!view.tier.is_empty());
    }
}

#[test]
fn established_top_seller_reaches_the_top_tier() {
    let report = score_table();
    let summary = report.summary();

    let katsu = summary
        .rankings
        .iter()
        .find(|view| view.entity == "katsu curry")
        .expect("katsu curry ranked");

    assert!((katsu.composite - 4.0).abs() < 1e-9);
    assert_eq!(katsu.tier, "Must-Have");
    assert_eq!(katsu.quadrant.as_deref(), Some("Protect"));
    assert_eq!(katsu.evidence, EvidenceLevel::Validated);
    assert_eq!(katsu.cuisine.as_deref(), Some("japanese"));
}

#[test]
fn unlaunched_dish_ranks_on_demand_alone() {
    let report = score_table();
    let summary = report.summary();

    let gyoza = summary
        .rankings
        .iter()
        .find(|view| view.entity == "gyoza platter")
        .expect("gyoza ranked");

    assert_eq!(gyoza.rank, 1);
    assert!((gyoza.composite - 5.0).abs() < 1e-9);
    assert!(gyoza.partial);
    assert_eq!(gyoza.quadrant.as_deref(), Some("Prospect"));
    assert_eq!(gyoza.evidence, EvidenceLevel::Corroborated);

    let record = report
        .run()
        .scored
        .iter()
        .find(|record| record.entity.as_str() == "gyoza platter")
        .expect("gyoza record");
    assert!(!record.track_breakdown.contains_key("performance"));
}

#[test]
fn weak_performer_falls_to_the_watch_tier() {
    let report = score_table();
    let summary = report.summary();

    let margherita = summary
        .rankings
        .iter()
        .find(|view| view.entity == "margherita pizza")
        .expect("margherita ranked");

    assert_eq!(margherita.tier, "Monitor");
    assert_eq!(margherita.quadrant.as_deref(), Some("Monitor"));

    let insights = summary.insights();
    assert!(insights
        .watchlist
        .iter()
        .any(|line| line.contains("margherita pizza")));
}

#[test]
fn entity_with_only_empty_values_is_skipped() {
    let report = score_table();

    assert_eq!(report.run().skipped.len(), 1);
    assert_eq!(report.run().skipped[0].as_str(), "mystery dish");

    let insights = report.summary().insights();
    assert!(insights
        .recommended_actions
        .iter()
        .any(|line| line.contains("skipped")));
}

#[test]
fn evidence_distribution_separates_triangulated_from_single_track() {
    let summary = score_table().summary();

    let validated = summary
        .evidence_distribution
        .iter()
        .find(|entry| entry.level == EvidenceLevel::Validated)
        .expect("validated entities present");
    let corroborated = summary
        .evidence_distribution
        .iter()
        .find(|entry| entry.level == EvidenceLevel::Corroborated)
        .expect("corroborated entities present");

    assert_eq!(validated.count, 5);
    assert_eq!(corroborated.count, 1);
}
