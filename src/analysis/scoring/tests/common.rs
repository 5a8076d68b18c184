use crate::analysis::domain::{EntityKind, EntityMetrics, Metric, MetricSource};
use crate::analysis::framework::ScoringFramework;
use crate::analysis::scoring::ScoringEngine;

pub(super) fn metric(value: f64, source: MetricSource) -> Metric {
    Metric {
        value: Some(value),
        source,
        extracted_on: None,
    }
}

pub(super) fn dish(
    name: &str,
    orders: f64,
    rating: f64,
    kids: f64,
    latent: f64,
    non_dinneroo: f64,
) -> EntityMetrics {
    EntityMetrics::new(name, EntityKind::Dish)
        .with_metric("orders_per_zone", metric(orders, MetricSource::OrderExtract))
        .with_metric("avg_rating", metric(rating, MetricSource::OrderExtract))
        .with_metric("kids_happy_rate", metric(kids, MetricSource::Survey))
        .with_metric("latent_demand", metric(latent, MetricSource::Survey))
        .with_metric(
            "non_dinneroo_orders",
            metric(non_dinneroo, MetricSource::SupplySheet),
        )
}

/// Five fully measured dishes with evenly spread order counts, so the
/// quintile bins land one dish per band on the orders factor.
pub(super) fn dish_batch() -> Vec<EntityMetrics> {
    vec![
        dish("margherita pizza", 10.0, 3.8, 0.58, 90.0, 20.0),
        dish("butter chicken", 20.0, 4.1, 0.66, 80.0, 40.0),
        dish("pad thai", 30.0, 4.4, 0.74, 70.0, 60.0),
        dish("fish and chips", 40.0, 4.7, 0.82, 60.0, 80.0),
        dish("katsu curry", 50.0, 5.0, 0.90, 50.0, 100.0),
    ]
}

/// A dish not yet on the platform: demand signals only, no performance data.
pub(super) fn demand_only_dish(name: &str, latent: f64, non_dinneroo: f64) -> EntityMetrics {
    EntityMetrics::new(name, EntityKind::Dish)
        .with_metric("latent_demand", metric(latent, MetricSource::Survey))
        .with_metric(
            "non_dinneroo_orders",
            metric(non_dinneroo, MetricSource::SupplySheet),
        )
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(ScoringFramework::standard()).expect("standard framework validates")
}
