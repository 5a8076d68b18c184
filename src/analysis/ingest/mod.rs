//! Phase-one data loading: the long-format metric table exported by the
//! upstream survey, order-extract, and supply-sheet jobs.

pub(crate) mod normalizer;
mod parser;

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use super::domain::{EntityId, EntityKind, EntityMetrics, Metric, MetricSource};
use super::taxonomy::Taxonomy;

#[derive(Debug)]
pub enum MetricTableImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingEntity { row: usize },
    UnknownKind { row: usize, value: String },
    UnknownSource { row: usize, value: String },
    InvalidValue { row: usize, value: String },
}

impl fmt::Display for MetricTableImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricTableImportError::Io(err) => {
                write!(f, "failed to read metric table: {err}")
            }
            MetricTableImportError::Csv(err) => {
                write!(f, "invalid metric table CSV: {err}")
            }
            MetricTableImportError::MissingEntity { row } => {
                write!(f, "row {row} has an empty entity name")
            }
            MetricTableImportError::UnknownKind { row, value } => {
                write!(f, "row {row} has unknown entity kind '{value}'")
            }
            MetricTableImportError::UnknownSource { row, value } => {
                write!(f, "row {row} has unknown metric source '{value}'")
            }
            MetricTableImportError::InvalidValue { row, value } => {
                write!(f, "row {row} has non-numeric value '{value}'")
            }
        }
    }
}

impl std::error::Error for MetricTableImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MetricTableImportError::Io(err) => Some(err),
            MetricTableImportError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MetricTableImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for MetricTableImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct MetricTableImporter;

impl MetricTableImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        taxonomy: &Taxonomy,
    ) -> Result<Vec<EntityMetrics>, MetricTableImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, taxonomy)
    }

    /// Parse and group the table into one `EntityMetrics` per (entity,
    /// kind) pair. Duplicate rows for the same metric never overwrite the
    /// first observation; missing values are kept as metrics with no value
    /// so scoring can tell "not reported" from "not in the export".
    pub fn from_reader<R: Read>(
        reader: R,
        taxonomy: &Taxonomy,
    ) -> Result<Vec<EntityMetrics>, MetricTableImportError> {
        let mut grouped: BTreeMap<(String, EntityKind), EntityMetrics> = BTreeMap::new();

        for (index, record) in parser::parse_records(reader)?.into_iter().enumerate() {
            let row = index + 1;

            if record.entity.is_empty() {
                return Err(MetricTableImportError::MissingEntity { row });
            }
            let kind = EntityKind::parse(&record.kind_raw).ok_or_else(|| {
                MetricTableImportError::UnknownKind {
                    row,
                    value: record.kind_raw.clone(),
                }
            })?;
            let source = MetricSource::parse(&record.source_raw).ok_or_else(|| {
                MetricTableImportError::UnknownSource {
                    row,
                    value: record.source_raw.clone(),
                }
            })?;
            let value = match &record.value_raw {
                Some(raw) => Some(raw.parse::<f64>().map_err(|_| {
                    MetricTableImportError::InvalidValue {
                        row,
                        value: raw.clone(),
                    }
                })?),
                None => None,
            };

            let entry = grouped
                .entry((record.entity.clone(), kind))
                .or_insert_with(|| {
                    let mut entity = EntityMetrics::new(record.entity.clone(), kind);
                    if kind == EntityKind::Dish {
                        entity.cuisine = taxonomy.parent(&record.entity).map(str::to_string);
                    }
                    entity
                });

            entry.metrics.entry(record.metric).or_insert(Metric {
                value,
                source,
                extracted_on: record.extracted_on,
            });
        }

        Ok(grouped.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "Entity,Kind,Metric,Value,Source,Extracted On\n";

    fn import(body: &str) -> Result<Vec<EntityMetrics>, MetricTableImportError> {
        let csv = format!("{HEADER}{body}");
        MetricTableImporter::from_reader(Cursor::new(csv), &Taxonomy::standard())
    }

    #[test]
    fn groups_rows_by_entity_and_attaches_cuisine() {
        let entities = import(
            "Katsu Curry,dish,Orders Per Zone,42,snowflake,2026-07-01\n\
             Katsu Curry,dish,Avg Rating,4.6,snowflake,2026-07-01\n\
             Katsu Curry,dish,Latent Demand,87,survey,2026-06-12\n\
             Camden,zone,Orders Per Zone,1210,snowflake,2026-07-01\n",
        )
        .expect("import succeeds");

        assert_eq!(entities.len(), 2);

        let katsu = entities
            .iter()
            .find(|entity| entity.entity.as_str() == "katsu curry")
            .expect("katsu grouped");
        assert_eq!(katsu.kind, EntityKind::Dish);
        assert_eq!(katsu.cuisine.as_deref(), Some("japanese"));
        assert_eq!(katsu.metrics.len(), 3);
        assert_eq!(katsu.raw_value("orders_per_zone"), Some(42.0));
        assert_eq!(
            katsu.metrics["latent_demand"].source,
            MetricSource::Survey
        );

        let camden = entities
            .iter()
            .find(|entity| entity.entity.as_str() == "camden")
            .expect("camden grouped");
        assert_eq!(camden.kind, EntityKind::Zone);
        assert_eq!(camden.cuisine, None);
    }

    #[test]
    fn duplicate_rows_keep_the_first_observation() {
        let entities = import(
            "Pad Thai,dish,Orders Per Zone,30,snowflake,\n\
             Pad Thai,dish,Orders Per Zone,99,snowflake,\n",
        )
        .expect("import succeeds");

        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].raw_value("orders_per_zone"), Some(30.0));
    }

    #[test]
    fn empty_values_stay_missing_rather_than_zero() {
        let entities = import("Pad Thai,dish,Kids Happy Rate,,survey,\n").expect("import succeeds");

        let metric = &entities[0].metrics["kids_happy_rate"];
        assert_eq!(metric.value, None);
        assert_eq!(metric.source, MetricSource::Survey);
    }

    #[test]
    fn unknown_kinds_and_sources_fail_with_row_numbers() {
        match import("Pad Thai,restaurant,Orders Per Zone,30,snowflake,\n") {
            Err(MetricTableImportError::UnknownKind { row, value }) => {
                assert_eq!(row, 1);
                assert_eq!(value, "restaurant");
            }
            other => panic!("expected unknown kind error, got {other:?}"),
        }

        match import(
            "Pad Thai,dish,Orders Per Zone,30,snowflake,\n\
             Pad Thai,dish,Avg Rating,4.2,dashboard,\n",
        ) {
            Err(MetricTableImportError::UnknownSource { row, value }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "dashboard");
            }
            other => panic!("expected unknown source error, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_values_fail_rather_than_silently_dropping() {
        match import("Pad Thai,dish,Orders Per Zone,lots,snowflake,\n") {
            Err(MetricTableImportError::InvalidValue { row, value }) => {
                assert_eq!(row, 1);
                assert_eq!(value, "lots");
            }
            other => panic!("expected invalid value error, got {other:?}"),
        }
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = MetricTableImporter::from_path("./does-not-exist.csv", &Taxonomy::standard())
            .expect_err("expected io error");

        match error {
            MetricTableImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn date_parsing_accepts_rfc3339_and_plain_dates() {
        use chrono::NaiveDate;

        assert_eq!(
            super::parser::parse_date_for_tests("2026-07-01T10:00:00Z"),
            NaiveDate::from_ymd_opt(2026, 7, 1)
        );
        assert_eq!(
            super::parser::parse_date_for_tests("2026-07-01"),
            NaiveDate::from_ymd_opt(2026, 7, 1)
        );
        assert_eq!(super::parser::parse_date_for_tests("not-a-date"), None);
        assert_eq!(super::parser::metric_key_for_tests(" Orders  Per Zone "), "orders_per_zone");
    }
}
