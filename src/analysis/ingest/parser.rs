use std::io::Read;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

use super::normalizer::normalize_name;

/// One long-format row of the metric table, lightly normalized. Kind,
/// source, and value stay raw here so the importer can report row numbers
/// when they fail validation.
#[derive(Debug)]
pub(crate) struct MetricRecord {
    pub(crate) entity: String,
    pub(crate) kind_raw: String,
    pub(crate) metric: String,
    pub(crate) value_raw: Option<String>,
    pub(crate) source_raw: String,
    pub(crate) extracted_on: Option<NaiveDate>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<MetricRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<MetricRow>() {
        let row = record?;
        records.push(MetricRecord {
            entity: normalize_name(&row.entity),
            kind_raw: row.kind,
            metric: metric_key(&row.metric),
            value_raw: row.value,
            source_raw: row.source,
            extracted_on: row.extracted_on.as_deref().and_then(parse_date),
        });
    }

    Ok(records)
}

/// Spreadsheet column labels arrive as "Orders Per Zone"; factor names in
/// the framework are snake_case.
fn metric_key(value: &str) -> String {
    normalize_name(value).replace(' ', "_")
}

#[derive(Debug, Deserialize)]
struct MetricRow {
    #[serde(rename = "Entity")]
    entity: String,
    #[serde(rename = "Kind")]
    kind: String,
    #[serde(rename = "Metric")]
    metric: String,
    #[serde(rename = "Value", default, deserialize_with = "empty_string_as_none")]
    value: Option<String>,
    #[serde(rename = "Source")]
    source: String,
    #[serde(
        rename = "Extracted On",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    extracted_on: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

#[cfg(test)]
pub(crate) fn parse_date_for_tests(value: &str) -> Option<NaiveDate> {
    parse_date(value)
}

#[cfg(test)]
pub(crate) fn metric_key_for_tests(value: &str) -> String {
    metric_key(value)
}
