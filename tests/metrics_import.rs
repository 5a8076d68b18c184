use dinneroo_insights::analysis::{
    EntityKind, MetricTableImportError, MetricTableImporter, Taxonomy,
};
use std::io::Cursor;

const HEADER: &str = "Entity,Kind,Metric,Value,Source,Extracted On\n";

#[test]
fn import_groups_mixed_entity_kinds() {
    let csv = format!(
        "{HEADER}\
Katsu Curry,dish,Orders Per Zone,42,snowflake,2026-07-01\n\
Camden,zone,Orders Per Zone,1210,snowflake,2026-07-01\n\
japanese,cuisine,Latent Demand,88,survey,2026-06-12\n\
Tokyo Kitchen,partner,Avg Rating,4.5,snowflake,2026-07-01\n"
    );

    let entities = MetricTableImporter::from_reader(Cursor::new(csv), &Taxonomy::standard())
        .expect("import succeeds");

    assert_eq!(entities.len(), 4);
    let kinds: Vec<EntityKind> = entities.iter().map(|entity| entity.kind).collect();
    assert!(kinds.contains(&EntityKind::Dish));
    assert!(kinds.contains(&EntityKind::Zone));
    assert!(kinds.contains(&EntityKind::Cuisine));
    assert!(kinds.contains(&EntityKind::Partner));
}

#[test]
fn custom_taxonomy_overrides_the_cuisine_rollup() {
    let taxonomy =
        Taxonomy::from_reader(r#"{"Katsu Curry": "japanese curry"}"#.as_bytes())
            .expect("taxonomy parses");
    let csv = format!("{HEADER}Katsu Curry,dish,Orders Per Zone,42,snowflake,\n");

    let entities = MetricTableImporter::from_reader(Cursor::new(csv), &taxonomy)
        .expect("import succeeds");

    assert_eq!(entities[0].cuisine.as_deref(), Some("japanese curry"));
}

#[test]
fn messy_spreadsheet_names_are_normalized_before_grouping() {
    let csv = format!(
        "{HEADER}\
\u{feff}Katsu  Curry,dish,Orders Per Zone,42,snowflake,\n\
KATSU CURRY,dish,Avg Rating,4.6,snowflake,\n"
    );

    let entities = MetricTableImporter::from_reader(Cursor::new(csv), &Taxonomy::standard())
        .expect("import succeeds");

    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].entity.as_str(), "katsu curry");
    assert_eq!(entities[0].metrics.len(), 2);
}

#[test]
fn import_fails_fast_on_unrecognized_rows() {
    let unknown_kind = format!("{HEADER}Katsu Curry,franchise,Orders Per Zone,42,snowflake,\n");
    match MetricTableImporter::from_reader(Cursor::new(unknown_kind), &Taxonomy::standard()) {
        Err(MetricTableImportError::UnknownKind { row, value }) => {
            assert_eq!(row, 1);
            assert_eq!(value, "franchise");
        }
        other => panic!("expected unknown kind error, got {other:?}"),
    }

    let bad_number = format!("{HEADER}Katsu Curry,dish,Orders Per Zone,n/a,snowflake,\n");
    match MetricTableImporter::from_reader(Cursor::new(bad_number), &Taxonomy::standard()) {
        Err(MetricTableImportError::InvalidValue { row, value }) => {
            assert_eq!(row, 1);
            assert_eq!(value, "n/a");
        }
        other => panic!("expected invalid value error, got {other:?}"),
    }
}
