use tests::*;

use keel::Support;
use pretty_assertions::assert_eq;

#[derive(Debug, Default, keel::Entity)]
#[entity("no_id")]
struct NoId {
    #[column]
    name: String,
}

#[derive(Debug, Default, keel::Entity)]
#[entity("two_ids")]
struct TwoIds {
    #[id]
    #[column]
    a: i64,

    #[id]
    #[column]
    b: i64,
}

#[derive(Debug, Default, keel::Entity)]
#[entity("bare_id")]
struct BareId {
    #[id]
    id: i64,
}

#[derive(Debug, Default, keel::Entity)]
#[entity("clashing")]
struct Clashing {
    #[id]
    #[column]
    id: i64,

    #[column("label")]
    first: String,

    #[column("LABEL")]
    second: String,
}

#[derive(Debug, Default, keel::Entity)]
#[entity("indexed")]
#[index(unique, columns("code"))]
struct Indexed {
    #[id]
    #[column]
    id: i64,

    #[column]
    #[index]
    code: String,

    #[column(raw_type = "VARCHAR(12)")]
    sku: String,
}

fn malformed_entities_fail_at_connect(s: impl Setup) {
    let err = s.connect(models!(NoId)).unwrap_err();
    assert!(err.is_invalid_entity_definition());

    let err = s.connect(models!(TwoIds)).unwrap_err();
    assert!(err.is_invalid_entity_definition());

    let err = s.connect(models!(BareId)).unwrap_err();
    assert!(err.is_invalid_entity_definition());

    let err = s.connect(models!(Clashing)).unwrap_err();
    assert!(err.is_invalid_entity_definition());
}

fn unregistered_entities_fail_on_first_use(s: impl Setup) {
    let db = s.setup(models!());
    let err = db.repository::<NoId>().unwrap_err();
    assert!(err.is_invalid_entity_definition());

    // The failure is cached.
    assert!(db.repository::<NoId>().is_err());
}

fn index_names_are_derived(s: impl Setup) {
    let db = s.setup(models!(Indexed));
    let indexed = db.repository::<Indexed>().unwrap();

    let names: Vec<_> = indexed
        .metadata()
        .indexes()
        .iter()
        .map(|index| index.name.as_str())
        .collect();
    assert_eq!(names, ["idx_indexed", "idx_indexed_code"]);

    indexed.create_table_if_not_exists().unwrap();
    indexed.create_table_if_not_exists().unwrap();
}

fn capabilities_match_the_backend(s: impl Setup) {
    let db = s.setup(models!());

    assert!(db.supports(Support::Query));
    assert!(db.supports(Support::WrappedAsync));
    assert!(!db.supports(Support::Async));
    assert_eq!(db.supports(Support::Transaction), s.capability().transactions);
    assert_eq!(db.supports(Support::Migration), s.capability().migrations);
    assert_eq!(db.capability(), s.capability());
}

fn unknown_urls_are_rejected(_s: impl Setup) {
    let err = keel::Db::builder().connect("mongodb://localhost").unwrap_err();
    assert!(err.is_invalid_connection_url());
}

tests!(
    malformed_entities_fail_at_connect,
    unregistered_entities_fail_on_first_use,
    index_names_are_derived,
    capabilities_match_the_backend,
    unknown_urls_are_rejected,
);
