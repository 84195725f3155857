//! Tests for the session helpers: health check, clock query, synonym
//! resolution, URL sanitizing and registry selection.

mod common;
use common::*;

use sinkql_core::{DialectConfig, DialectError, DriverError};

#[test]
fn test_session_queries() {
    let dialect = oracle();
    assert_eq!(dialect.health_check_query(), "SELECT 1 FROM DUAL");
    assert_eq!(
        dialect.current_timestamp_query(),
        "select CURRENT_TIMESTAMP from dual"
    );
}

#[test]
fn test_connection_validity_runs_health_check() {
    let mut catalog = FakeCatalog::new("app");
    assert!(oracle().is_connection_valid(&mut catalog).unwrap());
    assert_eq!(catalog.queries[0].0, "SELECT 1 FROM DUAL");

    let mut broken = FakeCatalog::new("app").failing(DriverError::new(17008, "Closed Connection"));
    let err = oracle().is_connection_valid(&mut broken).unwrap_err();
    assert!(matches!(err, DialectError::Driver(ref e) if e.vendor_code == 17008));
}

#[test]
fn test_synonym_resolves_with_upper_case_owner_and_name() {
    let mut catalog = FakeCatalog::new("app_user").with_synonym("APP_USER", "ORDERS_SYN", "ORDERS");
    let resolved = oracle()
        .resolve_synonym(&mut catalog, "orders_syn")
        .unwrap();
    assert_eq!(resolved.as_deref(), Some("ORDERS"));

    let (sql, params) = &catalog.queries[0];
    assert_eq!(
        sql,
        "SELECT TABLE_OWNER, TABLE_NAME FROM ALL_SYNONYMS WHERE OWNER = ? AND SYNONYM_NAME = ?"
    );
    assert_eq!(params, &vec!["APP_USER".to_string(), "ORDERS_SYN".to_string()]);
}

#[test]
fn test_synonym_lookup_uses_table_part_of_qualified_name() {
    let mut catalog = FakeCatalog::new("APP").with_synonym("APP", "ORDERS_SYN", "ORDERS");
    let resolved = oracle()
        .resolve_synonym(&mut catalog, "\"OTHER\".\"orders_syn\"")
        .unwrap();
    assert_eq!(resolved.as_deref(), Some("ORDERS"));
}

#[test]
fn test_synonym_lookup_rejects_malformed_name_before_querying() {
    let mut catalog = FakeCatalog::new("APP").with_synonym("APP", "ORDERS", "ORDERS_T");
    let err = oracle()
        .resolve_synonym(&mut catalog, "\"app\"orders")
        .unwrap_err();
    assert!(matches!(err, DialectError::InvalidIdentifier(ref s) if s == "\"app\"orders"));
    assert!(catalog.queries.is_empty());
}

#[test]
fn test_synonym_lookup_reads_escaped_quotes() {
    let mut catalog = FakeCatalog::new("APP").with_synonym("APP", "A\"SYN", "ORDERS");
    let resolved = oracle()
        .resolve_synonym(&mut catalog, "\"a\"\"syn\"")
        .unwrap();
    assert_eq!(resolved.as_deref(), Some("ORDERS"));
    assert_eq!(catalog.queries[0].1[1], "A\"SYN");
}

#[test]
fn test_missing_synonym_is_none() {
    let mut catalog = FakeCatalog::new("APP");
    let resolved = oracle().resolve_synonym(&mut catalog, "NOPE").unwrap();
    assert!(resolved.is_none());
}

#[test]
fn test_synonym_lookup_driver_error_propagates() {
    let mut catalog =
        FakeCatalog::new("APP").failing(DriverError::new(1017, "invalid username/password"));
    let err = oracle().resolve_synonym(&mut catalog, "ORDERS").unwrap_err();
    assert!(!err.is_permanent());
}

#[test]
fn test_sanitize_masks_password_in_several_shapes() {
    let dialect = oracle();
    let cases = [
        (
            "jdbc:oracle:thin:scott/tiger@//db:1521/svc",
            "jdbc:oracle:thin:scott/****@//db:1521/svc",
        ),
        (
            "jdbc:oracle:oci:scott/tiger@svc",
            "jdbc:oracle:oci:scott/****@svc",
        ),
        (
            "jdbc:oracle:thin:@db:1521/svc?user=scott&password=tiger",
            "jdbc:oracle:thin:@db:1521/svc?user=scott&password=****",
        ),
    ];
    for (url, expected) in cases {
        let once = dialect.sanitize_url(url);
        assert_eq!(once, expected);
        assert!(once.contains("scott"));
        assert_eq!(dialect.sanitize_url(&once), once);
    }
}

#[test]
fn test_registry_picks_oracle_for_oracle_urls() {
    let registry = sinkql_oracle::registry();
    let dialect = registry
        .find_best_for("jdbc:oracle:thin:@host:1521/svc", DialectConfig::default())
        .unwrap();
    assert_eq!(dialect.name(), "oracle");

    let dialect = registry
        .find_best_for("jdbc:db2://host:50000/app", DialectConfig::default())
        .unwrap();
    assert_eq!(dialect.name(), "generic");
}

#[test]
fn test_registry_reads_json_config() {
    let config = DialectConfig::from_json_str(
        r#"{"quote.sql.identifiers": "never", "insert.mode": "upsert"}"#,
    )
    .unwrap();
    let dialect = sinkql_oracle::registry()
        .find_best_for("oracle:thin:@host:1521/svc", config)
        .unwrap();
    assert_eq!(dialect.quote("orders"), "orders");
    assert_eq!(
        dialect.parse_table_identifier("app.orders").unwrap().table,
        "ORDERS"
    );
}
