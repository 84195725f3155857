//! End-to-end tests for the generic dialect: configuration, identifier
//! parsing, DDL/DML text and record binding.

use std::collections::BTreeMap;

use sinkql_core::dialect::{DropOptions, GenericDialect};
use sinkql_core::statement::{BoundValue, RecordingStatement};
use sinkql_core::{
    ColumnId, DialectConfig, DialectError, DialectRegistry, FieldValue, InsertMode, PrimitiveKind,
    QuoteMethod, Schema, SinkRecordField, StatementBinder, TableId,
};

fn fields() -> (Vec<SinkRecordField>, Vec<SinkRecordField>) {
    (
        vec![SinkRecordField::primary_key("id", Schema::new(PrimitiveKind::Int32))],
        vec![
            SinkRecordField::new("name", Schema::new(PrimitiveKind::String)),
            SinkRecordField::new("raw", Schema::new(PrimitiveKind::Bytes).optional()),
        ],
    )
}

#[test]
fn test_config_drives_quoting() {
    let config = DialectConfig::from_json_str(r#"{"quote.sql.identifiers": "never"}"#).unwrap();
    let dialect = GenericDialect::create(config);
    let table = dialect.parse_table_identifier("inventory.items").unwrap();
    assert_eq!(table, TableId::new(None, Some("inventory"), "items"));
    assert_eq!(
        dialect.build_drop_table(&table, DropOptions::new()),
        "DROP TABLE inventory.items"
    );
}

#[test]
fn test_quoted_identifier_with_separator() {
    let dialect = GenericDialect::create(DialectConfig::default());
    let table = dialect
        .parse_table_identifier("\"my.catalog\".public.\"Items\"")
        .unwrap();
    assert_eq!(table.catalog.as_deref(), Some("my.catalog"));
    assert_eq!(table.schema.as_deref(), Some("public"));
    assert_eq!(table.table, "Items");
    assert_eq!(
        dialect.policy().quote_table(&table),
        "\"my.catalog\".\"public\".\"Items\""
    );
}

#[test]
fn test_too_many_name_parts() {
    let dialect = GenericDialect::create(DialectConfig::default());
    let err = dialect.parse_table_identifier("a.b.c.d").unwrap_err();
    assert!(matches!(err, DialectError::InvalidIdentifier(ref s) if s == "a.b.c.d"));
}

#[test]
fn test_insert_statement_and_record_bind_agree() {
    let dialect = GenericDialect::create(DialectConfig {
        quote_identifiers: QuoteMethod::Always,
        sink: None,
    });
    let table = TableId::named("items");
    let (keys, others) = fields();
    let key_ids: Vec<ColumnId> = keys.iter().map(|f| ColumnId::new(&table, &f.name)).collect();
    let other_ids: Vec<ColumnId> = others.iter().map(|f| ColumnId::new(&table, &f.name)).collect();

    assert_eq!(
        dialect.build_insert(&table, &key_ids, &other_ids),
        "INSERT INTO \"items\"(\"id\",\"name\",\"raw\") VALUES(?,?,?)"
    );

    let record = BTreeMap::from([
        ("id".to_string(), FieldValue::Int32(1)),
        ("name".to_string(), FieldValue::from("widget")),
        ("raw".to_string(), FieldValue::Buffer(bytes::Bytes::from_static(b"\x01\x02"))),
    ]);
    let mut stmt = RecordingStatement::new();
    let count = StatementBinder::new(&dialect, &keys, &others)
        .bind_record(&mut stmt, &record)
        .unwrap();
    assert_eq!(count, 3);
    assert_eq!(
        stmt.binds(),
        &[
            (1, BoundValue::I32(1)),
            (2, BoundValue::String("widget".to_string())),
            (3, BoundValue::Bytes(vec![1, 2])),
        ]
    );
}

#[test]
fn test_update_statement_and_record_bind_agree() {
    let dialect = GenericDialect::create(DialectConfig::default());
    let table = TableId::named("items");
    let (keys, others) = fields();

    assert_eq!(
        dialect.build_update(
            &table,
            &[ColumnId::new(&table, "id")],
            &[ColumnId::new(&table, "name"), ColumnId::new(&table, "raw")],
        ),
        "UPDATE \"items\" SET \"name\" = ?, \"raw\" = ? WHERE \"id\" = ?"
    );

    let record = BTreeMap::from([
        ("id".to_string(), FieldValue::Int32(1)),
        ("name".to_string(), FieldValue::from("widget")),
    ]);
    let mut stmt = RecordingStatement::new();
    StatementBinder::new(&dialect, &keys, &others)
        .insert_mode(InsertMode::Update)
        .bind_record(&mut stmt, &record)
        .unwrap();
    assert_eq!(stmt.get(3), Some(&BoundValue::I32(1)));
    assert!(matches!(stmt.get(2), Some(BoundValue::Null(_))));
}

#[test]
fn test_registry_without_vendors_uses_generic() {
    let registry = DialectRegistry::new();
    let dialect = registry
        .find_best_for(
            "jdbc:postgresql://db/app?user=u&password=p",
            DialectConfig::default(),
        )
        .unwrap();
    assert_eq!(dialect.name(), "generic");
    assert_eq!(
        dialect.sanitize_url("jdbc:postgresql://db/app?user=u&password=p"),
        "jdbc:postgresql://db/app?user=u&password=****"
    );

    let err = registry
        .find_best_for("not a url", DialectConfig::default())
        .unwrap_err();
    assert!(matches!(err, DialectError::InvalidUrl(_)));
}
