//! Tests for the MERGE-based upsert: statement shape, parameter order and
//! key column validation.

mod common;
use common::*;

use std::collections::BTreeMap;

use sinkql_core::statement::{BoundValue, RecordingStatement};
use sinkql_core::{
    DialectError, FieldValue, InsertMode, PrimitiveKind, Schema, SinkRecordField,
    StatementBinder, TableId,
};

#[test]
fn test_upsert_with_keys_and_values() {
    let table = TableId::named("ORDERS");
    let sql = oracle()
        .build_upsert(&table, &columns(&table, &["K1", "K2"]), &columns(&table, &["C1"]))
        .unwrap();
    assert_eq!(
        sql,
        "merge into \"ORDERS\" using (select ? \"K1\", ? \"K2\", ? \"C1\" FROM dual) incoming \
         on(\"ORDERS\".\"K1\"=incoming.\"K1\" and \"ORDERS\".\"K2\"=incoming.\"K2\") \
         when matched then update set \"ORDERS\".\"C1\"=incoming.\"C1\" \
         when not matched then insert(\"ORDERS\".\"C1\",\"ORDERS\".\"K1\",\"ORDERS\".\"K2\") \
         values(incoming.\"C1\",incoming.\"K1\",incoming.\"K2\")"
    );
}

#[test]
fn test_upsert_without_non_key_columns_has_no_update_clause() {
    let table = TableId::named("ORDERS");
    let sql = oracle()
        .build_upsert(&table, &columns(&table, &["K1", "K2"]), &[])
        .unwrap();
    assert!(!sql.contains("when matched"));
    assert!(sql.ends_with(
        " when not matched then insert(\"ORDERS\".\"K1\",\"ORDERS\".\"K2\") values(incoming.\"K1\",incoming.\"K2\")"
    ));
}

#[test]
fn test_upsert_unquoted_with_schema() {
    let table = TableId::new(None, Some("APP"), "ORDERS");
    let sql = oracle_unquoted()
        .build_upsert(&table, &columns(&table, &["ID"]), &columns(&table, &["NOTE"]))
        .unwrap();
    assert_eq!(
        sql,
        "merge into APP.ORDERS using (select ? ID, ? NOTE FROM dual) incoming \
         on(APP.ORDERS.ID=incoming.ID) \
         when matched then update set APP.ORDERS.NOTE=incoming.NOTE \
         when not matched then insert(APP.ORDERS.NOTE,APP.ORDERS.ID) values(incoming.NOTE,incoming.ID)"
    );
}

#[test]
fn test_upsert_requires_key_columns() {
    let table = TableId::named("ORDERS");
    let err = oracle()
        .build_upsert(&table, &[], &columns(&table, &["C1"]))
        .unwrap_err();
    assert!(matches!(err, DialectError::MissingKeyColumns(ref t) if t == "ORDERS"));
    assert!(err.is_permanent());
}

#[test]
fn test_upsert_parameters_bind_keys_then_values() {
    let dialect = oracle_mode(InsertMode::Upsert);
    let keys = [
        SinkRecordField::primary_key("K1", Schema::new(PrimitiveKind::Int32)),
        SinkRecordField::primary_key("K2", Schema::new(PrimitiveKind::String)),
    ];
    let values = [SinkRecordField::new("C1", Schema::new(PrimitiveKind::Int64).optional())];
    let record = BTreeMap::from([
        ("C1".to_string(), FieldValue::Int64(30)),
        ("K2".to_string(), FieldValue::from("b")),
        ("K1".to_string(), FieldValue::Int32(10)),
    ]);

    let mut stmt = RecordingStatement::new();
    let bound = StatementBinder::new(&dialect, &keys, &values)
        .bind_record(&mut stmt, &record)
        .unwrap();
    assert_eq!(bound, 3);
    assert_eq!(
        stmt.binds(),
        &[
            (1, BoundValue::I32(10)),
            (2, BoundValue::String("b".to_string())),
            (3, BoundValue::I64(30)),
        ]
    );
}
