//! Integration tests for configuration/schema validation.

use visualsql::models::{
    Filter, FilterOp, Join, JoinType, QueryAction, QueryConfig, QueryType, SelectedColumn,
};
use visualsql::schema::{ColumnSchema, Schema, TableSchema};
use visualsql::{validate_config, VisualSqlError};

fn shop_schema() -> Schema {
    let column = |name: &str| ColumnSchema {
        name: name.to_string(),
        data_type: "varchar".to_string(),
        pk: false,
    };
    Schema {
        tables: vec![
            TableSchema {
                name: "orders".to_string(),
                columns: vec![column("id"), column("status"), column("customer_id")],
            },
            TableSchema {
                name: "customers".to_string(),
                columns: vec![column("id"), column("name")],
            },
        ],
    }
}

fn base_config() -> QueryConfig {
    QueryConfig {
        selected_table: "orders".to_string(),
        selected_table_alias: "A".to_string(),
        ..QueryConfig::default()
    }
}

fn message(err: VisualSqlError) -> String {
    match err {
        VisualSqlError::Validation(msg) => msg,
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn valid_select_config_passes() {
    let mut config = base_config();
    config.selected_columns.push(SelectedColumn {
        table: "A".to_string(),
        name: "id".to_string(),
        aggregation: Default::default(),
    });
    config.filters.push(Filter {
        id: 1,
        table_alias: "A".to_string(),
        column: "status".to_string(),
        operator: Some(FilterOp::Eq),
        value: "paid".to_string(),
    });
    assert!(validate_config(&config, &shop_schema()).is_ok());
}

#[test]
fn empty_session_is_valid() {
    // No table chosen yet: legal, the compiler answers with a placeholder.
    assert!(validate_config(&QueryConfig::default(), &shop_schema()).is_ok());
}

#[test]
fn action_must_match_query_type() {
    let mut config = base_config();
    config.query_type = QueryType::Dql;
    config.action = QueryAction::Insert;
    let msg = message(validate_config(&config, &shop_schema()).unwrap_err());
    assert!(msg.contains("not valid under DQL"));
}

#[test]
fn unknown_base_table_is_reported() {
    let mut config = base_config();
    config.selected_table = "ghost".to_string();
    let msg = message(validate_config(&config, &shop_schema()).unwrap_err());
    assert!(msg.contains("'ghost' not found"));
}

#[test]
fn join_alias_participates_in_resolution() {
    let mut config = base_config();
    config.joins.push(Join {
        id: 1,
        join_type: JoinType::Inner,
        target_table: "customers".to_string(),
        alias: "c".to_string(),
        on_col1: "customer_id".to_string(),
        on_col2: "id".to_string(),
    });
    config.selected_columns.push(SelectedColumn {
        table: "c".to_string(),
        name: "name".to_string(),
        aggregation: Default::default(),
    });
    assert!(validate_config(&config, &shop_schema()).is_ok());
}

#[test]
fn unresolved_alias_is_reported() {
    let mut config = base_config();
    config.selected_columns.push(SelectedColumn {
        table: "Z".to_string(),
        name: "id".to_string(),
        aggregation: Default::default(),
    });
    let msg = message(validate_config(&config, &shop_schema()).unwrap_err());
    assert!(msg.contains("alias 'Z' does not resolve"));
}

#[test]
fn unknown_column_is_reported() {
    let mut config = base_config();
    config.selected_columns.push(SelectedColumn {
        table: "A".to_string(),
        name: "nonexistent".to_string(),
        aggregation: Default::default(),
    });
    let msg = message(validate_config(&config, &shop_schema()).unwrap_err());
    assert!(msg.contains("'A.nonexistent' not found"));
}

#[test]
fn unknown_join_target_is_reported() {
    let mut config = base_config();
    config.joins.push(Join {
        id: 1,
        join_type: JoinType::Left,
        target_table: "phantoms".to_string(),
        alias: "p".to_string(),
        on_col1: "id".to_string(),
        on_col2: "id".to_string(),
    });
    let msg = message(validate_config(&config, &shop_schema()).unwrap_err());
    assert!(msg.contains("join target 'phantoms' not found"));
}
