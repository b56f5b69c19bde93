//! Compile -> parse -> compile stability for the statement family the
//! parser supports. Round-tripping is NOT a general invariant of the
//! system; these tests pin it down only for the shapes the compiler
//! emits without aggregates, joins, or trailing clauses, which is
//! exactly what the "edit SQL, then sync back" flow relies on.

use visualsql::models::{Filter, FilterOp, QueryConfig, SelectedColumn};
use visualsql::schema::{ColumnSchema, Schema, TableSchema};
use visualsql::{compile_config_to_sql, parse_sql_to_config};

fn orders_schema() -> Schema {
    Schema {
        tables: vec![TableSchema {
            name: "orders".to_string(),
            columns: vec![
                ColumnSchema {
                    name: "id".to_string(),
                    data_type: "int".to_string(),
                    pk: true,
                },
                ColumnSchema {
                    name: "status".to_string(),
                    data_type: "varchar".to_string(),
                    pk: false,
                },
            ],
        }],
    }
}

#[test]
fn simple_select_is_stable_through_the_loop() {
    let schema = orders_schema();
    let mut config = QueryConfig {
        selected_table: "orders".to_string(),
        selected_table_alias: "A".to_string(),
        ..QueryConfig::default()
    };
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

    let sql = compile_config_to_sql(&config, "mysql");
    let recovered = parse_sql_to_config(&sql, &schema, "mysql")
        .expect("compiler output should be parseable");
    let resynced = compile_config_to_sql(&recovered, "mysql");
    assert_eq!(sql, resynced);
}

#[test]
fn select_star_is_stable_modulo_column_expansion() {
    let schema = orders_schema();
    let config = QueryConfig {
        selected_table: "orders".to_string(),
        selected_table_alias: "A".to_string(),
        ..QueryConfig::default()
    };

    let sql = compile_config_to_sql(&config, "mysql");
    assert_eq!(sql, "SELECT *\nFROM `orders` AS `A`;");

    // `*` comes back as the explicit schema column list, which then
    // compiles to an equivalent (not identical) statement.
    let recovered = parse_sql_to_config(&sql, &schema, "mysql").unwrap();
    assert_eq!(recovered.selected_columns.len(), 2);
    let resynced = compile_config_to_sql(&recovered, "mysql");
    assert_eq!(
        resynced,
        "SELECT `A`.`id`, `A`.`status`\nFROM `orders` AS `A`;"
    );
}

#[test]
fn parser_refuses_rather_than_corrupts_on_unsupported_sql() {
    let schema = orders_schema();
    // Subquery: the parenthesis is not a readable table identifier,
    // so the sync fails cleanly instead of producing a wrong config.
    let sql = "SELECT * FROM (SELECT id FROM orders) AS sub";
    assert!(parse_sql_to_config(sql, &schema, "mysql").is_none());
}
