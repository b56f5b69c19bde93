//! Consistency checks between a configuration and the introspected
//! schema, for callers that don't get the UI's producer-side
//! guarantees (e.g. configs recovered from snapshots or built
//! programmatically). The compiler never runs these; it stays total.

use std::collections::HashMap;

use crate::error::{Result, VisualSqlError};
use crate::models::{QueryAction, QueryConfig};
use crate::schema::{Schema, TableSchema};

pub fn validate_config(config: &QueryConfig, schema: &Schema) -> Result<()> {
    let mut problems = Vec::new();

    if !config.query_type.actions().contains(&config.action) {
        problems.push(format!(
            "action {} is not valid under {}",
            config.action,
            config.query_type.label()
        ));
    }

    // An empty base table is a legitimate just-started session; the
    // compiler answers it with a placeholder. Only a non-empty name
    // that the schema doesn't know is a problem.
    let base_table = if config.selected_table.is_empty() {
        None
    } else {
        let found = schema.find_table(&config.selected_table);
        if found.is_none() {
            problems.push(format!(
                "table '{}' not found in schema",
                config.selected_table
            ));
        }
        found
    };

    for join in &config.joins {
        if !join.target_table.is_empty() && schema.find_table(&join.target_table).is_none() {
            problems.push(format!(
                "join target '{}' not found in schema",
                join.target_table
            ));
        }
    }

    if config.action == QueryAction::Select {
        check_alias_references(config, schema, base_table, &mut problems);
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(VisualSqlError::Validation(problems.join("; ")))
    }
}

/// Column references in a SELECT use the alias namespace: every
/// referenced alias must be the base alias or a join alias, and the
/// column must exist on the table behind it.
fn check_alias_references(
    config: &QueryConfig,
    schema: &Schema,
    base_table: Option<&TableSchema>,
    problems: &mut Vec<String>,
) {
    let mut alias_map: HashMap<&str, Option<&TableSchema>> = HashMap::new();
    if base_table.is_some() || !config.selected_table.is_empty() {
        alias_map.insert(config.base_alias(), base_table);
    }
    for join in &config.joins {
        alias_map.insert(join.effective_alias(), schema.find_table(&join.target_table));
    }

    let mut refs: Vec<(&str, &str)> = Vec::new();
    for col in &config.selected_columns {
        refs.push((&col.table, &col.name));
    }
    for filter in &config.filters {
        if !filter.table_alias.is_empty() && !filter.column.is_empty() {
            refs.push((&filter.table_alias, &filter.column));
        }
    }
    for group in &config.group_by {
        refs.push((&group.alias, &group.column));
    }
    for having in &config.having {
        if !having.table_alias.is_empty() && !having.column.is_empty() {
            refs.push((&having.table_alias, &having.column));
        }
    }
    if !config.order_by.column.is_empty() {
        refs.push((&config.order_by.table_alias, &config.order_by.column));
    }

    for (alias, column) in refs {
        match alias_map.get(alias) {
            None => problems.push(format!(
                "alias '{alias}' does not resolve to the base table or a join"
            )),
            Some(Some(table)) => {
                if table.find_column(column).is_none() {
                    problems.push(format!(
                        "column '{alias}.{column}' not found on table '{}'",
                        table.name
                    ));
                }
            }
            // Alias known but its table is missing from the schema;
            // already reported above.
            Some(None) => {}
        }
    }
}
