//! Deterministic compilation from a [`QueryConfig`] to SQL text.
//!
//! `compile` is total: unresolvable states come back as a SQL comment
//! placeholder, never an error, so the editor always has renderable
//! text. Dispatch is on the `(queryType, action)` pair; anything
//! unmapped yields a fixed "not implemented" comment.

use crate::dialect::Dialect;
use crate::models::{
    Aggregation, AlterKind, ColumnConstraint, NewColumn, QueryAction, QueryConfig, QueryType,
};

pub struct SqlCompiler {
    escape_literals: bool,
}

impl Default for SqlCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlCompiler {
    /// Compiler in behavioral-compat mode: literal values are
    /// interpolated verbatim, embedded quotes and all.
    pub fn new() -> Self {
        Self {
            escape_literals: false,
        }
    }

    /// Opt-in safer mode that doubles embedded single quotes in
    /// literals. Changes emitted SQL text, so it is never the default.
    pub fn with_escaped_literals(mut self) -> Self {
        self.escape_literals = true;
        self
    }

    pub fn compile(&self, config: &QueryConfig, dialect: &dyn Dialect) -> String {
        let sql = match (config.query_type, config.action) {
            (QueryType::Dql, QueryAction::Select) => self.select_sql(config, dialect),
            (QueryType::Dml, QueryAction::Insert) => self.insert_sql(config, dialect),
            (QueryType::Dml, QueryAction::Update) => self.update_sql(config, dialect),
            (QueryType::Dml, QueryAction::Delete) => self.delete_sql(config, dialect),
            (QueryType::Ddl, QueryAction::CreateTable) => self.create_table_sql(config, dialect),
            (QueryType::Ddl, QueryAction::AlterTable) => self.alter_table_sql(config, dialect),
            (QueryType::Ddl, QueryAction::DropTable) => self.drop_table_sql(config, dialect),
            (QueryType::Ddl, QueryAction::TruncateTable) => {
                self.truncate_table_sql(config, dialect)
            }
            (QueryType::Tcl, QueryAction::StartTransaction) => "START TRANSACTION;".to_string(),
            (QueryType::Tcl, QueryAction::Commit) => "COMMIT;".to_string(),
            (QueryType::Tcl, QueryAction::Rollback) => "ROLLBACK;".to_string(),
            (QueryType::Dcl, QueryAction::Grant) | (QueryType::Dcl, QueryAction::Revoke) => {
                "-- DCL commands are not typically run from an application. This is an administrative task."
                    .to_string()
            }
            _ => "-- Visual builder not implemented for this action yet.".to_string(),
        };
        tracing::trace!(engine = dialect.name(), sql = %sql, "compiled configuration");
        sql
    }

    fn literal(&self, dialect: &dyn Dialect, raw: &str) -> String {
        if self.escape_literals {
            dialect.escape_literal(raw)
        } else {
            dialect.quote_literal(raw)
        }
    }

    fn select_sql(&self, config: &QueryConfig, d: &dyn Dialect) -> String {
        if config.selected_table.is_empty() {
            return "-- Select a table to begin".to_string();
        }
        let base_alias = config.base_alias();

        let columns = if config.selected_columns.is_empty() {
            "*".to_string()
        } else {
            config
                .selected_columns
                .iter()
                .map(|c| {
                    let col = qualified(d, &c.table, &c.name);
                    match c.aggregation {
                        Aggregation::None => col,
                        agg => format!(
                            "{}({col}) AS {}",
                            agg.keyword(),
                            d.quote_ident(&agg.output_alias(&c.name))
                        ),
                    }
                })
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut sql = format!(
            "SELECT {columns}\nFROM {} AS {}",
            d.quote_ident(&config.selected_table),
            d.quote_ident(base_alias)
        );

        for join in &config.joins {
            let join_alias = join.effective_alias();
            sql.push_str(&format!(
                "\n{} {} AS {} ON {} = {}",
                join.join_type.keyword(),
                d.quote_ident(&join.target_table),
                d.quote_ident(join_alias),
                qualified(d, base_alias, &join.on_col1),
                qualified(d, join_alias, &join.on_col2)
            ));
        }

        if !config.filters.is_empty() {
            let clauses: Vec<String> = config
                .filters
                .iter()
                .filter_map(|f| {
                    let op = f.operator?;
                    if f.table_alias.is_empty() || f.column.is_empty() || f.value.is_empty() {
                        return None;
                    }
                    Some(format!(
                        "{} {} {}",
                        qualified(d, &f.table_alias, &f.column),
                        op.as_sql(),
                        self.literal(d, &f.value)
                    ))
                })
                .collect();
            if !clauses.is_empty() {
                sql.push_str(&format!("\nWHERE {}", clauses.join(" AND ")));
            }
        }

        if !config.group_by.is_empty() {
            let groups: Vec<String> = config
                .group_by
                .iter()
                .map(|g| qualified(d, &g.alias, &g.column))
                .collect();
            sql.push_str(&format!("\nGROUP BY {}", groups.join(", ")));
        }

        if !config.having.is_empty() {
            let clauses: Vec<String> = config
                .having
                .iter()
                .filter_map(|h| {
                    let op = h.operator?;
                    if h.table_alias.is_empty()
                        || h.column.is_empty()
                        || h.value.is_empty()
                        || h.aggregation == Aggregation::None
                    {
                        return None;
                    }
                    // References the aggregation's output alias, not the column.
                    Some(format!(
                        "{} {} {}",
                        d.quote_ident(&h.aggregation.output_alias(&h.column)),
                        op.as_sql(),
                        self.literal(d, &h.value)
                    ))
                })
                .collect();
            if !clauses.is_empty() {
                sql.push_str(&format!("\nHAVING {}", clauses.join(" AND ")));
            }
        }

        if !config.order_by.column.is_empty() {
            let col = match config.order_by.aggregation {
                Aggregation::None => {
                    qualified(d, &config.order_by.table_alias, &config.order_by.column)
                }
                agg => d.quote_ident(&agg.output_alias(&config.order_by.column)),
            };
            sql.push_str(&format!(
                "\nORDER BY {col} {}",
                config.order_by.direction.keyword()
            ));
        }

        if !config.limit.is_empty() {
            sql.push_str(&format!("\nLIMIT {}", config.limit));
        }

        sql.push(';');
        sql
    }

    fn insert_sql(&self, config: &QueryConfig, d: &dyn Dialect) -> String {
        if config.selected_table.is_empty() {
            return "-- Select a table to insert into".to_string();
        }
        let populated: Vec<(&String, &String)> =
            config.values.iter().filter(|(_, v)| !v.is_empty()).collect();
        if populated.is_empty() {
            return "-- Fill in values...".to_string();
        }
        let names: Vec<String> = populated.iter().map(|(k, _)| d.quote_ident(k)).collect();
        let literals: Vec<String> = populated
            .iter()
            .map(|(_, v)| self.literal(d, v))
            .collect();
        format!(
            "INSERT INTO {} ({})\nVALUES ({});",
            d.quote_ident(&config.selected_table),
            names.join(", "),
            literals.join(", ")
        )
    }

    fn update_sql(&self, config: &QueryConfig, d: &dyn Dialect) -> String {
        if config.selected_table.is_empty() {
            return "-- Select a table to update".to_string();
        }
        let sets: Vec<String> = config
            .values
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| format!("{} = {}", d.quote_ident(k), self.literal(d, v)))
            .collect();
        if sets.is_empty() {
            return "-- Specify values to update...".to_string();
        }
        let mut sql = format!(
            "UPDATE {}\nSET {}",
            d.quote_ident(&config.selected_table),
            sets.join(", ")
        );
        self.push_dml_where(&mut sql, config, d, "updating");
        sql.push(';');
        sql
    }

    fn delete_sql(&self, config: &QueryConfig, d: &dyn Dialect) -> String {
        if config.selected_table.is_empty() {
            return "-- Select a table to delete from".to_string();
        }
        let mut sql = format!("DELETE FROM {}", d.quote_ident(&config.selected_table));
        self.push_dml_where(&mut sql, config, d, "deleting");
        sql.push(';');
        sql
    }

    /// DML WHERE clauses reference bare column names; the statement
    /// targets the base table directly. An empty filter list gets a
    /// warning comment embedded in the SQL text, and the unguarded
    /// statement is still emitted (warn, don't block). A non-empty
    /// list whose entries are all incomplete emits neither.
    fn push_dml_where(&self, sql: &mut String, config: &QueryConfig, d: &dyn Dialect, verb: &str) {
        if config.filters.is_empty() {
            sql.push_str(&format!(
                "\n-- WARNING: Add a WHERE clause to avoid {verb} all rows!"
            ));
            return;
        }
        let clauses: Vec<String> = config
            .filters
            .iter()
            .filter_map(|f| {
                let op = f.operator?;
                if f.column.is_empty() || f.value.is_empty() {
                    return None;
                }
                Some(format!(
                    "{} {} {}",
                    d.quote_ident(&f.column),
                    op.as_sql(),
                    self.literal(d, &f.value)
                ))
            })
            .collect();
        if !clauses.is_empty() {
            sql.push_str(&format!("\nWHERE {}", clauses.join(" AND ")));
        }
    }

    fn create_table_sql(&self, config: &QueryConfig, d: &dyn Dialect) -> String {
        if config.new_table_name.trim().is_empty() {
            return "-- Enter a table name".to_string();
        }
        let valid: Vec<&NewColumn> = config
            .new_columns
            .iter()
            .filter(|c| !c.name.trim().is_empty() && !c.col_type.trim().is_empty())
            .collect();
        if valid.is_empty() {
            return "-- Add at least one column...".to_string();
        }
        let defs: Vec<String> = valid
            .iter()
            .map(|c| {
                let mut def = format!("{} {}", d.quote_ident(&c.name), c.col_type);
                match c.constraint {
                    ColumnConstraint::PrimaryKey => def.push_str(" PRIMARY KEY"),
                    ColumnConstraint::NotNull => def.push_str(" NOT NULL"),
                    ColumnConstraint::None => {}
                }
                def
            })
            .collect();
        format!(
            "CREATE TABLE {} (\n  {}\n);",
            d.quote_ident(&config.new_table_name),
            defs.join(",\n  ")
        )
    }

    fn alter_table_sql(&self, config: &QueryConfig, d: &dyn Dialect) -> String {
        if config.selected_table.is_empty() {
            return "-- Select a table to alter".to_string();
        }
        match config.alter_kind {
            AlterKind::RenameTable => {
                if config.rename_to.trim().is_empty() {
                    return "-- Enter the new name...".to_string();
                }
                format!(
                    "ALTER TABLE {}\nRENAME TO {};",
                    d.quote_ident(&config.selected_table),
                    d.quote_ident(&config.rename_to)
                )
            }
            AlterKind::AddColumn => {
                if config.add_column.name.trim().is_empty() {
                    return "-- Enter a name for the new column".to_string();
                }
                format!(
                    "ALTER TABLE {}\nADD COLUMN {} {};",
                    d.quote_ident(&config.selected_table),
                    d.quote_ident(&config.add_column.name),
                    config.add_column.col_type
                )
            }
            AlterKind::DropColumn => {
                if config.drop_column.is_empty() {
                    return "-- Select a column to drop".to_string();
                }
                format!(
                    "ALTER TABLE {}\nDROP COLUMN {};",
                    d.quote_ident(&config.selected_table),
                    d.quote_ident(&config.drop_column)
                )
            }
        }
    }

    /// Destructive statements require the user to re-type the table
    /// name (`new_table_name`) exactly; a mismatch hard-blocks with a
    /// placeholder instead of emitting.
    fn drop_table_sql(&self, config: &QueryConfig, d: &dyn Dialect) -> String {
        if config.new_table_name.trim().is_empty() {
            return "-- Select a table and confirm its name...".to_string();
        }
        if config.selected_table != config.new_table_name {
            return "-- Confirmation failed...".to_string();
        }
        format!("DROP TABLE {};", d.quote_ident(&config.selected_table))
    }

    fn truncate_table_sql(&self, config: &QueryConfig, d: &dyn Dialect) -> String {
        if config.new_table_name.trim().is_empty() {
            return "-- Select a table and confirm its name".to_string();
        }
        if config.selected_table != config.new_table_name {
            return "-- Confirmation failed...".to_string();
        }
        format!("TRUNCATE TABLE {};", d.quote_ident(&config.selected_table))
    }
}

fn qualified(d: &dyn Dialect, alias: &str, name: &str) -> String {
    format!("{}.{}", d.quote_ident(alias), d.quote_ident(name))
}
