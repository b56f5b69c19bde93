//! # visualsql-core
//!
//! The bidirectional SQL builder behind a visual query editor: a
//! deterministic compiler from a structured [`QueryConfig`] to SQL
//! text, and a best-effort parser that recovers a configuration from
//! SQL text so hand-edited statements can sync back into the builder.
//!
//! Both directions are pure, synchronous transformations safe to call
//! on every keystroke.
//!
//! ```rust
//! use visualsql::models::QueryConfig;
//! use visualsql::{compile_config_to_sql, parse_sql_to_config};
//! use visualsql::schema::Schema;
//!
//! let mut config = QueryConfig::default();
//! config.selected_table = "orders".to_string();
//! let sql = compile_config_to_sql(&config, "mysql");
//! assert!(sql.starts_with("SELECT"));
//!
//! // Parsing refuses anything it can't faithfully re-render.
//! let schema = Schema::default();
//! assert!(parse_sql_to_config("SELECT * FROM ghost", &schema, "mysql").is_none());
//! ```

pub mod compiler;
pub mod dialect;
pub mod error;
pub mod models;
pub mod parser;
pub mod schema;
pub mod validation;

pub use compiler::SqlCompiler;
pub use dialect::{dialect_for, Dialect, MariaDbDialect, MySqlDialect};
pub use error::{Result, VisualSqlError};
pub use models::QueryConfig;
pub use schema::Schema;
pub use validation::validate_config;

/// Compile a configuration to SQL text. Always succeeds: the result is
/// either a statement ending in `;` or a line starting with `--`
/// explaining why compilation could not proceed.
pub fn compile_config_to_sql(config: &QueryConfig, dialect_label: &str) -> String {
    SqlCompiler::new().compile(config, dialect_for(dialect_label))
}

/// Recover a configuration from SQL text, or `None` when the statement
/// is too complex to sync. The dialect label is accepted for symmetry
/// with [`compile_config_to_sql`]; both supported dialects quote
/// identically, so it does not affect parsing.
pub fn parse_sql_to_config(
    sql: &str,
    schema: &Schema,
    _dialect_label: &str,
) -> Option<QueryConfig> {
    parser::parse_select(sql, schema)
}
