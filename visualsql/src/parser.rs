//! Best-effort recovery of a query configuration from SQL text.
//!
//! This is deliberately not a grammar. It recognizes the family of
//! SELECT statements the compiler emits (or close hand-typed variants)
//! and refuses everything else: "give up" is a first-class `None`
//! outcome threaded through `Option`, never a caught panic. A result
//! is returned only when it would re-render correctly in the visual
//! builder; otherwise the caller keeps the manually edited SQL.
//!
//! Recovered fields: base table, base alias, column list, and simple
//! conjunctive WHERE filters. Joins, GROUP BY, HAVING, ORDER BY and
//! LIMIT stay at their defaults. Aggregates in the column list are not
//! recovered.

use crate::models::{Filter, FilterOp, QueryAction, QueryConfig, QueryType, SelectedColumn};
use crate::schema::Schema;

/// Attempt to recover a configuration from a SELECT statement.
/// Returns `None` when the statement has no FROM clause, names a table
/// absent from the schema, or is otherwise too complex to sync.
pub fn parse_select(sql: &str, schema: &Schema) -> Option<QueryConfig> {
    let (table_token, alias_token) = from_clause(sql).or_else(|| {
        tracing::debug!("no FROM clause found; giving up");
        None
    })?;

    let table = match schema.find_table(&table_token) {
        Some(table) => table,
        None => {
            tracing::debug!(table = %table_token, "table not in schema; giving up");
            return None;
        }
    };
    // Canonical casing from the schema; alias falls back to the table
    // name the user typed.
    let alias = alias_token.unwrap_or_else(|| table_token.clone());

    let mut config = QueryConfig {
        query_type: QueryType::Dql,
        action: QueryAction::Select,
        selected_table: table.name.clone(),
        selected_table_alias: alias.clone(),
        ..QueryConfig::default()
    };

    if let Some(fragment) = select_fragment(sql) {
        config.selected_columns = if fragment == "*" {
            table
                .columns
                .iter()
                .map(|c| SelectedColumn {
                    table: alias.clone(),
                    name: c.name.clone(),
                    aggregation: Default::default(),
                })
                .collect()
        } else {
            fragment
                .split(',')
                .map(|raw| {
                    let clean = raw.trim().replace('`', "");
                    match clean.split_once('.') {
                        Some((qualifier, name)) => SelectedColumn {
                            table: qualifier.to_string(),
                            name: name.to_string(),
                            aggregation: Default::default(),
                        },
                        None => SelectedColumn {
                            table: alias.clone(),
                            name: clean,
                            aggregation: Default::default(),
                        },
                    }
                })
                .collect()
        };
    }

    if let Some(fragment) = where_fragment(sql) {
        config.filters = split_conditions(&fragment)
            .into_iter()
            .enumerate()
            .filter_map(|(idx, clause)| match parse_condition(clause, &alias) {
                Some(mut filter) => {
                    filter.id = idx as u64 + 1;
                    Some(filter)
                }
                None => {
                    // A clause the pattern can't read is dropped, not fatal.
                    tracing::debug!(clause = %clause, "unrecognized WHERE clause dropped");
                    None
                }
            })
            .collect();
    }

    Some(config)
}

/// `FROM <table> [AS <alias>]`, case-insensitive, backticks optional.
fn from_clause(sql: &str) -> Option<(String, Option<String>)> {
    let pos = find_keyword(sql, "FROM")?;
    let rest = &sql[pos + "FROM".len()..];
    let (table, rest) = take_identifier(rest)?;
    let alias = strip_keyword(rest, "AS")
        .and_then(take_identifier)
        .map(|(alias, _)| alias);
    Some((table, alias))
}

/// The column list between the first SELECT and the first FROM.
fn select_fragment(sql: &str) -> Option<String> {
    let select = find_keyword(sql, "SELECT")?;
    let from = find_keyword(sql, "FROM")?;
    let start = select + "SELECT".len();
    if start >= from {
        return None;
    }
    let fragment = sql[start..from].trim();
    if fragment.is_empty() {
        None
    } else {
        Some(fragment.to_string())
    }
}

/// Everything between WHERE and the next GROUP BY / ORDER BY / LIMIT /
/// statement terminator.
fn where_fragment(sql: &str) -> Option<String> {
    let pos = find_keyword(sql, "WHERE")?;
    let tail = &sql[pos + "WHERE".len()..];
    let mut end = tail.len();
    for stop in ["GROUP BY", "ORDER BY", "LIMIT"] {
        if let Some(at) = find_keyword(tail, stop) {
            end = end.min(at);
        }
    }
    if let Some(at) = tail.find(';') {
        end = end.min(at);
    }
    let fragment = tail[..end].trim();
    if fragment.is_empty() {
        None
    } else {
        Some(fragment.to_string())
    }
}

/// Split a WHERE body on AND. No OR or parenthesis support; an AND
/// inside a quoted value splits too (and the halves are then dropped
/// by the clause pattern), matching the source behavior.
fn split_conditions(fragment: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = fragment;
    while let Some(pos) = find_keyword(rest, "AND") {
        parts.push(rest[..pos].trim());
        rest = &rest[pos + "AND".len()..];
    }
    parts.push(rest.trim());
    parts
}

/// Match one `[alias.]column <op> 'value'` clause. Unqualified columns
/// belong to the base alias.
fn parse_condition(clause: &str, base_alias: &str) -> Option<Filter> {
    let open = clause.find('\'')?;
    let close = clause.rfind('\'')?;
    if close <= open {
        return None;
    }
    let value = clause[open + 1..close].to_string();

    let left = clause[..open].trim();
    let (column_ref, operator) = split_operator(left)?;
    let column_ref = column_ref.replace('`', "");
    let (table_alias, column) = match column_ref.split_once('.') {
        Some((qualifier, name)) => (qualifier.to_string(), name.to_string()),
        None => (base_alias.to_string(), column_ref),
    };
    if column.is_empty() || table_alias.is_empty() {
        return None;
    }

    Some(Filter {
        id: 0,
        table_alias,
        column,
        operator: Some(operator),
        value,
    })
}

/// Pick the comparison operator out of the text left of the quoted
/// value. `>=` and `<=` are outside the supported operator set and
/// make the clause unrecoverable rather than silently narrowing to
/// `>` / `<`.
fn split_operator(left: &str) -> Option<(&str, FilterOp)> {
    if left.contains(">=") || left.contains("<=") {
        return None;
    }
    for (token, op) in [
        ("!=", FilterOp::Neq),
        (">", FilterOp::Gt),
        ("<", FilterOp::Lt),
        ("=", FilterOp::Eq),
    ] {
        if let Some(idx) = left.find(token) {
            return Some((left[..idx].trim(), op));
        }
    }
    for (keyword, op) in [("LIKE", FilterOp::Like), ("IN", FilterOp::In)] {
        if let Some(idx) = find_keyword(left, keyword) {
            return Some((left[..idx].trim(), op));
        }
    }
    None
}

/// Case-insensitive keyword search with identifier-boundary checks on
/// both sides, so `FROM` is not found inside `performed`.
fn find_keyword(haystack: &str, keyword: &str) -> Option<usize> {
    let hay = haystack.as_bytes();
    let needle = keyword.as_bytes();
    if needle.is_empty() || hay.len() < needle.len() {
        return None;
    }
    for start in 0..=hay.len() - needle.len() {
        if !hay[start..start + needle.len()].eq_ignore_ascii_case(needle) {
            continue;
        }
        let before_ok = start == 0 || !is_ident_byte(hay[start - 1]);
        let after = start + needle.len();
        let after_ok = after == hay.len() || !is_ident_byte(hay[after]);
        if before_ok && after_ok {
            return Some(start);
        }
    }
    None
}

/// If `input` starts (after whitespace) with the given keyword, return
/// the text following it.
fn strip_keyword<'a>(input: &'a str, keyword: &str) -> Option<&'a str> {
    let trimmed = input.trim_start();
    let pos = find_keyword(trimmed, keyword)?;
    if pos != 0 {
        return None;
    }
    Some(&trimmed[keyword.len()..])
}

/// Read one identifier, optionally backtick-quoted, returning it with
/// the remaining input.
fn take_identifier(input: &str) -> Option<(String, &str)> {
    let trimmed = input.trim_start();
    let bytes = trimmed.as_bytes();
    if bytes.first() == Some(&b'`') {
        let close = trimmed[1..].find('`')?;
        let ident = &trimmed[1..1 + close];
        if ident.is_empty() {
            return None;
        }
        return Some((ident.to_string(), &trimmed[close + 2..]));
    }
    let end = bytes
        .iter()
        .position(|b| !is_ident_byte(*b))
        .unwrap_or(bytes.len());
    if end == 0 {
        return None;
    }
    Some((trimmed[..end].to_string(), &trimmed[end..]))
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_keywords_case_insensitively() {
        assert_eq!(find_keyword("select * from t", "FROM"), Some(9));
        assert_eq!(find_keyword("performed FROM t", "FROM"), Some(10));
        assert_eq!(find_keyword("performed", "FROM"), None);
    }

    #[test]
    fn takes_plain_and_quoted_identifiers() {
        assert_eq!(
            take_identifier("  orders AS o"),
            Some(("orders".to_string(), " AS o"))
        );
        assert_eq!(
            take_identifier("`orders` AS o"),
            Some(("orders".to_string(), " AS o"))
        );
        assert_eq!(take_identifier("  "), None);
    }

    #[test]
    fn from_clause_with_and_without_alias() {
        assert_eq!(
            from_clause("SELECT * FROM orders"),
            Some(("orders".to_string(), None))
        );
        assert_eq!(
            from_clause("SELECT * FROM `orders` AS `A` WHERE x"),
            Some(("orders".to_string(), Some("A".to_string())))
        );
    }

    #[test]
    fn where_fragment_stops_at_trailing_clauses() {
        let sql = "SELECT * FROM t WHERE a = '1' AND b = '2' ORDER BY a ASC";
        assert_eq!(where_fragment(sql).as_deref(), Some("a = '1' AND b = '2'"));
        let sql = "SELECT * FROM t WHERE a = '1';";
        assert_eq!(where_fragment(sql).as_deref(), Some("a = '1'"));
    }

    #[test]
    fn condition_patterns() {
        let f = parse_condition("`A`.`status` = 'paid'", "A").unwrap();
        assert_eq!(f.table_alias, "A");
        assert_eq!(f.column, "status");
        assert_eq!(f.operator, Some(FilterOp::Eq));
        assert_eq!(f.value, "paid");

        let f = parse_condition("status like 'p%'", "base").unwrap();
        assert_eq!(f.table_alias, "base");
        assert_eq!(f.operator, Some(FilterOp::Like));

        assert!(parse_condition("status >= '3'", "base").is_none());
        assert!(parse_condition("no quotes here", "base").is_none());
    }
}
