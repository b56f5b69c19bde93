//! SQL dialect abstractions.
//!
//! Dialects render identifiers and literal values; clause assembly
//! lives in the compiler. The supported engines quote identically with
//! backticks, so the dialect mostly contributes its descriptive label.

/// Identifier and literal rendering for one database engine.
pub trait Dialect {
    /// Human-readable engine label ("MySQL", "MariaDB").
    fn name(&self) -> &'static str;

    fn quote_ident(&self, ident: &str) -> String;

    /// Wrap a literal value in single quotes exactly as typed.
    /// Embedded quote characters are NOT escaped; this reproduces the
    /// source behavior and is unsafe for untrusted input. See
    /// [`Dialect::escape_literal`] for the hardened rendering.
    fn quote_literal(&self, raw: &str) -> String {
        format!("'{raw}'")
    }

    /// Literal rendering with embedded single quotes doubled.
    fn escape_literal(&self, raw: &str) -> String {
        format!("'{}'", raw.replace('\'', "''"))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "MySQL"
    }

    fn quote_ident(&self, ident: &str) -> String {
        format!("`{ident}`")
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MariaDbDialect;

impl Dialect for MariaDbDialect {
    fn name(&self) -> &'static str {
        "MariaDB"
    }

    fn quote_ident(&self, ident: &str) -> String {
        format!("`{ident}`")
    }
}

/// Map the wire-level dialect label onto a dialect. Unknown labels
/// fall back to MySQL, mirroring the original default.
pub fn dialect_for(label: &str) -> &'static dyn Dialect {
    if label.eq_ignore_ascii_case("mariadb") {
        &MariaDbDialect
    } else {
        &MySqlDialect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backtick_quoting() {
        assert_eq!(MySqlDialect.quote_ident("orders"), "`orders`");
        assert_eq!(MariaDbDialect.quote_ident("id"), "`id`");
    }

    #[test]
    fn label_selects_dialect() {
        assert_eq!(dialect_for("mysql").name(), "MySQL");
        assert_eq!(dialect_for("mariadb").name(), "MariaDB");
        assert_eq!(dialect_for("something-else").name(), "MySQL");
    }

    #[test]
    fn literal_modes() {
        let d = MySqlDialect;
        assert_eq!(d.quote_literal("O'Brien"), "'O'Brien'");
        assert_eq!(d.escape_literal("O'Brien"), "'O''Brien'");
    }
}
