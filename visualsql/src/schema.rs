//! Introspected database schema, the read-only input the parser and
//! validation resolve names against. Sourced from the engine's
//! `information_schema`; the core never mutates it.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub tables: Vec<TableSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default, deserialize_with = "pk_flag")]
    pub pk: bool,
}

impl Schema {
    /// Parse the introspection payload
    /// (`{"tables":[{"name":..,"columns":[{"name":..,"type":..,"pk":0|1}]}]}`).
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Case-insensitive table lookup; SQL identifiers arrive in
    /// whatever casing the user typed.
    pub fn find_table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

impl TableSchema {
    pub fn find_column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// MySQL introspection reports the primary-key flag as 0/1.
fn pk_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Num(u8),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Flag(b) => b,
        Raw::Num(n) => n != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_introspection_payload() {
        let raw = r#"{"tables":[{"name":"users","columns":[
            {"name":"id","type":"int","pk":1},
            {"name":"name","type":"varchar","pk":0}
        ]}]}"#;
        let schema = Schema::from_json(raw).unwrap();
        assert_eq!(schema.tables.len(), 1);
        assert!(schema.tables[0].columns[0].pk);
        assert!(!schema.tables[0].columns[1].pk);
    }

    #[test]
    fn table_lookup_ignores_case() {
        let schema = Schema {
            tables: vec![TableSchema {
                name: "Users".to_string(),
                columns: vec![],
            }],
        };
        assert!(schema.find_table("users").is_some());
        assert!(schema.find_table("USERS").is_some());
        assert!(schema.find_table("ghost").is_none());
    }
}
