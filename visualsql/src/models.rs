use std::collections::BTreeMap;
use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};

/// Statement category. Selects which action vocabulary is valid; the
/// pairing is enforced by the configuration's producer (UI or parser)
/// and re-checked only by [`crate::validation`], never by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryType {
    #[serde(rename = "DQL")]
    Dql,
    #[serde(rename = "DML")]
    Dml,
    #[serde(rename = "DDL")]
    Ddl,
    #[serde(rename = "TCL")]
    Tcl,
    #[serde(rename = "DCL")]
    Dcl,
}

impl QueryType {
    pub fn label(&self) -> &'static str {
        match self {
            QueryType::Dql => "DQL",
            QueryType::Dml => "DML",
            QueryType::Ddl => "DDL",
            QueryType::Tcl => "TCL",
            QueryType::Dcl => "DCL",
        }
    }

    /// The actions that are valid under this statement category.
    pub fn actions(&self) -> &'static [QueryAction] {
        match self {
            QueryType::Dql => &[QueryAction::Select],
            QueryType::Dml => &[
                QueryAction::Insert,
                QueryAction::Update,
                QueryAction::Delete,
            ],
            QueryType::Ddl => &[
                QueryAction::CreateTable,
                QueryAction::AlterTable,
                QueryAction::DropTable,
                QueryAction::TruncateTable,
            ],
            QueryType::Tcl => &[
                QueryAction::StartTransaction,
                QueryAction::Commit,
                QueryAction::Rollback,
            ],
            QueryType::Dcl => &[QueryAction::Grant, QueryAction::Revoke],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryAction {
    #[serde(rename = "SELECT")]
    Select,
    #[serde(rename = "INSERT")]
    Insert,
    #[serde(rename = "UPDATE")]
    Update,
    #[serde(rename = "DELETE")]
    Delete,
    #[serde(rename = "CREATE TABLE")]
    CreateTable,
    #[serde(rename = "ALTER TABLE")]
    AlterTable,
    #[serde(rename = "DROP TABLE")]
    DropTable,
    #[serde(rename = "TRUNCATE TABLE")]
    TruncateTable,
    #[serde(rename = "COMMIT")]
    Commit,
    #[serde(rename = "ROLLBACK")]
    Rollback,
    #[serde(rename = "START TRANSACTION")]
    StartTransaction,
    #[serde(rename = "GRANT")]
    Grant,
    #[serde(rename = "REVOKE")]
    Revoke,
}

impl QueryAction {
    pub fn keyword(&self) -> &'static str {
        match self {
            QueryAction::Select => "SELECT",
            QueryAction::Insert => "INSERT",
            QueryAction::Update => "UPDATE",
            QueryAction::Delete => "DELETE",
            QueryAction::CreateTable => "CREATE TABLE",
            QueryAction::AlterTable => "ALTER TABLE",
            QueryAction::DropTable => "DROP TABLE",
            QueryAction::TruncateTable => "TRUNCATE TABLE",
            QueryAction::Commit => "COMMIT",
            QueryAction::Rollback => "ROLLBACK",
            QueryAction::StartTransaction => "START TRANSACTION",
            QueryAction::Grant => "GRANT",
            QueryAction::Revoke => "REVOKE",
        }
    }
}

impl fmt::Display for QueryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Aggregation {
    #[default]
    #[serde(rename = "NONE")]
    None,
    #[serde(rename = "COUNT")]
    Count,
    #[serde(rename = "SUM")]
    Sum,
    #[serde(rename = "AVG")]
    Avg,
    #[serde(rename = "MIN")]
    Min,
    #[serde(rename = "MAX")]
    Max,
}

impl Aggregation {
    pub fn keyword(&self) -> &'static str {
        match self {
            Aggregation::None => "NONE",
            Aggregation::Count => "COUNT",
            Aggregation::Sum => "SUM",
            Aggregation::Avg => "AVG",
            Aggregation::Min => "MIN",
            Aggregation::Max => "MAX",
        }
    }

    /// The output alias an aggregated column is published under,
    /// e.g. `COUNT_id`. HAVING and ORDER BY reference this name.
    /// It is not qualified by table, so two joined tables sharing a
    /// column name collide under the same aggregation.
    pub fn output_alias(&self, column: &str) -> String {
        format!("{}_{}", self.keyword(), column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    #[serde(rename = "INNER JOIN")]
    Inner,
    #[serde(rename = "LEFT JOIN")]
    Left,
    #[serde(rename = "RIGHT JOIN")]
    Right,
}

impl JoinType {
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Neq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "LIKE")]
    Like,
    #[serde(rename = "IN")]
    In,
}

impl FilterOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Neq => "!=",
            FilterOp::Gt => ">",
            FilterOp::Lt => "<",
            FilterOp::Like => "LIKE",
            FilterOp::In => "IN",
        }
    }

    /// Case-insensitive lookup used when recovering operators from SQL text.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "=" => Some(FilterOp::Eq),
            "!=" => Some(FilterOp::Neq),
            ">" => Some(FilterOp::Gt),
            "<" => Some(FilterOp::Lt),
            t if t.eq_ignore_ascii_case("LIKE") => Some(FilterOp::Like),
            t if t.eq_ignore_ascii_case("IN") => Some(FilterOp::In),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl SortDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColumnConstraint {
    #[default]
    #[serde(rename = "NONE")]
    None,
    #[serde(rename = "PRIMARY KEY")]
    PrimaryKey,
    #[serde(rename = "NOT NULL")]
    NotNull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlterKind {
    #[default]
    #[serde(rename = "RENAME_TABLE")]
    RenameTable,
    #[serde(rename = "ADD_COLUMN")]
    AddColumn,
    #[serde(rename = "DROP_COLUMN")]
    DropColumn,
}

/// One entry in the SELECT column list. `table` holds the *alias* the
/// column is reached through, never a raw table name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectedColumn {
    pub table: String,
    pub name: String,
    pub aggregation: Aggregation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Join {
    #[serde(default)]
    pub id: u64,
    #[serde(rename = "type")]
    pub join_type: JoinType,
    pub target_table: String,
    #[serde(default)]
    pub alias: String,
    pub on_col1: String,
    pub on_col2: String,
}

impl Join {
    /// Alias the joined table is addressed by, falling back to the
    /// table name when the user left it blank.
    pub fn effective_alias(&self) -> &str {
        if self.alias.is_empty() {
            &self.target_table
        } else {
            &self.alias
        }
    }
}

/// A conjunctive WHERE predicate. Entries missing any of alias, column,
/// operator, or value are silently excluded from compiled output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Filter {
    pub id: u64,
    pub table_alias: String,
    pub column: String,
    #[serde(deserialize_with = "op_or_blank")]
    pub operator: Option<FilterOp>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupByItem {
    pub alias: String,
    pub column: String,
}

/// Conjunctive HAVING predicate. Same omission rule as [`Filter`], and
/// additionally the aggregation must be a real function (not NONE)
/// because the clause references the aggregation's output alias.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HavingItem {
    pub id: u64,
    pub table_alias: String,
    pub column: String,
    pub aggregation: Aggregation,
    #[serde(deserialize_with = "op_or_blank")]
    pub operator: Option<FilterOp>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderBy {
    pub table_alias: String,
    /// Empty column means no ORDER BY clause.
    pub column: String,
    pub aggregation: Aggregation,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewColumn {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub col_type: String,
    pub constraint: ColumnConstraint,
}

impl Default for NewColumn {
    fn default() -> Self {
        Self {
            id: 1,
            name: String::new(),
            col_type: "TEXT".to_string(),
            constraint: ColumnConstraint::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub col_type: String,
}

impl Default for AddColumn {
    fn default() -> Self {
        Self {
            name: String::new(),
            col_type: "TEXT".to_string(),
        }
    }
}

/// The single source of truth for one editing session: everything the
/// user has composed, compiled to SQL on every change and replaced
/// wholesale (never merged) when the base table changes.
///
/// Field names serialize in camelCase so a config round-trips against
/// snapshots saved by the original frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryConfig {
    pub query_type: QueryType,
    pub action: QueryAction,
    pub selected_table: String,
    pub selected_table_alias: String,
    pub selected_columns: Vec<SelectedColumn>,
    pub joins: Vec<Join>,
    pub filters: Vec<Filter>,
    pub group_by: Vec<GroupByItem>,
    pub having: Vec<HavingItem>,
    pub order_by: OrderBy,
    /// Verbatim LIMIT payload; empty means no LIMIT. Accepts a JSON
    /// number or string on input.
    #[serde(deserialize_with = "string_or_number")]
    pub limit: String,
    /// Column name to literal value, used by INSERT and UPDATE. A key
    /// participates only when its value is non-empty. BTreeMap keeps
    /// emission order deterministic.
    pub values: BTreeMap<String, String>,
    /// CREATE TABLE payload, doubling as the confirmation string for
    /// DROP/TRUNCATE.
    pub new_table_name: String,
    pub new_columns: Vec<NewColumn>,
    #[serde(rename = "alterType")]
    pub alter_kind: AlterKind,
    pub rename_to: String,
    pub add_column: AddColumn,
    pub drop_column: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            query_type: QueryType::Dql,
            action: QueryAction::Select,
            selected_table: String::new(),
            selected_table_alias: "A".to_string(),
            selected_columns: Vec::new(),
            joins: Vec::new(),
            filters: Vec::new(),
            group_by: Vec::new(),
            having: Vec::new(),
            order_by: OrderBy::default(),
            limit: String::new(),
            values: BTreeMap::new(),
            new_table_name: String::new(),
            new_columns: vec![NewColumn::default()],
            alter_kind: AlterKind::RenameTable,
            rename_to: String::new(),
            add_column: AddColumn::default(),
            drop_column: String::new(),
        }
    }
}

impl QueryConfig {
    /// Alias the base table is addressed by. Falls back to the table
    /// name when the alias field is blank.
    pub fn base_alias(&self) -> &str {
        if self.selected_table_alias.is_empty() {
            &self.selected_table
        } else {
            &self.selected_table_alias
        }
    }
}

/// Snapshots store an unset operator as the empty string; treat that
/// (and an explicit null) as absent rather than a deserialization error.
fn op_or_blank<'de, D>(deserializer: D) -> Result<Option<FilterOp>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(token) => FilterOp::from_token(token)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("unknown operator '{token}'"))),
    }
}

/// The original frontend stores LIMIT as either a number or a string.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(serde_json::Number),
        Text(String),
    }
    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => String::new(),
        Some(Raw::Num(n)) => n.to_string(),
        Some(Raw::Text(s)) => s,
    })
}
