//! Canvas settings: viewport, target database, naming policy and column display options

use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use serde::{Deserialize, Serialize};

use super::layout::{SIZE_CANVAS_HEIGHT, SIZE_CANVAS_WIDTH};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct CanvasState {
    pub width: f64,
    pub height: f64,
    pub scroll_top: f64,
    pub scroll_left: f64,
    #[serde(default)]
    pub show: Show,
    #[serde(default)]
    pub database: Database,
    #[serde(default)]
    pub database_name: String,
    #[serde(default)]
    pub canvas_type: CanvasType,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub table_case: NameCase,
    #[serde(default)]
    pub column_case: NameCase,
    #[serde(default)]
    pub setting: Setting,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            width: SIZE_CANVAS_WIDTH,
            height: SIZE_CANVAS_HEIGHT,
            scroll_top: 0.0,
            scroll_left: 0.0,
            show: Show::default(),
            database: Database::default(),
            database_name: String::new(),
            canvas_type: CanvasType::default(),
            language: Language::default(),
            table_case: NameCase::default(),
            column_case: NameCase::default(),
            setting: Setting::default(),
        }
    }
}

/// Visibility of the optional table and column attributes
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Show {
    pub table_comment: bool,
    pub column_comment: bool,
    pub column_data_type: bool,
    pub column_default: bool,
    pub column_auto_increment: bool,
    pub column_primary_key: bool,
    pub column_unique: bool,
    pub column_not_null: bool,
    pub relationship: bool,
}

impl Default for Show {
    fn default() -> Self {
        Self {
            table_comment: true,
            column_comment: true,
            column_data_type: true,
            column_default: true,
            column_auto_increment: false,
            column_primary_key: true,
            column_unique: false,
            column_not_null: true,
            relationship: true,
        }
    }
}

impl Show {
    pub fn get(&self, key: ShowKey) -> bool {
        match key {
            ShowKey::TableComment => self.table_comment,
            ShowKey::ColumnComment => self.column_comment,
            ShowKey::ColumnDataType => self.column_data_type,
            ShowKey::ColumnDefault => self.column_default,
            ShowKey::ColumnAutoIncrement => self.column_auto_increment,
            ShowKey::ColumnPrimaryKey => self.column_primary_key,
            ShowKey::ColumnUnique => self.column_unique,
            ShowKey::ColumnNotNull => self.column_not_null,
            ShowKey::Relationship => self.relationship,
        }
    }

    pub fn slot_mut(&mut self, key: ShowKey) -> &mut bool {
        match key {
            ShowKey::TableComment => &mut self.table_comment,
            ShowKey::ColumnComment => &mut self.column_comment,
            ShowKey::ColumnDataType => &mut self.column_data_type,
            ShowKey::ColumnDefault => &mut self.column_default,
            ShowKey::ColumnAutoIncrement => &mut self.column_auto_increment,
            ShowKey::ColumnPrimaryKey => &mut self.column_primary_key,
            ShowKey::ColumnUnique => &mut self.column_unique,
            ShowKey::ColumnNotNull => &mut self.column_not_null,
            ShowKey::Relationship => &mut self.relationship,
        }
    }

    /// Whether a column field kind is currently displayed
    pub fn column_type(&self, column_type: ColumnType) -> bool {
        match column_type {
            ColumnType::ColumnName => true,
            ColumnType::ColumnPrimaryKey => self.column_primary_key,
            ColumnType::ColumnDataType => self.column_data_type,
            ColumnType::ColumnNotNull => self.column_not_null,
            ColumnType::ColumnUnique => self.column_unique,
            ColumnType::ColumnAutoIncrement => self.column_auto_increment,
            ColumnType::ColumnDefault => self.column_default,
            ColumnType::ColumnComment => self.column_comment,
        }
    }
}

#[derive(
    Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, derive_more::Display,
)]
#[serde(rename_all = "camelCase")]
pub enum ShowKey {
    #[display("tableComment")]
    TableComment,
    #[display("columnComment")]
    ColumnComment,
    #[display("columnDataType")]
    ColumnDataType,
    #[display("columnDefault")]
    ColumnDefault,
    #[display("columnAutoIncrement")]
    ColumnAutoIncrement,
    #[display("columnPrimaryKey")]
    ColumnPrimaryKey,
    #[display("columnUnique")]
    ColumnUnique,
    #[display("columnNotNull")]
    ColumnNotNull,
    #[display("relationship")]
    Relationship,
}

/// Target database dialect
#[derive(
    Clone,
    Copy,
    Serialize,
    Deserialize,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    derive_more::Display,
)]
pub enum Database {
    MariaDB,
    #[display("MSSQL")]
    Mssql,
    #[default]
    MySQL,
    Oracle,
    PostgreSQL,
    SQLite,
}

impl Database {
    pub const ALL: [Database; 6] = [
        Database::MariaDB,
        Database::Mssql,
        Database::MySQL,
        Database::Oracle,
        Database::PostgreSQL,
        Database::SQLite,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mariadb" => Some(Self::MariaDB),
            "mssql" | "sqlserver" => Some(Self::Mssql),
            "mysql" => Some(Self::MySQL),
            "oracle" => Some(Self::Oracle),
            "postgres" | "postgresql" => Some(Self::PostgreSQL),
            "sqlite" => Some(Self::SQLite),
            _ => None,
        }
    }
}

#[derive(
    Clone,
    Copy,
    Serialize,
    Deserialize,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    derive_more::Display,
)]
pub enum CanvasType {
    #[default]
    #[display("ERD")]
    Erd,
    #[display("SQL")]
    Sql,
    GeneratorCode,
}

/// Object-code language for generation
#[derive(
    Clone,
    Copy,
    Serialize,
    Deserialize,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    derive_more::Display,
)]
pub enum Language {
    #[default]
    Java,
    TypeScript,
    Kotlin,
}

impl Language {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "java" => Some(Self::Java),
            "typescript" | "ts" => Some(Self::TypeScript),
            "kotlin" | "kt" => Some(Self::Kotlin),
            _ => None,
        }
    }
}

/// Naming case applied to table and column names on output
#[derive(
    Clone,
    Copy,
    Serialize,
    Deserialize,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    derive_more::Display,
)]
pub enum NameCase {
    #[default]
    None,
    #[display("camelCase")]
    CamelCase,
    #[display("PascalCase")]
    PascalCase,
    #[display("snake_case")]
    SnakeCase,
}

impl NameCase {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(Self::None),
            "camel" | "camelcase" => Some(Self::CamelCase),
            "pascal" | "pascalcase" => Some(Self::PascalCase),
            "snake" | "snake_case" => Some(Self::SnakeCase),
            _ => None,
        }
    }

    pub fn apply(&self, name: &str) -> String {
        match self {
            NameCase::None => name.to_string(),
            NameCase::CamelCase => name.to_lower_camel_case(),
            NameCase::PascalCase => name.to_upper_camel_case(),
            NameCase::SnakeCase => name.to_snake_case(),
        }
    }
}

/// Name cases applied to generated table and column names
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct CasePolicy {
    pub table: NameCase,
    pub column: NameCase,
}

impl CasePolicy {
    pub fn new(table: NameCase, column: NameCase) -> Self {
        Self { table, column }
    }

    /// The cases chosen on the canvas
    pub fn from_canvas(canvas: &CanvasState) -> Self {
        Self::new(canvas.table_case, canvas.column_case)
    }
}

/// Column field kinds, in the order they are drawn
#[derive(
    Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, derive_more::Display,
)]
#[serde(rename_all = "camelCase")]
pub enum ColumnType {
    #[display("columnPrimaryKey")]
    ColumnPrimaryKey,
    #[display("columnName")]
    ColumnName,
    #[display("columnDataType")]
    ColumnDataType,
    #[display("columnNotNull")]
    ColumnNotNull,
    #[display("columnUnique")]
    ColumnUnique,
    #[display("columnAutoIncrement")]
    ColumnAutoIncrement,
    #[display("columnDefault")]
    ColumnDefault,
    #[display("columnComment")]
    ColumnComment,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Setting {
    pub relationship_data_type_sync: bool,
    pub column_order: Vec<ColumnType>,
}

impl Default for Setting {
    fn default() -> Self {
        Self {
            relationship_data_type_sync: true,
            column_order: vec![
                ColumnType::ColumnPrimaryKey,
                ColumnType::ColumnName,
                ColumnType::ColumnDataType,
                ColumnType::ColumnNotNull,
                ColumnType::ColumnUnique,
                ColumnType::ColumnAutoIncrement,
                ColumnType::ColumnDefault,
                ColumnType::ColumnComment,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_case_apply() {
        assert_eq!(NameCase::None.apply("user_account"), "user_account");
        assert_eq!(NameCase::CamelCase.apply("user_account"), "userAccount");
        assert_eq!(NameCase::PascalCase.apply("user_account"), "UserAccount");
        assert_eq!(NameCase::SnakeCase.apply("UserAccount"), "user_account");
    }

    #[test]
    fn test_show_slot_roundtrip() {
        let mut show = Show::default();
        assert!(show.get(ShowKey::ColumnComment));
        *show.slot_mut(ShowKey::ColumnComment) = false;
        assert!(!show.get(ShowKey::ColumnComment));
        assert!(!show.column_type(ColumnType::ColumnComment));
        assert!(show.column_type(ColumnType::ColumnName));
    }

    #[test]
    fn test_database_from_str() {
        assert_eq!(Database::from_str("postgres"), Some(Database::PostgreSQL));
        assert_eq!(Database::from_str("MSSQL"), Some(Database::Mssql));
        assert_eq!(Database::from_str("db2"), None);
        assert_eq!(Database::Mssql.to_string(), "MSSQL");
    }

    #[test]
    fn test_default_column_order_has_every_kind_once() {
        let order = Setting::default().column_order;
        assert_eq!(order.len(), 8);
        for kind in &order {
            assert_eq!(order.iter().filter(|k| *k == kind).count(), 1);
        }
    }
}
