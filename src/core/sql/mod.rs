//! SQL DDL generation.
//!
//! Every dialect implements [`DdlGenerator`] over the same prepared
//! [`DdlSchema`]: tables sorted by name, names cased, logical data types
//! mapped and constraint names made unique.

mod data_type;
mod helper;
mod mssql;
mod mysql;
mod oracle;
mod postgresql;
mod sqlite;

pub use data_type::{LOGICAL_TYPES, native_type, primitive_type};
pub use helper::{DdlColumn, DdlSchema, DdlTable, ForeignKey, UniqueKey};
pub use mssql::Mssql;
pub use mysql::MySql;
pub use oracle::Oracle;
pub use postgresql::PostgreSql;
pub use sqlite::Sqlite;

use super::canvas::{CasePolicy, Database};
use super::document::Document;

/// Options of a DDL export
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DdlOptions {
    pub database: Database,
    pub case: CasePolicy,
}

impl DdlOptions {
    pub fn new(database: Database) -> Self {
        Self {
            database,
            case: CasePolicy::default(),
        }
    }
}

/// A SQL dialect's DDL writer
pub trait DdlGenerator {
    fn generate(&self, schema: &DdlSchema<'_>) -> String;
}

/// Get the generator for `database`
pub fn generator(database: Database) -> Box<dyn DdlGenerator> {
    match database {
        Database::MySQL | Database::MariaDB => Box::new(MySql),
        Database::PostgreSQL => Box::new(PostgreSql),
        Database::Oracle => Box::new(Oracle),
        Database::Mssql => Box::new(Mssql),
        Database::SQLite => Box::new(Sqlite),
    }
}

/// Generate the DDL of `document` for `database`, names as written
pub fn generate_ddl(document: &Document, database: Database) -> String {
    generate_ddl_with(document, &DdlOptions::new(database))
}

pub fn generate_ddl_with(document: &Document, options: &DdlOptions) -> String {
    tracing::debug!(database = %options.database, "generate_ddl");
    let schema = DdlSchema::new(document, options);
    generator(options.database).generate(&schema)
}

/// Assemble statements, one blank line apart
pub(crate) fn statements(statements: Vec<String>) -> String {
    let mut output = statements.join("\n\n");
    if !output.is_empty() {
        output.push('\n');
    }
    output
}
