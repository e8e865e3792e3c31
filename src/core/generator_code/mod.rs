//! Object code generation: one type per table, one field per column.

mod java;
mod kotlin;
mod typescript;

pub use java::Java;
pub use kotlin::Kotlin;
pub use typescript::TypeScript;

use super::canvas::{CasePolicy, Database, Language};
use super::document::Document;
use super::ordering::order_by_name_asc;
use super::schema::{Column, Table};
use super::sql::primitive_type;

/// A table ready for code generation
#[derive(Debug, Clone, PartialEq)]
pub struct CodeTable<'a> {
    pub name: String,
    pub comment: &'a str,
    pub columns: Vec<CodeColumn<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeColumn<'a> {
    pub name: String,
    /// Logical type, one of the DDL logical types
    pub primitive: &'static str,
    pub not_null: bool,
    pub comment: &'a str,
}

impl<'a> CodeTable<'a> {
    fn new(table: &'a Table, database: Database, case: CasePolicy) -> Self {
        Self {
            name: case.table.apply(&table.name),
            comment: table.comment.trim(),
            columns: table
                .columns
                .iter()
                .map(|column| CodeColumn::new(column, database, case))
                .collect(),
        }
    }
}

impl<'a> CodeColumn<'a> {
    fn new(column: &'a Column, database: Database, case: CasePolicy) -> Self {
        Self {
            name: case.column.apply(&column.name),
            primitive: primitive_type(&column.data_type, database),
            not_null: column.is_not_null(),
            comment: column.comment.trim(),
        }
    }
}

/// A language's code writer
pub trait CodeGenerator {
    /// Language type of a logical primitive
    fn type_name(&self, primitive: &str) -> &'static str;

    fn generate_table(&self, table: &CodeTable<'_>) -> String;

    fn generate(&self, tables: &[CodeTable<'_>]) -> String {
        let mut output = tables
            .iter()
            .map(|table| self.generate_table(table))
            .collect::<Vec<_>>()
            .join("\n\n");
        if !output.is_empty() {
            output.push('\n');
        }
        output
    }
}

pub fn generator(language: Language) -> Box<dyn CodeGenerator> {
    match language {
        Language::Java => Box::new(Java),
        Language::TypeScript => Box::new(TypeScript),
        Language::Kotlin => Box::new(Kotlin),
    }
}

/// Generate `language` types for every table of `document`, sorted by name.
/// Data types are read in the document's database dialect.
pub fn generate_code(document: &Document, language: Language, case: CasePolicy) -> String {
    tracing::debug!(%language, "generate_code");
    let database = document.canvas().database;
    let tables: Vec<CodeTable> = order_by_name_asc(document.tables())
        .into_iter()
        .map(|table| CodeTable::new(table, database, case))
        .collect();
    generator(language).generate(&tables)
}
