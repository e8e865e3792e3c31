//! Dialect-independent preparation of a document for DDL output.
//!
//! Tables are sorted, names cased, data types mapped and constraint names
//! reserved once here, so every dialect emits the same names in the same order.

use unicode_width::UnicodeWidthStr;

use super::DdlOptions;
use super::data_type::native_type;
use crate::core::document::Document;
use crate::core::helper::{Id, NameRegistry};
use crate::core::ordering::order_by_name_asc;
use crate::core::schema::{Column, Relationship, Table};

#[derive(Debug, Clone, PartialEq)]
pub struct DdlSchema<'a> {
    pub tables: Vec<DdlTable<'a>>,
    pub foreign_keys: Vec<ForeignKey>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DdlTable<'a> {
    pub id: &'a str,
    pub name: String,
    pub comment: &'a str,
    pub columns: Vec<DdlColumn<'a>>,
    /// `PK_<table>` when the table has a primary key
    pub pk_name: Option<String>,
    pub uniques: Vec<UniqueKey>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DdlColumn<'a> {
    pub name: String,
    pub data_type: String,
    pub column: &'a Column,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UniqueKey {
    pub name: String,
    pub column: String,
}

/// A relationship whose tables and columns all resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub name: String,
    pub start_table: String,
    pub end_table_id: Id,
    pub end_table: String,
    pub start_columns: Vec<String>,
    pub end_columns: Vec<String>,
}

impl<'a> DdlSchema<'a> {
    pub fn new(document: &'a Document, options: &DdlOptions) -> Self {
        let mut names = NameRegistry::new();
        let tables = order_by_name_asc(document.tables())
            .into_iter()
            .map(|table| DdlTable::new(table, options, &mut names))
            .collect();
        let foreign_keys = document
            .relationships()
            .filter_map(|relationship| {
                ForeignKey::resolve(document, relationship, options, &mut names)
            })
            .collect();
        Self {
            tables,
            foreign_keys,
        }
    }

    /// Foreign keys declared on `table_id`
    pub fn foreign_keys_of<'s>(&'s self, table_id: &'s str) -> impl Iterator<Item = &'s ForeignKey> {
        self.foreign_keys
            .iter()
            .filter(move |foreign_key| foreign_key.end_table_id == table_id)
    }
}

impl<'a> DdlTable<'a> {
    fn new(table: &'a Table, options: &DdlOptions, names: &mut NameRegistry) -> Self {
        let name = options.case.table.apply(&table.name);
        let columns: Vec<DdlColumn> = table
            .columns
            .iter()
            .map(|column| DdlColumn {
                name: options.case.column.apply(&column.name),
                data_type: native_type(&column.data_type, options.database),
                column,
            })
            .collect();
        let pk_name = table
            .primary_key_columns()
            .next()
            .map(|_| names.reserve(&format!("PK_{name}")));
        let uniques = columns
            .iter()
            .filter(|column| column.column.option.unique)
            .map(|column| UniqueKey {
                name: names.reserve(&format!("UQ_{}", column.name)),
                column: column.name.clone(),
            })
            .collect();
        Self {
            id: &table.id,
            name,
            comment: table.comment.trim(),
            columns,
            pk_name,
            uniques,
        }
    }

    pub fn primary_keys(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|column| column.column.option.primary_key)
            .map(|column| column.name.as_str())
            .collect()
    }

    /// Widest column name and data type, for alignment
    pub fn widths(&self) -> (usize, usize) {
        self.columns.iter().fold((0, 0), |(name, data_type), column| {
            (
                name.max(column.name.width()),
                data_type.max(column.data_type.width()),
            )
        })
    }
}

impl DdlColumn<'_> {
    pub fn not_null(&self) -> bool {
        self.column.is_not_null()
    }

    pub fn auto_increment(&self) -> bool {
        self.column.option.auto_increment
    }

    pub fn default(&self) -> Option<&str> {
        self.column.effective_default()
    }

    pub fn comment(&self) -> Option<&str> {
        let comment = self.column.comment.trim();
        (!comment.is_empty()).then_some(comment)
    }
}

impl ForeignKey {
    /// None when a table or any referenced column is missing, or a side has
    /// no columns
    fn resolve(
        document: &Document,
        relationship: &Relationship,
        options: &DdlOptions,
        names: &mut NameRegistry,
    ) -> Option<Self> {
        let start = document.table(&relationship.start.table_id)?;
        let end = document.table(&relationship.end.table_id)?;
        if relationship.start.column_ids.is_empty() || relationship.end.column_ids.is_empty() {
            return None;
        }

        let column_names = |table: &Table, ids: &[Id]| -> Option<Vec<String>> {
            ids.iter()
                .map(|id| {
                    table
                        .column(id)
                        .map(|column| options.case.column.apply(&column.name))
                })
                .collect()
        };
        let start_columns = column_names(start, &relationship.start.column_ids)?;
        let end_columns = column_names(end, &relationship.end.column_ids)?;

        let start_table = options.case.table.apply(&start.name);
        let end_table = options.case.table.apply(&end.name);
        Some(Self {
            name: names.reserve(&format!("FK_{start_table}_TO_{end_table}")),
            start_table,
            end_table_id: end.id.clone(),
            end_table,
            start_columns,
            end_columns,
        })
    }
}

/// Left-align `text` in a field of `width` display columns
pub fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

/// Quote a string literal
pub fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

pub fn join(names: &[impl AsRef<str>]) -> String {
    names
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Join column parts with single spaces, dropping trailing padding
pub fn line(parts: &[String]) -> String {
    parts.join(" ").trim_end().to_string()
}
