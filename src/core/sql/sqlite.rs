//! SQLite DDL. Constraints are declared inside `CREATE TABLE` since SQLite
//! cannot add them afterwards.

use super::helper::{DdlColumn, DdlSchema, DdlTable, join, line, pad};
use super::{DdlGenerator, statements};

pub struct Sqlite;

impl DdlGenerator for Sqlite {
    fn generate(&self, schema: &DdlSchema<'_>) -> String {
        let buffer = schema
            .tables
            .iter()
            .map(|table| create_table(schema, table))
            .collect();
        statements(buffer)
    }
}

fn create_table(schema: &DdlSchema<'_>, table: &DdlTable<'_>) -> String {
    let mut lines = Vec::new();
    if !table.comment.is_empty() {
        lines.push(format!("-- {}", table.comment));
    }
    lines.push(format!("CREATE TABLE {}", table.name));
    lines.push("(".to_string());

    let constraints = constraints(schema, table);
    let widths = table.widths();
    for (i, column) in table.columns.iter().enumerate() {
        let comma = !constraints.is_empty() || i + 1 != table.columns.len();
        lines.push(format_column(column, widths, comma));
    }
    let last = constraints.len();
    for (i, constraint) in constraints.into_iter().enumerate() {
        let comma = if i + 1 == last { "" } else { "," };
        lines.push(format!("  {constraint}{comma}"));
    }
    lines.push(");".to_string());
    lines.join("\n")
}

fn format_column(column: &DdlColumn<'_>, (name, data_type): (usize, usize), comma: bool) -> String {
    let mut parts = vec![
        format!("  {}", pad(&column.name, name)),
        pad(&column.data_type, data_type),
        if column.not_null() { "NOT NULL" } else { "NULL    " }.to_string(),
    ];
    if let Some(default) = column.default() {
        parts.push(format!("DEFAULT {default}"));
    }
    let mut line = line(&parts);
    if comma {
        line.push(',');
    }
    if let Some(comment) = column.comment() {
        line.push_str(&format!(" -- {comment}"));
    }
    line
}

/// Primary key, unique and foreign key clauses of `table`
fn constraints(schema: &DdlSchema<'_>, table: &DdlTable<'_>) -> Vec<String> {
    let mut constraints = Vec::new();

    let primary_keys: Vec<&DdlColumn> = table
        .columns
        .iter()
        .filter(|column| column.column.option.primary_key)
        .collect();
    match primary_keys.as_slice() {
        [] => {}
        [column] if column.auto_increment() => {
            constraints.push(format!("PRIMARY KEY ({} AUTOINCREMENT)", column.name));
        }
        _ => constraints.push(format!("PRIMARY KEY ({})", join(&table.primary_keys()))),
    }

    for unique in &table.uniques {
        constraints.push(format!(
            "CONSTRAINT {} UNIQUE ({})",
            unique.name, unique.column
        ));
    }
    for foreign_key in schema.foreign_keys_of(table.id) {
        constraints.push(format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            foreign_key.name,
            join(&foreign_key.end_columns),
            foreign_key.start_table,
            join(&foreign_key.start_columns),
        ));
    }
    constraints
}
