//! PostgreSQL DDL

use super::helper::{DdlColumn, DdlSchema, DdlTable, ForeignKey, join, line, pad, quote};
use super::{DdlGenerator, statements};

pub struct PostgreSql;

impl DdlGenerator for PostgreSql {
    fn generate(&self, schema: &DdlSchema<'_>) -> String {
        let mut buffer = Vec::new();
        for table in &schema.tables {
            buffer.push(create_table(table));
            if let Some(comments) = comments(table) {
                buffer.push(comments);
            }
            for unique in &table.uniques {
                buffer.push(format!(
                    "ALTER TABLE {}\n  ADD CONSTRAINT {} UNIQUE ({});",
                    table.name, unique.name, unique.column
                ));
            }
        }
        for foreign_key in &schema.foreign_keys {
            buffer.push(alter_foreign_key(foreign_key));
        }
        statements(buffer)
    }
}

fn create_table(table: &DdlTable<'_>) -> String {
    let mut lines = vec![format!("CREATE TABLE {}", table.name), "(".to_string()];
    let primary_keys = table.primary_keys();
    let widths = table.widths();

    for (i, column) in table.columns.iter().enumerate() {
        let comma = !primary_keys.is_empty() || i + 1 != table.columns.len();
        lines.push(format_column(column, widths, comma));
    }
    if let Some(pk_name) = &table.pk_name {
        lines.push(format!(
            "  CONSTRAINT {pk_name} PRIMARY KEY ({})",
            join(&primary_keys)
        ));
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
    if column.auto_increment() {
        parts.push("GENERATED BY DEFAULT AS IDENTITY".to_string());
    } else if let Some(default) = column.default() {
        parts.push(format!("DEFAULT {default}"));
    }
    let mut line = line(&parts);
    if comma {
        line.push(',');
    }
    line
}

/// `COMMENT ON` statements for the table and its columns
fn comments(table: &DdlTable<'_>) -> Option<String> {
    let mut lines = Vec::new();
    if !table.comment.is_empty() {
        lines.push(format!(
            "COMMENT ON TABLE {} IS {};",
            table.name,
            quote(table.comment)
        ));
    }
    for column in &table.columns {
        if let Some(comment) = column.comment() {
            lines.push(format!(
                "COMMENT ON COLUMN {}.{} IS {};",
                table.name,
                column.name,
                quote(comment)
            ));
        }
    }
    (!lines.is_empty()).then(|| lines.join("\n"))
}

fn alter_foreign_key(foreign_key: &ForeignKey) -> String {
    format!(
        "ALTER TABLE {}\n  ADD CONSTRAINT {}\n    FOREIGN KEY ({})\n    REFERENCES {} ({});",
        foreign_key.end_table,
        foreign_key.name,
        join(&foreign_key.end_columns),
        foreign_key.start_table,
        join(&foreign_key.start_columns),
    )
}
