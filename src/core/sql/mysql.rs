//! MySQL and MariaDB DDL

use super::helper::{DdlColumn, DdlSchema, DdlTable, ForeignKey, join, line, pad, quote};
use super::{DdlGenerator, statements};

pub struct MySql;

impl DdlGenerator for MySql {
    fn generate(&self, schema: &DdlSchema<'_>) -> String {
        let mut buffer = Vec::new();
        for table in &schema.tables {
            buffer.push(create_table(table));
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
    if !primary_keys.is_empty() {
        lines.push(format!("  PRIMARY KEY ({})", join(&primary_keys)));
    }
    if table.comment.is_empty() {
        lines.push(");".to_string());
    } else {
        lines.push(format!(") COMMENT {};", quote(table.comment)));
    }
    lines.join("\n")
}

fn format_column(column: &DdlColumn<'_>, (name, data_type): (usize, usize), comma: bool) -> String {
    let mut parts = vec![
        format!("  {}", pad(&column.name, name)),
        pad(&column.data_type, data_type),
        if column.not_null() { "NOT NULL" } else { "NULL    " }.to_string(),
    ];
    if column.auto_increment() {
        parts.push("AUTO_INCREMENT".to_string());
    } else if let Some(default) = column.default() {
        parts.push(format!("DEFAULT {default}"));
    }
    if let Some(comment) = column.comment() {
        parts.push(format!("COMMENT {}", quote(comment)));
    }
    let mut line = line(&parts);
    if comma {
        line.push(',');
    }
    line
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
