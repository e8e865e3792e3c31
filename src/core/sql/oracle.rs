//! Oracle DDL. Column defaults precede the NOT NULL constraint.

use super::helper::{DdlColumn, DdlSchema, DdlTable, ForeignKey, join, line, pad, quote};
use super::{DdlGenerator, statements};

pub struct Oracle;

impl DdlGenerator for Oracle {
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
    ];
    if column.auto_increment() {
        parts.push("GENERATED BY DEFAULT ON NULL AS IDENTITY".to_string());
    } else if let Some(default) = column.default() {
        parts.push(format!("DEFAULT {default}"));
    }
    if column.not_null() {
        parts.push("NOT NULL".to_string());
    }
    let mut line = line(&parts);
    if comma {
        line.push(',');
    }
    line
}

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

#[cfg(test)]
mod tests {
    use crate::core::canvas::Database;
    use crate::core::document::{Document, DocumentData};
    use crate::core::schema::{Column, Table};
    use crate::core::sql::generate_ddl;

    #[test]
    fn test_default_before_not_null() {
        let document = Document::from_data(
            DocumentData::new().with_table(
                Table::new("item")
                    .add_column(Column::new("id", "long").primary_key().auto_increment())
                    .add_column(Column::new("qty", "int").not_null().with_default("0"))
                    .add_column(Column::new("sku", "string").unique()),
            ),
        )
        .unwrap();

        let ddl = generate_ddl(&document, Database::Oracle);
        assert!(ddl.contains("  id  NUMBER(19)    GENERATED BY DEFAULT ON NULL AS IDENTITY NOT NULL,"));
        assert!(ddl.contains("  qty NUMBER(10)    DEFAULT 0 NOT NULL,"));
        assert!(ddl.contains("  sku VARCHAR2(255),"));
        assert!(ddl.contains("  CONSTRAINT PK_item PRIMARY KEY (id)\n);"));
        assert!(ddl.contains("ALTER TABLE item\n  ADD CONSTRAINT UQ_sku UNIQUE (sku);"));
    }
}
