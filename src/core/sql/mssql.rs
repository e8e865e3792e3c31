//! SQL Server DDL, batches separated by `GO`

use super::helper::{DdlColumn, DdlSchema, DdlTable, ForeignKey, join, line, pad, quote};
use super::{DdlGenerator, statements};

pub struct Mssql;

impl DdlGenerator for Mssql {
    fn generate(&self, schema: &DdlSchema<'_>) -> String {
        let mut buffer = Vec::new();
        for table in &schema.tables {
            buffer.push(create_table(table));
            for unique in &table.uniques {
                buffer.push(format!(
                    "ALTER TABLE {}\n  ADD CONSTRAINT {} UNIQUE ({})\nGO",
                    table.name, unique.name, unique.column
                ));
            }
            buffer.extend(comments(table));
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
    lines.push(")\nGO".to_string());
    lines.join("\n")
}

fn format_column(column: &DdlColumn<'_>, (name, data_type): (usize, usize), comma: bool) -> String {
    let mut parts = vec![
        format!("  {}", pad(&column.name, name)),
        pad(&column.data_type, data_type),
    ];
    if column.not_null() {
        parts.push("NOT NULL".to_string());
    }
    if column.auto_increment() {
        parts.push("IDENTITY(1,1)".to_string());
    } else if let Some(default) = column.default() {
        parts.push(format!("DEFAULT {default}"));
    }
    let mut line = line(&parts);
    if comma {
        line.push(',');
    }
    line
}

/// One `sp_addextendedproperty` batch per commented table or column
fn comments(table: &DdlTable<'_>) -> Vec<String> {
    let mut batches = Vec::new();
    if !table.comment.is_empty() {
        batches.push(format!(
            "EXECUTE sys.sp_addextendedproperty 'MS_Description',\n  {}, 'user', dbo, 'table', {}\nGO",
            quote(table.comment),
            quote(&table.name)
        ));
    }
    for column in &table.columns {
        if let Some(comment) = column.comment() {
            batches.push(format!(
                "EXECUTE sys.sp_addextendedproperty 'MS_Description',\n  {}, 'user', dbo, 'table', {}, 'column', {}\nGO",
                quote(comment),
                quote(&table.name),
                quote(&column.name)
            ));
        }
    }
    batches
}

fn alter_foreign_key(foreign_key: &ForeignKey) -> String {
    format!(
        "ALTER TABLE {}\n  ADD CONSTRAINT {}\n    FOREIGN KEY ({})\n    REFERENCES {} ({})\nGO",
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
    fn test_column_comment_names_the_column() {
        let document = Document::from_data(
            DocumentData::new().with_table(
                Table::new("account")
                    .add_column(Column::new("id", "int").primary_key().auto_increment())
                    .add_column(Column::new("balance", "decimal").with_comment("in cents")),
            ),
        )
        .unwrap();

        let ddl = generate_ddl(&document, Database::Mssql);
        assert!(ddl.contains("  id      INT     NOT NULL IDENTITY(1,1),"));
        assert!(ddl.contains("  balance DECIMAL,"));
        assert!(ddl.contains("  CONSTRAINT PK_account PRIMARY KEY (id)\n)\nGO"));
        assert!(ddl.contains(
            "  'in cents', 'user', dbo, 'table', 'account', 'column', 'balance'\nGO"
        ));
    }
}
