//! TypeScript interfaces. Nullable columns become optional fields.

use super::{CodeGenerator, CodeTable};

pub struct TypeScript;

impl CodeGenerator for TypeScript {
    fn type_name(&self, primitive: &str) -> &'static str {
        match primitive {
            "int" | "long" | "float" | "double" | "decimal" => "number",
            "boolean" => "boolean",
            "date" | "dateTime" | "time" => "Date",
            "binary" => "Uint8Array",
            _ => "string",
        }
    }

    fn generate_table(&self, table: &CodeTable<'_>) -> String {
        let mut lines = Vec::new();
        if !table.comment.is_empty() {
            lines.push(format!("// {}", table.comment));
        }
        lines.push(format!("export interface {} {{", table.name));
        for column in &table.columns {
            if !column.comment.is_empty() {
                lines.push(format!("  // {}", column.comment));
            }
            let optional = if column.not_null { "" } else { "?" };
            lines.push(format!(
                "  {}{optional}: {};",
                column.name,
                self.type_name(column.primitive)
            ));
        }
        lines.push("}".to_string());
        lines.join("\n")
    }
}
