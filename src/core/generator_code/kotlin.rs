//! Kotlin data classes. Nullable columns get nullable types.

use super::{CodeGenerator, CodeTable};

pub struct Kotlin;

impl CodeGenerator for Kotlin {
    fn type_name(&self, primitive: &str) -> &'static str {
        match primitive {
            "int" => "Int",
            "long" => "Long",
            "float" => "Float",
            "double" => "Double",
            "decimal" => "BigDecimal",
            "boolean" => "Boolean",
            "date" => "LocalDate",
            "dateTime" => "LocalDateTime",
            "time" => "LocalTime",
            "uuid" => "UUID",
            "binary" => "ByteArray",
            _ => "String",
        }
    }

    fn generate_table(&self, table: &CodeTable<'_>) -> String {
        let mut lines = Vec::new();
        if !table.comment.is_empty() {
            lines.push(format!("// {}", table.comment));
        }
        if table.columns.is_empty() {
            lines.push(format!("class {}", table.name));
            return lines.join("\n");
        }

        lines.push(format!("data class {}(", table.name));
        let last = table.columns.len();
        for (i, column) in table.columns.iter().enumerate() {
            if !column.comment.is_empty() {
                lines.push(format!("  // {}", column.comment));
            }
            let nullable = if column.not_null { "" } else { "?" };
            let comma = if i + 1 == last { "" } else { "," };
            lines.push(format!(
                "  val {}: {}{nullable}{comma}",
                column.name,
                self.type_name(column.primitive)
            ));
        }
        lines.push(")".to_string());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{case, document};
    use crate::core::canvas::Language;
    use crate::core::generator_code::generate_code;

    #[test]
    fn test_kotlin_data_class() {
        let code = generate_code(&document(), Language::Kotlin, case());
        let expected = "\
class Audit

// people
data class UserAccount(
  val id: Long,
  // shown
  val displayName: String?,
  val bornOn: LocalDate
)
";
        assert_eq!(code, expected);
    }
}
