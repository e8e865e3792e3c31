//! Java classes with Lombok `@Data`

use super::{CodeGenerator, CodeTable};

pub struct Java;

impl CodeGenerator for Java {
    fn type_name(&self, primitive: &str) -> &'static str {
        match primitive {
            "int" => "Integer",
            "long" => "Long",
            "float" => "Float",
            "double" => "Double",
            "decimal" => "BigDecimal",
            "boolean" => "Boolean",
            "date" => "LocalDate",
            "dateTime" => "LocalDateTime",
            "time" => "LocalTime",
            "uuid" => "UUID",
            "binary" => "byte[]",
            _ => "String",
        }
    }

    fn generate_table(&self, table: &CodeTable<'_>) -> String {
        let mut lines = Vec::new();
        if !table.comment.is_empty() {
            lines.push(format!("// {}", table.comment));
        }
        lines.push("@Data".to_string());
        lines.push(format!("public class {} {{", table.name));
        for column in &table.columns {
            if !column.comment.is_empty() {
                lines.push(format!("  // {}", column.comment));
            }
            lines.push(format!(
                "  private {} {};",
                self.type_name(column.primitive),
                column.name
            ));
        }
        lines.push("}".to_string());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{case, document};
    use crate::core::canvas::Language;
    use crate::core::generator_code::generate_code;

    #[test]
    fn test_java_class() {
        let code = generate_code(&document(), Language::Java, case());
        let expected = "\
@Data
public class Audit {
}

// people
@Data
public class UserAccount {
  private Long id;
  // shown
  private String displayName;
  private LocalDate bornOn;
}
";
        assert_eq!(code, expected);
    }
}
