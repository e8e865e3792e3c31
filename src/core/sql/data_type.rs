//! Logical data types and their native spelling per dialect.

use crate::core::canvas::Database;

/// Logical types understood by every dialect and code language
pub const LOGICAL_TYPES: [&str; 14] = [
    "int", "long", "float", "double", "decimal", "boolean", "string", "lob", "date", "dateTime",
    "time", "uuid", "json", "binary",
];

fn logical(data_type: &str) -> Option<&'static str> {
    let data_type = data_type.trim();
    LOGICAL_TYPES
        .iter()
        .copied()
        .find(|logical| logical.eq_ignore_ascii_case(data_type))
}

/// Map a column data type to the dialect's native type.
/// Anything that is not a logical type passes through verbatim.
pub fn native_type(data_type: &str, database: Database) -> String {
    let Some(logical) = logical(data_type) else {
        return data_type.to_string();
    };
    let native = match database {
        Database::MySQL | Database::MariaDB => mysql_type(logical),
        Database::PostgreSQL => postgresql_type(logical),
        Database::Oracle => oracle_type(logical),
        Database::Mssql => mssql_type(logical),
        Database::SQLite => sqlite_type(logical),
    };
    native.to_string()
}

fn mysql_type(logical: &str) -> &'static str {
    match logical {
        "int" => "INT",
        "long" => "BIGINT",
        "float" => "FLOAT",
        "double" => "DOUBLE",
        "decimal" => "DECIMAL",
        "boolean" => "BOOLEAN",
        "lob" => "LONGTEXT",
        "date" => "DATE",
        "dateTime" => "DATETIME",
        "time" => "TIME",
        "uuid" => "CHAR(36)",
        "json" => "JSON",
        "binary" => "BLOB",
        _ => "VARCHAR(255)",
    }
}

fn postgresql_type(logical: &str) -> &'static str {
    match logical {
        "int" => "INTEGER",
        "long" => "BIGINT",
        "float" => "REAL",
        "double" => "DOUBLE PRECISION",
        "decimal" => "NUMERIC",
        "boolean" => "BOOLEAN",
        "lob" => "TEXT",
        "date" => "DATE",
        "dateTime" => "TIMESTAMP",
        "time" => "TIME",
        "uuid" => "UUID",
        "json" => "JSONB",
        "binary" => "BYTEA",
        _ => "VARCHAR(255)",
    }
}

fn oracle_type(logical: &str) -> &'static str {
    match logical {
        "int" => "NUMBER(10)",
        "long" => "NUMBER(19)",
        "float" => "BINARY_FLOAT",
        "double" => "BINARY_DOUBLE",
        "decimal" => "NUMBER",
        "boolean" => "NUMBER(1)",
        "lob" | "json" => "CLOB",
        "date" => "DATE",
        "dateTime" | "time" => "TIMESTAMP",
        "uuid" => "RAW(16)",
        "binary" => "BLOB",
        _ => "VARCHAR2(255)",
    }
}

fn mssql_type(logical: &str) -> &'static str {
    match logical {
        "int" => "INT",
        "long" => "BIGINT",
        "float" => "REAL",
        "double" => "FLOAT",
        "decimal" => "DECIMAL",
        "boolean" => "BIT",
        "lob" | "json" => "NVARCHAR(MAX)",
        "date" => "DATE",
        "dateTime" => "DATETIME2",
        "time" => "TIME",
        "uuid" => "UNIQUEIDENTIFIER",
        "binary" => "VARBINARY(MAX)",
        _ => "NVARCHAR(255)",
    }
}

fn sqlite_type(logical: &str) -> &'static str {
    match logical {
        "int" | "long" | "boolean" => "INTEGER",
        "float" | "double" => "REAL",
        "decimal" => "NUMERIC",
        "binary" => "BLOB",
        _ => "TEXT",
    }
}

/// Logical type of a column data type: the logical name itself, or the
/// logical type a native type of `database` stands for. Unknown types are
/// treated as strings.
pub fn primitive_type(data_type: &str, database: Database) -> &'static str {
    if let Some(logical) = logical(data_type) {
        return logical;
    }
    let lower = data_type.trim().to_lowercase();
    let base = lower.split('(').next().unwrap_or(&lower).trim();

    let primitive = match database {
        Database::MySQL | Database::MariaDB => mysql_primitive(base),
        Database::PostgreSQL => postgresql_primitive(base),
        Database::Oracle => oracle_primitive(base, &lower),
        Database::Mssql => mssql_primitive(base, &lower),
        Database::SQLite => sqlite_primitive(base),
    };
    primitive.unwrap_or("string")
}

fn mysql_primitive(base: &str) -> Option<&'static str> {
    Some(match base {
        "int" | "integer" | "tinyint" | "smallint" | "mediumint" => "int",
        "bigint" => "long",
        "float" => "float",
        "double" | "real" => "double",
        "decimal" | "numeric" | "dec" | "fixed" => "decimal",
        "boolean" | "bool" | "bit" => "boolean",
        "char" | "varchar" | "tinytext" | "text" | "enum" | "set" => "string",
        "mediumtext" | "longtext" => "lob",
        "date" | "year" => "date",
        "datetime" | "timestamp" => "dateTime",
        "time" => "time",
        "json" => "json",
        "binary" | "varbinary" | "tinyblob" | "blob" | "mediumblob" | "longblob" => "binary",
        _ => return None,
    })
}

fn postgresql_primitive(base: &str) -> Option<&'static str> {
    Some(match base {
        "int" | "int2" | "int4" | "integer" | "smallint" | "serial" | "smallserial" => "int",
        "bigint" | "int8" | "bigserial" => "long",
        "real" | "float4" => "float",
        "double precision" | "float8" => "double",
        "numeric" | "decimal" | "money" => "decimal",
        "boolean" | "bool" => "boolean",
        "char" | "character" | "varchar" | "character varying" => "string",
        "text" => "lob",
        "date" => "date",
        "timestamp" | "timestamptz" => "dateTime",
        "time" | "timetz" => "time",
        "uuid" => "uuid",
        "json" | "jsonb" => "json",
        "bytea" => "binary",
        _ => return None,
    })
}

fn oracle_primitive(base: &str, lower: &str) -> Option<&'static str> {
    Some(match base {
        "number" if lower == "number(1)" => "boolean",
        "number" if lower == "number(19)" => "long",
        "number" if lower.contains(',') || lower == "number" => "decimal",
        "number" | "integer" | "smallint" => "int",
        "binary_float" => "float",
        "binary_double" | "float" => "double",
        "char" | "nchar" | "varchar2" | "nvarchar2" => "string",
        "clob" | "nclob" | "long" => "lob",
        "date" => "date",
        "timestamp" => "dateTime",
        "blob" | "raw" => "binary",
        _ => return None,
    })
}

fn mssql_primitive(base: &str, lower: &str) -> Option<&'static str> {
    Some(match base {
        "nvarchar" | "varchar" if lower.ends_with("(max)") => "lob",
        "int" | "smallint" | "tinyint" => "int",
        "bigint" => "long",
        "real" => "float",
        "float" => "double",
        "decimal" | "numeric" | "money" | "smallmoney" => "decimal",
        "bit" => "boolean",
        "char" | "nchar" | "varchar" | "nvarchar" => "string",
        "text" | "ntext" => "lob",
        "date" => "date",
        "datetime" | "datetime2" | "smalldatetime" | "datetimeoffset" => "dateTime",
        "time" => "time",
        "uniqueidentifier" => "uuid",
        "binary" | "varbinary" | "image" => "binary",
        _ => return None,
    })
}

fn sqlite_primitive(base: &str) -> Option<&'static str> {
    Some(match base {
        "integer" | "int" => "int",
        "real" => "double",
        "numeric" => "decimal",
        "text" => "string",
        "blob" => "binary",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_type_per_dialect() {
        assert_eq!(native_type("int", Database::MySQL), "INT");
        assert_eq!(native_type("string", Database::PostgreSQL), "VARCHAR(255)");
        assert_eq!(native_type("dateTime", Database::Mssql), "DATETIME2");
        assert_eq!(native_type("boolean", Database::Oracle), "NUMBER(1)");
        assert_eq!(native_type("uuid", Database::SQLite), "TEXT");
    }

    #[test]
    fn test_native_type_passes_unknown_through() {
        assert_eq!(native_type("VARCHAR(40)", Database::MySQL), "VARCHAR(40)");
        assert_eq!(native_type("", Database::MySQL), "");
    }

    #[test]
    fn test_logical_names_ignore_case() {
        assert_eq!(native_type("DateTime", Database::PostgreSQL), "TIMESTAMP");
        assert_eq!(primitive_type("INT", Database::MySQL), "int");
    }

    #[test]
    fn test_primitive_type_reverse_lookup() {
        assert_eq!(primitive_type("VARCHAR(100)", Database::MySQL), "string");
        assert_eq!(primitive_type("bigint", Database::PostgreSQL), "long");
        assert_eq!(primitive_type("NUMBER(1)", Database::Oracle), "boolean");
        assert_eq!(primitive_type("NUMBER(10,2)", Database::Oracle), "decimal");
        assert_eq!(primitive_type("NVARCHAR(MAX)", Database::Mssql), "lob");
        assert_eq!(primitive_type("geometry", Database::MySQL), "string");
    }
}
