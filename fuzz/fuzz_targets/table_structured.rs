//! Structured fuzzing of `CREATE TABLE` parsing and Go generation.
//!
//! This target builds well-formed table declarations with the `arbitrary`
//! crate, checks that every one of them parses, and renders every target.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_table_structured
//! ```

#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use ddlgen_codegen::{GenerationOptions, Targets, generate};
use ddlgen_schema::parse_schema;
use libfuzzer_sys::fuzz_target;

/// A generated column type.
#[derive(Debug, Arbitrary)]
enum FuzzColumnType {
    TinyInt,
    Int,
    BigInt,
    Double,
    Decimal(u8, u8),
    Varchar(u16),
    Text,
    Json,
    DateTime,
    Timestamp,
    Blob,
}

impl FuzzColumnType {
    fn to_sql(&self) -> String {
        match self {
            Self::TinyInt => "TINYINT".to_string(),
            Self::Int => "INT UNSIGNED".to_string(),
            Self::BigInt => "BIGINT".to_string(),
            Self::Double => "DOUBLE".to_string(),
            Self::Decimal(p, s) => format!("DECIMAL({}, {})", p, s),
            Self::Varchar(n) => format!("VARCHAR({})", n),
            Self::Text => "TEXT".to_string(),
            Self::Json => "JSON".to_string(),
            Self::DateTime => "DATETIME".to_string(),
            Self::Timestamp => "TIMESTAMP".to_string(),
            Self::Blob => "BLOB".to_string(),
        }
    }
}

/// A generated column attribute.
#[derive(Debug, Arbitrary)]
enum FuzzColumnAttribute {
    NotNull,
    Null,
    AutoIncrement,
    PrimaryKey,
    Unique,
    DefaultInt(i32),
    DefaultString(String),
    DefaultNow,
    OnUpdateNow,
    Comment(String),
}

impl FuzzColumnAttribute {
    fn to_sql(&self) -> String {
        match self {
            Self::NotNull => " NOT NULL".to_string(),
            Self::Null => " NULL".to_string(),
            Self::AutoIncrement => " AUTO_INCREMENT".to_string(),
            Self::PrimaryKey => " PRIMARY KEY".to_string(),
            Self::Unique => " UNIQUE".to_string(),
            Self::DefaultInt(i) => format!(" DEFAULT {}", i),
            Self::DefaultString(s) => format!(" DEFAULT '{}'", quote(s)),
            Self::DefaultNow => " DEFAULT CURRENT_TIMESTAMP".to_string(),
            Self::OnUpdateNow => " ON UPDATE CURRENT_TIMESTAMP".to_string(),
            Self::Comment(s) => format!(" COMMENT '{}'", quote(s)),
        }
    }
}

/// A generated column.
#[derive(Debug, Arbitrary)]
struct FuzzColumn {
    name: String,
    column_type: FuzzColumnType,
    attributes: Vec<FuzzColumnAttribute>,
}

/// A generated table-level key; members index into the column list.
#[derive(Debug, Arbitrary)]
enum FuzzKey {
    Primary(Vec<u8>),
    Unique(Vec<u8>),
    Index(Vec<u8>),
}

/// A generated table.
#[derive(Debug, Arbitrary)]
struct FuzzTable {
    name: String,
    columns: Vec<FuzzColumn>,
    keys: Vec<FuzzKey>,
    comment: Option<String>,
}

impl FuzzTable {
    fn to_sql(&self, index: usize) -> Option<String> {
        if self.columns.is_empty() {
            return None;
        }
        let names: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{}_{}", sanitize_identifier(&c.name), i))
            .collect();

        let mut definitions: Vec<String> = self
            .columns
            .iter()
            .zip(&names)
            .map(|(column, name)| {
                let attributes: String = column.attributes.iter().map(|a| a.to_sql()).collect();
                format!("  `{}` {}{}", name, column.column_type.to_sql(), attributes)
            })
            .collect();

        for (i, key) in self.keys.iter().enumerate() {
            let (keyword, members) = match key {
                FuzzKey::Primary(m) => ("PRIMARY KEY", m),
                FuzzKey::Unique(m) => ("UNIQUE KEY", m),
                FuzzKey::Index(m) => ("KEY", m),
            };
            if members.is_empty() {
                continue;
            }
            let members: Vec<String> = members
                .iter()
                .map(|m| format!("`{}`", names[*m as usize % names.len()]))
                .collect();
            let name = if keyword == "PRIMARY KEY" {
                String::new()
            } else {
                format!(" k_{}", i)
            };
            definitions.push(format!("  {}{} ({})", keyword, name, members.join(", ")));
        }

        let comment = self
            .comment
            .as_ref()
            .map(|c| format!(" COMMENT='{}'", quote(c)))
            .unwrap_or_default();

        Some(format!(
            "CREATE TABLE `{}_{}` (\n{}\n) ENGINE=InnoDB{};",
            sanitize_identifier(&self.name),
            index,
            definitions.join(",\n"),
            comment
        ))
    }
}

/// Sanitize a string to be a valid identifier.
fn sanitize_identifier(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if i == 0 {
            if c.is_ascii_alphabetic() {
                result.push(c);
            } else {
                result.push('x');
            }
        } else if c.is_ascii_alphanumeric() || c == '_' {
            result.push(c);
        }
    }
    if result.is_empty() {
        "col".to_string()
    } else {
        result
    }
}

/// Escape a string for a single-quoted SQL literal.
fn quote(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '\\' | '\n' | '\r'))
        .take(50)
        .collect::<String>()
        .replace('\'', "''")
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);

    if let Ok(tables) = Vec::<FuzzTable>::arbitrary(&mut unstructured) {
        let statements: Vec<String> = tables
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.to_sql(i))
            .collect();
        let ddl = statements.join("\n");

        let parsed = parse_schema(&ddl);
        assert!(parsed.skipped.is_empty(), "{:?}\n{}", parsed.skipped, ddl);
        assert_eq!(parsed.tables.len(), statements.len());

        let options = GenerationOptions::new("model")
            .with_banner(false)
            .with_targets(Targets::all());
        let _ = generate(&parsed.tables, &options);
    }
});
