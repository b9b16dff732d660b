//! `CREATE TABLE` extraction.
//!
//! Statements are split first, then every statement that declares a table
//! goes through the pest grammar. A statement that fails to parse is
//! reported and skipped; it never stops the remaining statements.

mod grammar;
mod skeleton;

use std::path::Path;
use std::sync::LazyLock;

use pest::Parser;
use regex_lite::Regex;

use crate::ast::Table;
use crate::error::{SchemaError, SchemaResult, SchemaWarning};
use crate::keys::{ResolvedKeys, group_label};
use crate::splitter::split_statements;

pub use grammar::{DdlParser, Rule};
use skeleton::TableSkeleton;

static TABLE_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^CREATE\s+(TEMPORARY\s+)?TABLE\b").expect("table declaration pattern")
});

/// Everything extracted from one schema source.
#[derive(Debug, Default)]
pub struct ParsedSchema {
    /// Tables in declaration order.
    pub tables: Vec<Table>,
    /// Table declarations that did not parse.
    pub skipped: Vec<SchemaError>,
    /// Problems found in tables that were still produced.
    pub warnings: Vec<SchemaWarning>,
}

impl ParsedSchema {
    /// Get a table by name, compared case-insensitively.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// True when nothing was skipped and nothing was reported.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.warnings.is_empty()
    }
}

/// Whether a statement declares a table.
pub fn is_table_declaration(statement: &str) -> bool {
    TABLE_DECLARATION.is_match(&statement.trim().to_ascii_uppercase())
}

/// Parse every table declared in `input`.
pub fn parse_schema(input: &str) -> ParsedSchema {
    let mut parsed = ParsedSchema::default();

    for statement in split_statements(input) {
        match extract_table(&statement, &mut parsed.warnings) {
            Ok(Some(table)) => parsed.tables.push(table),
            Ok(None) => {
                tracing::debug!(statement = statement.trim(), "skipping non-table statement");
            }
            Err(err) => {
                tracing::warn!(error = %err, "skipping statement that failed to parse");
                parsed.skipped.push(err);
            }
        }
    }

    parsed
}

/// Parse every table declared in a file.
pub fn parse_schema_file(path: impl AsRef<Path>) -> SchemaResult<ParsedSchema> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(parse_schema(&content))
}

/// Parse a single statement.
///
/// Returns `Ok(None)` when the statement is not a table declaration.
/// Warnings are logged and otherwise dropped; use [`parse_schema`] to
/// collect them.
pub fn parse_table(statement: &str) -> SchemaResult<Option<Table>> {
    extract_table(statement, &mut Vec::new())
}

fn extract_table(
    statement: &str,
    warnings: &mut Vec<SchemaWarning>,
) -> SchemaResult<Option<Table>> {
    if !is_table_declaration(statement) {
        return Ok(None);
    }

    // ASCII upper-casing keeps every byte offset in place.
    let folded = statement.to_ascii_uppercase();
    let root = DdlParser::parse(Rule::create_table, &folded)
        .map_err(|e| SchemaError::from_pest(statement, &e))?
        .next()
        .ok_or_else(|| SchemaError::syntax(statement, 0, statement.len(), "empty parse tree"))?;

    let table = TableSkeleton::visit(root).fill(statement, warnings);

    for group in ResolvedKeys::resolve(&table).duplicate_groups() {
        let columns = group_label(group);
        tracing::warn!(table = %table.name, %columns, "duplicate key group");
        warnings.push(SchemaWarning::DuplicateKeyGroup {
            table: table.name.to_string(),
            columns,
        });
    }

    tracing::debug!(table = %table.name, columns = table.columns.len(), "parsed table");
    Ok(Some(table))
}
