//! Pest grammar parser for `CREATE TABLE` statements.

use pest_derive::Parser;

/// The DDL parser. Expects keywords in upper case.
#[derive(Parser)]
#[grammar = "parser/ddl.pest"]
pub struct DdlParser;
