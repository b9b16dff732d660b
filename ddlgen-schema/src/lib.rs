//! # ddlgen-schema
//!
//! Front end of the ddlgen code generator.
//!
//! This crate provides:
//! - A statement splitter that respects quotes and comments
//! - A pest grammar for MySQL `CREATE TABLE` statements
//! - The table model shared by every code emitter
//! - Identifier case conversions and column type categories
//! - Resolution of the key groups that drive accessor generation
//!
//! ## Example
//!
//! ```rust
//! use ddlgen_schema::{parse_schema, ResolvedKeys};
//!
//! let parsed = parse_schema(
//!     "CREATE TABLE tb_dept (id INT AUTO_INCREMENT, name VARCHAR(18), PRIMARY KEY(id));",
//! );
//! let table = &parsed.tables[0];
//! assert_eq!(table.model_name(), "TbDept");
//!
//! let keys = ResolvedKeys::resolve(table);
//! assert_eq!(keys.unique_groups.len(), 1);
//! ```

pub mod ast;
pub mod error;
pub mod keys;
pub mod naming;
pub mod parser;
pub mod splitter;

pub use ast::*;
pub use error::{SchemaError, SchemaResult, SchemaWarning};
pub use keys::{ResolvedKeys, group_suffix};
pub use parser::{ParsedSchema, is_table_declaration, parse_schema, parse_schema_file, parse_table};
pub use splitter::split_statements;
