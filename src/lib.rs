//! # ddlgen
//!
//! Generate Go code from MySQL `CREATE TABLE` statements.
//!
//! ddlgen provides:
//! - A statement splitter and `CREATE TABLE` parser tolerant of comments and
//!   everything that is not a table declaration
//! - Go models with `json`/`form` (and `gorm`) tags
//! - `database/sql` data access functions keyed by primary, unique and index keys
//! - gin handlers, a service layer and a Markdown API document
//!
//! ## Quick Start
//!
//! ```rust
//! use ddlgen::prelude::*;
//!
//! let parsed = parse_schema(
//!     "CREATE TABLE tb_dept (
//!         id INT AUTO_INCREMENT,
//!         dept_name VARCHAR(18) NOT NULL,
//!         PRIMARY KEY (id)
//!     );",
//! );
//! assert!(parsed.is_clean());
//!
//! let options = GenerationOptions::new("model")
//!     .with_banner(false)
//!     .with_targets(Targets::all());
//! let artifacts = generate(&parsed.tables, &options).unwrap();
//!
//! let model = &artifacts[0];
//! assert_eq!(model.target, Target::Model);
//! assert!(model.content.contains("type TbDept struct {"));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Statement splitting, parsing and the table model.
pub mod schema {
    pub use ddlgen_schema::*;
}

/// Go code emitters and generation options.
pub mod codegen {
    pub use ddlgen_codegen::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::codegen::{
        Artifact, CallingConvention, DataAccessStyle, GenerationOptions, LogicalDelete, Target,
        Targets, TimeRounding, generate,
    };
    pub use crate::schema::{
        Column, ParsedSchema, ResolvedKeys, Table, TypeCategory, parse_schema, parse_schema_file,
    };
}

// Re-export key types at the crate root
pub use codegen::{CodegenError, generate};
pub use schema::{ParsedSchema, SchemaError, parse_schema};
