//! Go code emitters for ddlgen.
//!
//! This crate turns parsed tables into Go source artifacts:
//!
//! - [`Target::Model`] - one struct per table, with `json` (and `gorm`) tags
//! - [`Target::Crud`] - `database/sql` functions keyed by the table's key groups
//! - [`Target::Router`] - gin handlers under `/api/<table>`
//! - [`Target::Service`] - a service layer over the data access code or gorm
//! - [`Target::Doc`] - a Markdown document with sample requests
//!
//! # Example
//!
//! ```rust
//! use ddlgen_codegen::{GenerationOptions, Target, Targets};
//! use ddlgen_schema::parse_schema;
//!
//! let parsed = parse_schema(
//!     "CREATE TABLE tb_dept (id INT AUTO_INCREMENT, name VARCHAR(18), PRIMARY KEY(id));",
//! );
//! let options = GenerationOptions::new("model").with_banner(false);
//!
//! let crud = Target::Crud.emit(&parsed.tables, &options).unwrap();
//! assert!(crud.contains("func CreateTbDept(db DataSource, s *TbDept) (int64, error) {"));
//!
//! let artifacts = ddlgen_codegen::generate(
//!     &parsed.tables,
//!     &options.with_targets(Targets::all()),
//! )
//! .unwrap();
//! assert_eq!(artifacts.len(), 5);
//! ```

pub mod error;
pub mod generators;
pub mod options;
pub mod types;

pub use error::{CodegenError, CodegenResult};
pub use generators::{Artifact, Target, generate};
pub use options::{
    CallingConvention, DataAccessStyle, GenerationOptions, LogicalDelete, Targets, TimeRounding,
};
