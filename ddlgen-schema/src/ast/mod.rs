//! Intermediate representation of parsed `CREATE TABLE` statements.
//!
//! A [`Table`] is built once by the parser and never mutated afterwards.
//! Key groups refer to columns by index, so resolving a group always yields
//! the same [`Column`] values that appear in [`Table::columns`].

mod table;
mod types;

pub use table::*;
pub use types::*;
