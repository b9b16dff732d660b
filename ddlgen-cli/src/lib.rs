//! ddlgen CLI - Command-line front end for the ddlgen code generator.
//!
//! This crate provides the `ddlgen` binary: Go code generation from MySQL
//! table declarations, DDL validation, and `__LINE__` marker stamping.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
