//! Error types for code generation.

// These warnings are false positives - the fields are used by derive macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Result type for code generation.
pub type CodegenResult<T> = Result<T, CodegenError>;

/// Errors that can occur while building options or rendering targets.
#[derive(Error, Debug, Diagnostic)]
pub enum CodegenError {
    /// An option value could not be understood.
    #[error("invalid value `{value}` for {option}: {message}")]
    #[diagnostic(code(ddlgen::codegen::invalid_option))]
    InvalidOption {
        option: &'static str,
        value: String,
        message: String,
    },

    /// A document body could not be serialized.
    #[error("failed to serialize document sample")]
    #[diagnostic(code(ddlgen::codegen::json))]
    Json(#[from] serde_json::Error),
}

impl CodegenError {
    /// Create an invalid option error.
    pub fn invalid_option(
        option: &'static str,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidOption {
            option,
            value: value.into(),
            message: message.into(),
        }
    }
}
