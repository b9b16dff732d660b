//! CLI error types and result alias.

use miette::Diagnostic;
use thiserror::Error;

use ddlgen_codegen::CodegenError;
use ddlgen_schema::SchemaError;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// IO error
    #[error("IO error: {0}")]
    #[diagnostic(code(ddlgen::io))]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    #[diagnostic(code(ddlgen::config))]
    Config(String),

    /// Schema error
    #[error("Schema error: {0}")]
    #[diagnostic(code(ddlgen::schema))]
    Schema(String),

    /// Code generation error
    #[error("Codegen error: {0}")]
    #[diagnostic(code(ddlgen::codegen))]
    Codegen(String),

    /// Command error
    #[error("Command error: {0}")]
    #[diagnostic(code(ddlgen::command))]
    Command(String),
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::Config(format!("Failed to parse TOML: {}", err))
    }
}

impl From<SchemaError> for CliError {
    fn from(err: SchemaError) -> Self {
        CliError::Schema(err.to_string())
    }
}

impl From<CodegenError> for CliError {
    fn from(err: CodegenError) -> Self {
        CliError::Codegen(err.to_string())
    }
}

impl From<regex_lite::Error> for CliError {
    fn from(err: regex_lite::Error) -> Self {
        CliError::Command(format!("Invalid pattern: {}", err))
    }
}
