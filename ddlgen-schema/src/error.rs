//! Error and warning types for schema parsing.

// These warnings are false positives - the fields are used by derive macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

use crate::ast::KeyKind;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while reading or parsing schema source.
#[derive(Error, Debug, Diagnostic)]
pub enum SchemaError {
    /// Error reading a file.
    #[error("failed to read file: {path}")]
    #[diagnostic(code(ddlgen::schema::io_error))]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A statement looked like a table declaration but did not parse.
    #[error("syntax error in statement: {message}")]
    #[diagnostic(
        code(ddlgen::schema::syntax_error),
        help("the statement is skipped, remaining statements are still processed")
    )]
    SyntaxError {
        #[source_code]
        src: String,
        #[label("error here")]
        span: miette::SourceSpan,
        message: String,
    },
}

impl SchemaError {
    /// Create a syntax error with source location.
    pub fn syntax(
        src: impl Into<String>,
        offset: usize,
        len: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::SyntaxError {
            src: src.into(),
            span: (offset, len).into(),
            message: message.into(),
        }
    }

    /// Build a syntax error from a pest error raised while parsing `src`.
    pub(crate) fn from_pest<R: pest::RuleType>(src: &str, error: &pest::error::Error<R>) -> Self {
        let (offset, len) = match error.location {
            pest::error::InputLocation::Pos(pos) => (pos, 0),
            pest::error::InputLocation::Span((start, end)) => (start, end.saturating_sub(start)),
        };
        Self::syntax(src, offset, len, error.variant.message().into_owned())
    }
}

/// Problems that do not stop a table from being produced.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum SchemaWarning {
    /// A key group names a column the table does not have.
    #[error("table `{table}`: {kind} key member `{column}` does not name a column and was dropped")]
    #[diagnostic(code(ddlgen::schema::unknown_key_column), severity(Warning))]
    UnknownKeyColumn {
        table: String,
        kind: KeyKind,
        column: String,
    },

    /// Every member of a key group was dropped.
    #[error("table `{table}`: {kind} key group has no known columns and was dropped")]
    #[diagnostic(code(ddlgen::schema::empty_key_group), severity(Warning))]
    EmptyKeyGroup { table: String, kind: KeyKind },

    /// Two unique groups resolve to the same columns; both are kept.
    #[error("table `{table}`: key ({columns}) is declared more than once")]
    #[diagnostic(
        code(ddlgen::schema::duplicate_key_group),
        severity(Warning),
        help("accessors are generated once per declaration, so the generated code will repeat them")
    )]
    DuplicateKeyGroup { table: String, columns: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = SchemaError::syntax("CREATE TABLE", 6, 6, "expected `(`");
        assert_eq!(err.to_string(), "syntax error in statement: expected `(`");
        if let SchemaError::SyntaxError { span, .. } = err {
            assert_eq!(span.offset(), 6);
            assert_eq!(span.len(), 6);
        } else {
            panic!("expected SyntaxError");
        }
    }

    #[test]
    fn test_io_error_display() {
        let err = SchemaError::IoError {
            path: "schema.sql".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "failed to read file: schema.sql");
    }

    #[test]
    fn test_unknown_key_column_display() {
        let warning = SchemaWarning::UnknownKeyColumn {
            table: "tb_dept".to_string(),
            kind: KeyKind::Primary,
            column: "uid".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "table `tb_dept`: primary key member `uid` does not name a column and was dropped"
        );
    }

    #[test]
    fn test_duplicate_key_group_display() {
        let warning = SchemaWarning::DuplicateKeyGroup {
            table: "t".to_string(),
            columns: "a, b".to_string(),
        };
        assert_eq!(warning.to_string(), "table `t`: key (a, b) is declared more than once");
    }

    #[test]
    fn test_warning_severity() {
        let warning = SchemaWarning::EmptyKeyGroup {
            table: "t".to_string(),
            kind: KeyKind::Index,
        };
        assert_eq!(warning.severity(), Some(miette::Severity::Warning));
    }
}
