//! Source spans and column type categories.

use serde::{Deserialize, Serialize};

/// A byte range in a statement.
///
/// Spans are recorded while walking the parse tree of the upper-cased copy
/// and resolved against the original text afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Start offset in bytes.
    pub start: usize,
    /// End offset in bytes.
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Get the length of the span.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Slice `source` at this span. Out of range spans yield an empty string.
    pub fn slice<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.start..self.end).unwrap_or_default()
    }
}

impl From<(usize, usize)> for Span {
    fn from((start, end): (usize, usize)) -> Self {
        Self { start, end }
    }
}

impl From<pest::Span<'_>> for Span {
    fn from(span: pest::Span<'_>) -> Self {
        Self::new(span.start(), span.end())
    }
}

/// Semantic category of a declared column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeCategory {
    /// Small integer used as a flag (`TINYINT`, `BOOL`).
    Bool,
    /// 32-bit integer.
    Int32,
    /// 64-bit integer.
    Int64,
    /// Floating point or fixed point number.
    Float,
    /// Character data.
    Text,
    /// Date and time values.
    Temporal,
    /// Anything the mapping does not know about.
    Opaque,
}

impl TypeCategory {
    /// Classify a declared type keyword such as `VARCHAR` or `bigint`.
    pub fn classify(declared_type: &str) -> Self {
        match declared_type.trim().to_ascii_uppercase().as_str() {
            "TINYINT" | "BOOL" | "BOOLEAN" => Self::Bool,
            "SMALLINT" | "MEDIUMINT" | "INT" | "INTEGER" | "YEAR" => Self::Int32,
            "BIGINT" => Self::Int64,
            "FLOAT" | "DOUBLE" | "REAL" | "DECIMAL" | "DEC" | "NUMERIC" => Self::Float,
            "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM"
            | "SET" | "JSON" | "TIME" => Self::Text,
            "DATE" | "DATETIME" | "TIMESTAMP" => Self::Temporal,
            _ => Self::Opaque,
        }
    }

    /// Whether values of this category are written unquoted in SQL.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Bool | Self::Int32 | Self::Int64 | Self::Float)
    }
}

impl std::fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float => "float",
            Self::Text => "text",
            Self::Temporal => "temporal",
            Self::Opaque => "opaque",
        };
        f.write_str(name)
    }
}
