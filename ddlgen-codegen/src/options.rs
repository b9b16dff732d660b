//! Generation options shared by every emitter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use ddlgen_schema::{Column, naming};

use crate::error::{CodegenError, CodegenResult};
use crate::types::go_string;

/// Logical delete values that have a known opposite.
const UNDO_VALUES: [(&str, &str); 6] = [
    ("1", "0"),
    ("0", "1"),
    ("'1'", "'0'"),
    ("'0'", "'1'"),
    ("\"1\"", "\"0\""),
    ("\"0\"", "\"1\""),
];

/// How generated code talks to the database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataAccessStyle {
    /// `database/sql` with hand-built statements.
    #[default]
    Plain,
    /// `gorm` models and services.
    Orm,
}

/// How generated code reports failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallingConvention {
    /// Fallible functions return an `error` as their last result.
    #[default]
    #[serde(rename = "error")]
    ErrorReturn,
    /// Fallible functions panic; handlers recover.
    Panic,
}

impl CallingConvention {
    /// Statement checking `err` right after a fallible call.
    ///
    /// `zeros` are the leading return values of the error style, each
    /// followed by `, `.
    pub(crate) fn check(self, indent: &str, zeros: &str) -> String {
        match self {
            Self::ErrorReturn => format!(
                "{indent}if err != nil {{\n{indent}\treturn {zeros}err\n{indent}}}\n"
            ),
            Self::Panic => format!("{indent}assertErrorNil(err)\n"),
        }
    }

    /// Statement giving up with the error expression `error`.
    pub(crate) fn fail(self, indent: &str, zeros: &str, error: &str) -> String {
        match self {
            Self::ErrorReturn => format!("{indent}return {zeros}{error}\n"),
            Self::Panic => format!("{indent}panic({error})\n"),
        }
    }

    /// Statement giving up unless `expr`, an `error` expression, is nil.
    pub(crate) fn guard(self, indent: &str, zeros: &str, expr: &str) -> String {
        match self {
            Self::ErrorReturn => format!(
                "{indent}if err := {expr}; err != nil {{\n{indent}\treturn {zeros}err\n{indent}}}\n"
            ),
            Self::Panic => format!("{indent}assertErrorNil({expr})\n"),
        }
    }

    /// Statements ending a function with a call in the error style.
    ///
    /// `values` name the call's results before its trailing `error`.
    pub(crate) fn forward(self, indent: &str, values: &[&str], call: &str) -> String {
        match (self, values) {
            (Self::ErrorReturn, _) => format!("{indent}return {call}\n"),
            (Self::Panic, []) => format!("{indent}assertErrorNil({call})\n"),
            (Self::Panic, values) => {
                let values = values.join(", ");
                format!(
                    "{indent}{values}, err := {call}\n{indent}assertErrorNil(err)\n{indent}return {values}\n"
                )
            }
        }
    }

    /// Statement returning `values` from a function that succeeded.
    pub(crate) fn ok(self, indent: &str, values: &[&str]) -> String {
        let mut all: Vec<&str> = values.to_vec();
        if self == Self::ErrorReturn {
            all.push("nil");
        }
        if all.is_empty() {
            format!("{indent}return\n")
        } else {
            format!("{indent}return {}\n", all.join(", "))
        }
    }

    /// Result list of a function whose successful results are `results`.
    pub(crate) fn results(self, results: &[&str]) -> String {
        let mut all: Vec<&str> = results.to_vec();
        if self == Self::ErrorReturn {
            all.push("error");
        }
        match all.as_slice() {
            [] => String::new(),
            [single] => format!(" {single}"),
            many => format!(" ({})", many.join(", ")),
        }
    }
}

/// Precision that temporal arguments are truncated to before binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeRounding {
    /// Whole seconds.
    Second,
    /// Milliseconds.
    Millisecond,
    /// Microseconds.
    Microsecond,
}

impl TimeRounding {
    /// The Go `time.Duration` constant for this unit.
    pub fn go_duration(&self) -> &'static str {
        match self {
            Self::Second => "time.Second",
            Self::Millisecond => "time.Millisecond",
            Self::Microsecond => "time.Microsecond",
        }
    }
}

impl FromStr for TimeRounding {
    type Err = CodegenError;

    fn from_str(s: &str) -> CodegenResult<Self> {
        match s.trim() {
            "s" | "second" => Ok(Self::Second),
            "ms" | "milli" | "millisecond" => Ok(Self::Millisecond),
            "us" | "μs" | "micro" | "microsecond" => Ok(Self::Microsecond),
            other => Err(CodegenError::invalid_option(
                "round",
                other,
                "expected one of s, ms, us",
            )),
        }
    }
}

impl TryFrom<String> for TimeRounding {
    type Error = CodegenError;

    fn try_from(value: String) -> CodegenResult<Self> {
        value.parse()
    }
}

impl From<TimeRounding> for String {
    fn from(value: TimeRounding) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeRounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Second => write!(f, "s"),
            Self::Millisecond => write!(f, "ms"),
            Self::Microsecond => write!(f, "us"),
        }
    }
}

/// Marks rows as deleted by writing `value` into `column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogicalDelete {
    /// Column holding the flag.
    pub column: String,
    /// Value written on delete, without quotes.
    pub value: String,
}

impl LogicalDelete {
    /// Create a logical delete setting.
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Whether this setting applies to `column`.
    pub fn applies_to(&self, column: &Column) -> bool {
        column.is_named(&self.column)
    }

    /// The value that undoes a delete, if the configured value has one.
    pub fn undo_value(&self) -> Option<&'static str> {
        UNDO_VALUES
            .iter()
            .find(|(value, _)| *value == self.value)
            .map(|(_, opposite)| *opposite)
    }

    /// The delete value as a SQL literal for `column`.
    ///
    /// Numeric columns take the value as is, others get it single-quoted.
    pub fn sql_literal(&self, column: &Column) -> String {
        sql_literal(column, &self.value)
    }

    /// The undo value as a SQL literal for `column`.
    pub fn undo_sql_literal(&self, column: &Column) -> Option<String> {
        self.undo_value().map(|value| sql_literal(column, value))
    }
}

impl FromStr for LogicalDelete {
    type Err = CodegenError;

    fn from_str(s: &str) -> CodegenResult<Self> {
        let (column, value) = s.split_once('=').ok_or_else(|| {
            CodegenError::invalid_option("logical delete", s, "expected `column=value`")
        })?;
        let column = column.trim().trim_matches('`');
        let value = value.trim().trim_matches(|c| c == '\'' || c == '"');
        if column.is_empty() || value.is_empty() {
            return Err(CodegenError::invalid_option(
                "logical delete",
                s,
                "column and value must not be empty",
            ));
        }
        Ok(Self::new(column, value))
    }
}

impl TryFrom<String> for LogicalDelete {
    type Error = CodegenError;

    fn try_from(value: String) -> CodegenResult<Self> {
        value.parse()
    }
}

impl From<LogicalDelete> for String {
    fn from(value: LogicalDelete) -> Self {
        value.to_string()
    }
}

impl fmt::Display for LogicalDelete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.column, self.value)
    }
}

/// Render `value` as a SQL literal suited to the column type.
pub(crate) fn sql_literal(column: &Column, value: &str) -> String {
    let value = value.trim_matches(|c| c == '\'' || c == '"');
    if column.category().is_numeric() {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "''"))
    }
}

/// Render a SQL literal produced by [`sql_literal`] as a Go literal.
pub(crate) fn go_literal(sql_literal: &str) -> String {
    match sql_literal.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        Some(text) => go_string(&text.replace("''", "'")),
        None => sql_literal.to_string(),
    }
}

/// Which artifacts to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Targets {
    /// Record types.
    pub model: bool,
    /// Data access functions.
    pub crud: bool,
    /// HTTP handlers.
    pub router: bool,
    /// Service layer.
    pub service: bool,
    /// Markdown API document.
    pub doc: bool,
}

impl Default for Targets {
    fn default() -> Self {
        Self {
            model: true,
            crud: true,
            router: false,
            service: false,
            doc: false,
        }
    }
}

impl Targets {
    /// Every target enabled.
    pub fn all() -> Self {
        Self {
            model: true,
            crud: true,
            router: true,
            service: true,
            doc: true,
        }
    }

    /// No target enabled.
    pub fn none() -> Self {
        Self {
            model: false,
            crud: false,
            router: false,
            service: false,
            doc: false,
        }
    }
}

/// Read-only configuration handed to every emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Go package holding the models and data access functions.
    pub package: String,
    /// Go module path used to import the generated packages.
    pub module: Option<String>,
    /// Name of the service file; also prefixes the service type.
    pub service_name: String,
    /// Put a generation banner at the top of every artifact.
    pub banner: bool,
    /// Artifacts to render.
    pub targets: Targets,
    /// Columns for ascending list variants.
    pub order_asc: Vec<String>,
    /// Columns for descending list variants.
    pub order_desc: Vec<String>,
    /// Logical delete column and value.
    pub logical_delete: Option<LogicalDelete>,
    /// Truncation applied to temporal arguments.
    pub rounding: Option<TimeRounding>,
    /// Plain SQL or gorm.
    pub style: DataAccessStyle,
    /// Error values or panics.
    pub convention: CallingConvention,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::new("model")
    }
}

impl GenerationOptions {
    /// Create options for the given model package.
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            module: None,
            service_name: "service".to_string(),
            banner: true,
            targets: Targets::default(),
            order_asc: Vec::new(),
            order_desc: Vec::new(),
            logical_delete: None,
            rounding: None,
            style: DataAccessStyle::default(),
            convention: CallingConvention::default(),
        }
    }

    /// Set the Go module path.
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Set the service file name.
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Turn the banner on or off.
    pub fn with_banner(mut self, banner: bool) -> Self {
        self.banner = banner;
        self
    }

    /// Choose the artifacts to render.
    pub fn with_targets(mut self, targets: Targets) -> Self {
        self.targets = targets;
        self
    }

    /// Set the ascending order columns.
    pub fn with_order_asc<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_asc = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the descending order columns.
    pub fn with_order_desc<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_desc = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Enable logical delete.
    pub fn with_logical_delete(mut self, logical_delete: LogicalDelete) -> Self {
        self.logical_delete = Some(logical_delete);
        self
    }

    /// Truncate temporal arguments.
    pub fn with_rounding(mut self, rounding: TimeRounding) -> Self {
        self.rounding = Some(rounding);
        self
    }

    /// Choose plain SQL or gorm.
    pub fn with_style(mut self, style: DataAccessStyle) -> Self {
        self.style = style;
        self
    }

    /// Choose error values or panics.
    pub fn with_convention(mut self, convention: CallingConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Name of the generated service type.
    pub fn service_type(&self) -> String {
        if self.service_name.eq_ignore_ascii_case("service") {
            "Service".to_string()
        } else {
            format!("{}Service", naming::to_upper_camel(&self.service_name))
        }
    }

    /// Import path of a generated package, when a module is configured.
    pub(crate) fn import_path(&self, package: &str) -> Option<String> {
        self.module
            .as_deref()
            .map(|module| format!("{}/{package}", module.trim_end_matches('/')))
    }
}
