//! Tables, columns and key groups.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::TypeCategory;
use crate::naming;

/// Constraint flags carried by a column definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFlags {
    /// Inline `PRIMARY KEY`.
    pub is_primary: bool,
    /// Inline `UNIQUE`.
    pub is_unique: bool,
    /// `AUTO_INCREMENT`.
    pub is_auto_increment: bool,
    /// `NOT NULL`.
    pub is_not_null: bool,
    /// Any `DEFAULT` clause.
    pub has_default: bool,
    /// `DEFAULT CURRENT_TIMESTAMP` or an equivalent.
    pub is_current_timestamp_default: bool,
    /// `ON UPDATE CURRENT_TIMESTAMP`.
    pub is_on_update: bool,
}

/// A column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name exactly as written, without backticks.
    pub name: SmolStr,
    /// Upper-cased type keyword, without arguments (`VARCHAR`, `BIGINT`).
    pub declared_type: SmolStr,
    /// Constraint flags.
    pub flags: ColumnFlags,
    /// Text of the `COMMENT` clause.
    pub comment: Option<String>,
    /// Default literal as written (`0`, `'abc'`, `CURRENT_TIMESTAMP`).
    pub default: Option<String>,
}

impl Column {
    /// Create a column with no constraints.
    pub fn new(name: impl Into<SmolStr>, declared_type: impl AsRef<str>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.as_ref().to_ascii_uppercase().into(),
            flags: ColumnFlags::default(),
            comment: None,
            default: None,
        }
    }

    /// Set the constraint flags.
    pub fn with_flags(mut self, flags: ColumnFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set the default literal. Keeps `has_default` in sync.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self.flags.has_default = true;
        self
    }

    /// Semantic category of the declared type.
    pub fn category(&self) -> TypeCategory {
        TypeCategory::classify(&self.declared_type)
    }

    /// Required columns never hold NULL.
    pub fn is_required(&self) -> bool {
        self.flags.is_not_null || self.flags.is_primary
    }

    /// Whether the database fills the value on insert.
    pub fn is_generated_on_insert(&self) -> bool {
        self.flags.is_auto_increment || self.flags.is_current_timestamp_default
    }

    /// Default that is a literal rather than the current timestamp.
    pub fn has_literal_default(&self) -> bool {
        self.flags.has_default && !self.flags.is_current_timestamp_default
    }

    /// Upper camel case name used for generated fields.
    pub fn field_name(&self) -> String {
        naming::to_upper_camel(&self.name)
    }

    /// Snake case name used on the wire.
    pub fn wire_name(&self) -> String {
        naming::to_snake(&self.field_name())
    }

    /// Case-insensitive name comparison, ignoring backticks.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim().trim_matches('`'))
    }
}

/// The kind of a declared key group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyKind {
    /// `PRIMARY KEY (...)`
    Primary,
    /// `UNIQUE KEY (...)`
    Unique,
    /// `KEY (...)` or `INDEX (...)`
    Index,
}

impl std::fmt::Display for KeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyKind::Primary => write!(f, "primary"),
            KeyKind::Unique => write!(f, "unique"),
            KeyKind::Index => write!(f, "index"),
        }
    }
}

/// An ordered group of columns, stored as indices into [`Table::columns`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyGroup {
    columns: Vec<usize>,
}

impl KeyGroup {
    /// Create a group from column indices.
    pub fn new(columns: Vec<usize>) -> Self {
        Self { columns }
    }

    /// Column indices in declaration order.
    pub fn indices(&self) -> &[usize] {
        &self.columns
    }

    /// Number of columns in the group.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the group is empty.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A table declared by a `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name exactly as written, without backticks or schema prefix.
    pub name: SmolStr,
    /// Columns in declaration order.
    pub columns: Vec<Column>,
    /// Table-level `PRIMARY KEY` groups.
    pub primary_key_groups: Vec<KeyGroup>,
    /// Table-level `UNIQUE` groups.
    pub unique_key_groups: Vec<KeyGroup>,
    /// Table-level `KEY` / `INDEX` groups.
    pub index_key_groups: Vec<KeyGroup>,
    /// Text of the table `COMMENT` option.
    pub comment: Option<String>,
}

impl Table {
    /// Create an empty table.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key_groups: Vec::new(),
            unique_key_groups: Vec::new(),
            index_key_groups: Vec::new(),
            comment: None,
        }
    }

    /// Add a column.
    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Builder form of [`Table::add_column`].
    pub fn with_column(mut self, column: Column) -> Self {
        self.add_column(column);
        self
    }

    /// Builder for a table-level key group given by column names.
    ///
    /// Names that do not resolve are skipped.
    pub fn with_key(mut self, kind: KeyKind, names: &[&str]) -> Self {
        let indices: Vec<usize> = names.iter().filter_map(|n| self.column_index(n)).collect();
        if !indices.is_empty() {
            self.key_groups_mut(kind).push(KeyGroup::new(indices));
        }
        self
    }

    /// Table-level groups of the given kind.
    pub fn key_groups(&self, kind: KeyKind) -> &[KeyGroup] {
        match kind {
            KeyKind::Primary => &self.primary_key_groups,
            KeyKind::Unique => &self.unique_key_groups,
            KeyKind::Index => &self.index_key_groups,
        }
    }

    pub(crate) fn key_groups_mut(&mut self, kind: KeyKind) -> &mut Vec<KeyGroup> {
        match kind {
            KeyKind::Primary => &mut self.primary_key_groups,
            KeyKind::Unique => &mut self.unique_key_groups,
            KeyKind::Index => &mut self.index_key_groups,
        }
    }

    /// Index of the column with the given name, compared case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.is_named(name))
    }

    /// Get a column by name, compared case-insensitively.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    /// Resolve a key group to its columns, in group order.
    pub fn group_columns(&self, group: &KeyGroup) -> Vec<&Column> {
        group
            .indices()
            .iter()
            .filter_map(|&i| self.columns.get(i))
            .collect()
    }

    /// Upper camel case name used for the generated record type.
    pub fn model_name(&self) -> String {
        naming::to_upper_camel(&self.name)
    }

    /// Kebab case name used in route paths.
    pub fn route_name(&self) -> String {
        naming::to_kebab(&self.name)
    }
}
