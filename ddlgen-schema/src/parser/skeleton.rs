//! Span skeletons built from the parse tree, and the fill pass that turns
//! them into tables.
//!
//! The grammar runs over an upper-cased copy of the statement. Walking the
//! tree only records where things are; [`TableSkeleton::fill`] then slices
//! the original statement so identifiers and comments keep their case.

use pest::iterators::Pair;

use super::Rule;
use crate::ast::{Column, ColumnFlags, KeyGroup, KeyKind, Span, Table};
use crate::error::SchemaWarning;

/// A column whose text is not resolved yet.
#[derive(Debug, Clone, Default)]
pub(crate) struct ColumnSkeleton {
    pub name: Option<Span>,
    pub declared_type: Option<Span>,
    pub flags: ColumnFlags,
    pub comment: Option<Span>,
    pub default: Option<Span>,
}

/// A table whose text is not resolved yet.
#[derive(Debug, Clone, Default)]
pub(crate) struct TableSkeleton {
    pub name: Option<Span>,
    pub comment: Option<Span>,
    pub columns: Vec<ColumnSkeleton>,
    pub keys: Vec<(KeyKind, Vec<Span>)>,
}

impl TableSkeleton {
    /// Walk a `create_table` pair.
    pub fn visit(pair: Pair<'_, Rule>) -> Self {
        let mut skeleton = Self::default();

        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::table_name => {
                    // `schema.table`: the last identifier is the table.
                    skeleton.name = item
                        .into_inner()
                        .filter(|p| p.as_rule() == Rule::identifier)
                        .last()
                        .map(|p| p.as_span().into());
                }
                Rule::column_def => skeleton.columns.push(visit_column(item)),
                Rule::table_constraint => {
                    if let Some(key) = visit_constraint(item) {
                        skeleton.keys.push(key);
                    }
                }
                Rule::table_comment => skeleton.comment = first_span(item, Rule::string_literal),
                _ => {}
            }
        }

        skeleton
    }

    /// Resolve every span against the original statement.
    ///
    /// Key members are matched case-insensitively against the columns. A
    /// member that matches nothing is dropped and reported in `warnings`.
    pub fn fill(&self, source: &str, warnings: &mut Vec<SchemaWarning>) -> Table {
        let name = self
            .name
            .map(|span| unquote_identifier(span.slice(source)))
            .unwrap_or_default();
        let mut table = Table::new(name);
        table.comment = self.comment.map(|span| unquote_string(span.slice(source)));

        for column in &self.columns {
            table.add_column(column.fill(source));
        }

        for (kind, members) in &self.keys {
            let mut indices = Vec::with_capacity(members.len());
            for member in members {
                let member = unquote_identifier(member.slice(source));
                match table.column_index(&member) {
                    Some(index) => indices.push(index),
                    None => {
                        tracing::warn!(table = %table.name, %kind, column = %member, "dropping unknown key member");
                        warnings.push(SchemaWarning::UnknownKeyColumn {
                            table: table.name.to_string(),
                            kind: *kind,
                            column: member,
                        });
                    }
                }
            }

            if indices.is_empty() {
                warnings.push(SchemaWarning::EmptyKeyGroup {
                    table: table.name.to_string(),
                    kind: *kind,
                });
            } else {
                table.key_groups_mut(*kind).push(KeyGroup::new(indices));
            }
        }

        table
    }
}

impl ColumnSkeleton {
    fn fill(&self, source: &str) -> Column {
        let name = self
            .name
            .map(|span| unquote_identifier(span.slice(source)))
            .unwrap_or_default();
        let declared_type = self.declared_type.map(|span| span.slice(source)).unwrap_or_default();

        let mut column = Column::new(name, declared_type).with_flags(self.flags);
        column.comment = self.comment.map(|span| unquote_string(span.slice(source)));
        column.default = self.default.map(|span| strip_parens(span.slice(source).trim()).to_string());
        column
    }
}

fn visit_column(pair: Pair<'_, Rule>) -> ColumnSkeleton {
    let mut column = ColumnSkeleton::default();

    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::identifier if column.name.is_none() => column.name = Some(item.as_span().into()),
            Rule::data_type => column.declared_type = first_span(item, Rule::type_name),
            Rule::not_null => column.flags.is_not_null = true,
            Rule::auto_increment => column.flags.is_auto_increment = true,
            Rule::on_update => column.flags.is_on_update = true,
            Rule::primary_attr => column.flags.is_primary = true,
            Rule::unique_attr => column.flags.is_unique = true,
            Rule::comment_attr => column.comment = first_span(item, Rule::string_literal),
            Rule::default_clause => {
                if let Some(value) = item.into_inner().find(|p| p.as_rule() == Rule::default_value) {
                    column.flags.has_default = true;
                    column.flags.is_current_timestamp_default = value
                        .clone()
                        .into_inner()
                        .any(|p| p.as_rule() == Rule::current_timestamp);
                    column.default = Some(value.as_span().into());
                }
            }
            _ => {}
        }
    }

    column
}

fn visit_constraint(pair: Pair<'_, Rule>) -> Option<(KeyKind, Vec<Span>)> {
    let definition = pair
        .into_inner()
        .find(|p| p.as_rule() != Rule::constraint_name)?;

    let kind = match definition.as_rule() {
        Rule::primary_key_def => KeyKind::Primary,
        Rule::unique_key_def => KeyKind::Unique,
        Rule::index_def => KeyKind::Index,
        _ => return None,
    };

    let parts = definition
        .into_inner()
        .find(|p| p.as_rule() == Rule::key_parts)?;
    let members = parts
        .into_inner()
        .filter_map(|part| first_span(part, Rule::identifier))
        .collect();

    Some((kind, members))
}

fn first_span(pair: Pair<'_, Rule>, rule: Rule) -> Option<Span> {
    pair.into_inner()
        .find(|p| p.as_rule() == rule)
        .map(|p| p.as_span().into())
}

/// Strip backticks from a quoted identifier.
pub(crate) fn unquote_identifier(text: &str) -> String {
    let text = text.trim();
    match text.strip_prefix('`').and_then(|t| t.strip_suffix('`')) {
        Some(inner) => inner.replace("``", "`"),
        None => text.to_string(),
    }
}

/// Strip the quotes of a string literal and resolve its escapes.
pub(crate) fn unquote_string(text: &str) -> String {
    let text = text.trim();
    let Some(quote) = text.chars().next().filter(|c| *c == '\'' || *c == '"') else {
        return text.to_string();
    };
    let inner = text
        .strip_prefix(quote)
        .and_then(|t| t.strip_suffix(quote))
        .unwrap_or(text);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('0') => out.push('\0'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            },
            c if c == quote && chars.peek() == Some(&quote) => {
                chars.next();
                out.push(quote);
            }
            c => out.push(c),
        }
    }
    out
}

/// Remove one pair of parentheses enclosing the whole expression.
fn strip_parens(text: &str) -> &str {
    let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) else {
        return text;
    };

    let mut depth = 0i32;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return text;
                }
            }
            _ => {}
        }
    }
    if depth == 0 { inner.trim() } else { text }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote_identifier() {
        assert_eq!(unquote_identifier("`DePt_Name`"), "DePt_Name");
        assert_eq!(unquote_identifier("plain"), "plain");
        assert_eq!(unquote_identifier("`we``ird`"), "we`ird");
    }

    #[test]
    fn test_unquote_string() {
        assert_eq!(unquote_string("'部门表'"), "部门表");
        assert_eq!(unquote_string("'it''s'"), "it's");
        assert_eq!(unquote_string(r"'it\'s'"), "it's");
        assert_eq!(unquote_string("\"say \"\"hi\"\"\""), "say \"hi\"");
        assert_eq!(unquote_string("''"), "");
    }

    #[test]
    fn test_strip_parens() {
        assert_eq!(strip_parens("(uuid())"), "uuid()");
        assert_eq!(strip_parens("(1) + (2)"), "(1) + (2)");
        assert_eq!(strip_parens("0"), "0");
        assert_eq!(strip_parens("((0))"), "(0)");
    }
}
