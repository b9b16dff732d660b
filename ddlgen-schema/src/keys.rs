//! Key group resolution.
//!
//! Generated accessors are keyed by column groups. A table yields one
//! accessor per unique group and one list function per index group:
//!
//! - unique groups: every inline `PRIMARY KEY` / `UNIQUE` column as a
//!   singleton, in column order, then the table-level primary key groups,
//!   then the table-level unique groups;
//! - index groups: the table-level `KEY` / `INDEX` groups.

use crate::ast::{Column, KeyGroup, Table};
use crate::naming;

/// Key groups of one table, resolved to columns.
#[derive(Debug, Clone)]
pub struct ResolvedKeys<'t> {
    /// Groups that identify at most one row.
    pub unique_groups: Vec<Vec<&'t Column>>,
    /// Groups that identify any number of rows.
    pub index_groups: Vec<Vec<&'t Column>>,
    primary: Option<Vec<&'t Column>>,
}

impl<'t> ResolvedKeys<'t> {
    /// Resolve the key groups of a table.
    pub fn resolve(table: &'t Table) -> Self {
        let resolve_all = |groups: &[KeyGroup]| -> Vec<Vec<&'t Column>> {
            groups
                .iter()
                .map(|g| table.group_columns(g))
                .filter(|g| !g.is_empty())
                .collect()
        };

        let singletons = table
            .columns
            .iter()
            .filter(|c| c.flags.is_primary || c.flags.is_unique)
            .map(|c| vec![c]);
        let primary_groups = resolve_all(&table.primary_key_groups);
        let unique_groups = singletons
            .chain(primary_groups.iter().cloned())
            .chain(resolve_all(&table.unique_key_groups))
            .collect();

        let primary = table
            .columns
            .iter()
            .find(|c| c.flags.is_primary)
            .map(|c| vec![c])
            .or_else(|| primary_groups.into_iter().next());

        Self {
            unique_groups,
            index_groups: resolve_all(&table.index_key_groups),
            primary,
        }
    }

    /// The group used for single-row operations of the service layer.
    ///
    /// The first inline primary key column, or else the first table-level
    /// primary key group.
    pub fn primary_group(&self) -> Option<&[&'t Column]> {
        self.primary.as_deref()
    }

    /// Unique groups that repeat an earlier group's column sequence.
    pub fn duplicate_groups(&self) -> Vec<&[&'t Column]> {
        let mut duplicates = Vec::new();
        for (i, group) in self.unique_groups.iter().enumerate() {
            let repeated = self.unique_groups[..i]
                .iter()
                .any(|earlier| same_columns(earlier, group));
            if repeated {
                duplicates.push(group.as_slice());
            }
        }
        duplicates
    }
}

/// Function name suffix for a group: upper camel column names, concatenated.
pub fn group_suffix(columns: &[&Column]) -> String {
    columns.iter().map(|c| naming::to_upper_camel(&c.name)).collect()
}

/// Comma separated column names, for diagnostics.
pub fn group_label(columns: &[&Column]) -> String {
    columns
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn same_columns(a: &[&Column], b: &[&Column]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.name == y.name)
}
