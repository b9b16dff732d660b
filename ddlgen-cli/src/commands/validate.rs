//! `ddlgen validate` command - Parse DDL and report what was found.

use ddlgen_schema::{ParsedSchema, ResolvedKeys, Table, group_suffix, parse_schema};

use crate::cli::ValidateArgs;
use crate::commands::{read_input, report_problems};
use crate::error::{CliError, CliResult};
use crate::output::{self, success};

/// Run the validate command
pub fn run(args: ValidateArgs) -> CliResult<()> {
    output::header("Validate DDL");

    if let Some(input) = &args.input {
        output::kv("Input", &input.display().to_string());
        output::newline();
    }

    let ddl = read_input(args.input.as_deref())?;
    let parsed = parse_schema(&ddl);

    if !parsed.tables.is_empty() {
        output::section("Tables");
        for table in &parsed.tables {
            describe_table(table);
        }
        output::newline();
    }

    report_problems(&parsed);
    summarize(&parsed);

    if !parsed.skipped.is_empty() {
        return Err(CliError::Schema(format!(
            "{} statement(s) failed to parse",
            parsed.skipped.len()
        )));
    }

    if parsed.warnings.is_empty() {
        success("DDL is valid!");
    } else {
        success("DDL is valid with warnings");
    }
    Ok(())
}

fn describe_table(table: &Table) {
    output::list_item(&format!("{} ({})", table.name, table.model_name()));

    let columns: Vec<String> = table
        .columns
        .iter()
        .map(|c| format!("{} {}", c.name, c.declared_type))
        .collect();
    output::sub_item(&format!("columns: {}", columns.join(", ")));

    let keys = ResolvedKeys::resolve(table);
    if let Some(primary) = keys.primary_group() {
        output::sub_item(&format!("primary: {}", group_suffix(primary)));
    }
    for group in &keys.unique_groups {
        output::sub_item(&format!("unique: {}", group_suffix(group)));
    }
    for group in &keys.index_groups {
        output::sub_item(&format!("index: {}", group_suffix(group)));
    }
}

fn summarize(parsed: &ParsedSchema) {
    output::section("Summary");
    output::kv("Tables", &parsed.tables.len().to_string());
    let columns: usize = parsed.tables.iter().map(|t| t.columns.len()).sum();
    output::kv("Columns", &columns.to_string());
    output::kv("Skipped", &parsed.skipped.len().to_string());
    output::kv("Warnings", &parsed.warnings.len().to_string());
    output::newline();
}
