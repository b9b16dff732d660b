//! CLI command implementations.

pub mod generate;
pub mod line;
pub mod validate;
pub mod version;

use std::io::{self, BufRead};
use std::path::Path;

use ddlgen_schema::ParsedSchema;

use crate::error::{CliError, CliResult};
use crate::output;

/// Line that ends DDL typed on stdin.
pub const STDIN_TERMINATOR: &str = "EOF";

/// Read DDL from `input`, or from stdin when no file is given.
pub fn read_input(input: Option<&Path>) -> CliResult<String> {
    match input {
        Some(path) if !path.exists() => Err(CliError::Config(format!(
            "Input file not found: {}",
            path.display()
        ))),
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => Ok(read_until_terminator(io::stdin().lock())?),
    }
}

/// Read lines until end of input or a line that is exactly [`STDIN_TERMINATOR`].
pub fn read_until_terminator(reader: impl BufRead) -> io::Result<String> {
    let mut text = String::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim_end_matches('\r') == STDIN_TERMINATOR {
            break;
        }
        text.push_str(&line);
        text.push('\n');
    }
    Ok(text)
}

/// Print statements that failed to parse and warnings about parsed tables.
pub fn report_problems(parsed: &ParsedSchema) {
    for error in &parsed.skipped {
        output::warn(&format!("skipped: {}", error));
    }
    for warning in &parsed.warnings {
        output::warn(&warning.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_until_terminator() {
        let input = "CREATE TABLE a (id INT);\r\nEOF\nCREATE TABLE b (id INT);\n";
        assert_eq!(
            read_until_terminator(input.as_bytes()).unwrap(),
            "CREATE TABLE a (id INT);\n"
        );
    }

    #[test]
    fn test_read_until_end() {
        let input = "a\n  EOF\nb";
        assert_eq!(read_until_terminator(input.as_bytes()).unwrap(), "a\n  EOF\nb\n");
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_input(Some(Path::new("/definitely/not/here.sql")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
