//! `ddlgen line` command - Stamp `__LINE__` markers with file and line.
//!
//! A marker such as `log.Printf("__LINE__ bad request")` on line 12 of
//! `router/router.go` becomes `"__LINE:router/router.go:12__ bad request"`.
//! Stamped markers are stamped again, so the command can be rerun after edits.

use std::path::{Path, PathBuf};

use regex_lite::{Captures, Regex};
use tracing::debug;

use crate::cli::LineArgs;
use crate::error::CliResult;
use crate::output::{self, success};

const MARKER: &str = r"(.*?__LINE)(.*?)(__.*?)";

/// Run the line command
pub fn run(args: LineArgs) -> CliResult<()> {
    let marker = Regex::new(MARKER)?;

    let mut files = Vec::new();
    for root in &args.paths {
        collect_go_files(root, &mut files)?;
    }

    let mut stamped = 0;
    for file in &files {
        if stamp_file(&marker, file)? {
            output::list_item(&display_path(file));
            stamped += 1;
        }
    }

    success(&format!("Stamped {} of {} Go files", stamped, files.len()));
    Ok(())
}

/// Collect `.go` files under `path` in a stable order.
fn collect_go_files(path: &Path, files: &mut Vec<PathBuf>) -> CliResult<()> {
    if path.is_file() {
        if path.extension().is_some_and(|ext| ext == "go") {
            files.push(path.to_path_buf());
        }
        return Ok(());
    }

    let mut entries = std::fs::read_dir(path)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();
    for entry in entries {
        collect_go_files(&entry, files)?;
    }
    Ok(())
}

/// Rewrite one file; returns whether its content changed.
fn stamp_file(marker: &Regex, path: &Path) -> CliResult<bool> {
    let content = std::fs::read_to_string(path)?;
    let stamped = stamp(marker, &content, &display_path(path));
    if stamped == content {
        return Ok(false);
    }
    debug!(path = %path.display(), "stamping line markers");
    std::fs::write(path, stamped)?;
    Ok(true)
}

/// Replace every marker in `content` with its location in `file`.
fn stamp(marker: &Regex, content: &str, file: &str) -> String {
    content
        .replace("\r\n", "\n")
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            marker
                .replace_all(line, |caps: &Captures| {
                    format!("{}:{}:{}{}", &caps[1], file, i + 1, &caps[3])
                })
                .into_owned()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Forward-slashed path without a leading `./`.
fn display_path(path: &Path) -> String {
    let text = path.display().to_string().replace('\\', "/");
    match text.strip_prefix("./") {
        Some(rest) => rest.to_string(),
        None => text,
    }
}
