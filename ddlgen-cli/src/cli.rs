//! CLI argument definitions using clap.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use ddlgen_codegen::{LogicalDelete, TimeRounding};

/// ddlgen - Go code from MySQL table declarations
#[derive(Parser, Debug)]
#[command(name = "ddlgen")]
#[command(version)]
#[command(about = "Generate Go models, data access, routes and docs from MySQL DDL", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate Go code from table declarations
    Generate(GenerateArgs),

    /// Parse table declarations and report what was found
    Validate(ValidateArgs),

    /// Stamp `__LINE__` markers in Go files with their location
    Line(LineArgs),

    /// Display version information
    Version,
}

// =============================================================================
// Generate Command
// =============================================================================

/// Arguments for the `generate` command
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// DDL file to read (defaults to stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory (defaults to printing on stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only read lines A through B of the input (1-based, inclusive)
    #[arg(long, value_name = "A:B", value_parser = parse_line_range)]
    pub lines: Option<LineRange>,

    /// Go package of the model and data access files
    #[arg(short, long)]
    pub package: Option<String>,

    /// Go module path used to import generated packages
    #[arg(short, long)]
    pub module: Option<String>,

    /// Name of the service file and type
    #[arg(long)]
    pub service_name: Option<String>,

    /// Omit the generation banner
    #[arg(long)]
    pub no_banner: bool,

    /// Skip the model file
    #[arg(long)]
    pub no_model: bool,

    /// Skip the data access file
    #[arg(long)]
    pub no_crud: bool,

    /// Generate gin routes
    #[arg(long)]
    pub router: bool,

    /// Generate the service layer
    #[arg(long)]
    pub service: bool,

    /// Generate the API document
    #[arg(long)]
    pub doc: bool,

    /// Columns to add ascending list queries for
    #[arg(long, value_delimiter = ',')]
    pub asc: Vec<String>,

    /// Columns to add descending list queries for
    #[arg(long, value_delimiter = ',')]
    pub desc: Vec<String>,

    /// Delete by setting a column instead of removing rows (col=value)
    #[arg(long, value_name = "COL=VALUE")]
    pub logic: Option<LogicalDelete>,

    /// Truncate time values written to the database (s, ms, us)
    #[arg(long)]
    pub round: Option<TimeRounding>,

    /// Use gorm in models and services
    #[arg(long)]
    pub orm: bool,

    /// Panic on errors instead of returning them
    #[arg(long)]
    pub panic: bool,

    /// Do not run gofmt on written files
    #[arg(long)]
    pub no_fmt: bool,

    /// Configuration file (defaults to ./ddlgen.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Inclusive, 1-based range of input lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    /// Keep only the lines inside the range.
    pub fn select(&self, text: &str) -> String {
        let mut selected: Vec<&str> = text
            .lines()
            .skip(self.start - 1)
            .take(self.end + 1 - self.start)
            .collect();
        selected.push("");
        selected.join("\n")
    }
}

fn parse_line_range(s: &str) -> Result<LineRange, String> {
    let (start, end) = s
        .split_once(':')
        .ok_or_else(|| format!("expected A:B, got `{s}`"))?;
    let start: usize = start
        .trim()
        .parse()
        .map_err(|_| format!("invalid start line `{start}`"))?;
    let end: usize = end
        .trim()
        .parse()
        .map_err(|_| format!("invalid end line `{end}`"))?;
    if start == 0 || end < start {
        return Err(format!("invalid line range `{s}`"));
    }
    Ok(LineRange { start, end })
}

// =============================================================================
// Validate Command
// =============================================================================

/// Arguments for the `validate` command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// DDL file to read (defaults to stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

// =============================================================================
// Line Command
// =============================================================================

/// Arguments for the `line` command
#[derive(Args, Debug)]
pub struct LineArgs {
    /// Files or directories to stamp
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,
}
