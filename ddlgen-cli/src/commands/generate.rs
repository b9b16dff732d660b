//! `ddlgen generate` command - Render Go code from table declarations.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use ddlgen_codegen::{Artifact, CallingConvention, DataAccessStyle, GenerationOptions};
use ddlgen_schema::parse_schema;
use tracing::{debug, info};

use crate::cli::GenerateArgs;
use crate::commands::{read_input, report_problems};
use crate::config::{Config, GeneratorConfig};
use crate::error::{CliError, CliResult};
use crate::output::{self, success};

/// Name of the Go formatter looked up on `PATH`.
const GOFMT: &str = "gofmt";

/// Everything the command needs after merging config and flags.
#[derive(Debug)]
pub struct Plan {
    pub options: GenerationOptions,
    pub output: Option<PathBuf>,
    pub format: bool,
}

impl Plan {
    /// Apply command-line flags on top of the config file.
    pub fn resolve(args: &GenerateArgs, config: GeneratorConfig) -> Self {
        let mut options = config.options();

        if let Some(package) = &args.package {
            options.package = package.clone();
        }
        if let Some(module) = &args.module {
            options.module = Some(module.clone());
        }
        if let Some(name) = &args.service_name {
            options.service_name = name.clone();
        }
        if args.no_banner {
            options.banner = false;
        }
        if args.no_model {
            options.targets.model = false;
        }
        if args.no_crud {
            options.targets.crud = false;
        }
        options.targets.router |= args.router;
        options.targets.service |= args.service;
        options.targets.doc |= args.doc;
        if !args.asc.is_empty() {
            options.order_asc = args.asc.clone();
        }
        if !args.desc.is_empty() {
            options.order_desc = args.desc.clone();
        }
        if let Some(logic) = &args.logic {
            options.logical_delete = Some(logic.clone());
        }
        if let Some(round) = args.round {
            options.rounding = Some(round);
        }
        if args.orm {
            options.style = DataAccessStyle::Orm;
        }
        if args.panic {
            options.convention = CallingConvention::Panic;
        }

        Self {
            options,
            output: args.output.clone().or(config.output),
            format: config.format && !args.no_fmt,
        }
    }
}

/// Run the generate command
pub fn run(args: GenerateArgs) -> CliResult<()> {
    let started = Instant::now();
    let cwd = std::env::current_dir()?;
    let config = Config::discover(args.config.as_deref(), &cwd)?;
    let plan = Plan::resolve(&args, config.generator);

    let mut ddl = read_input(args.input.as_deref())?;
    if let Some(range) = args.lines {
        debug!(start = range.start, end = range.end, "selecting input lines");
        ddl = range.select(&ddl);
    }

    let parsed = parse_schema(&ddl);
    report_problems(&parsed);
    if parsed.tables.is_empty() {
        return Err(CliError::Schema("No table declarations found".to_string()));
    }

    let artifacts = ddlgen_codegen::generate(&parsed.tables, &plan.options)?;

    let Some(output_dir) = &plan.output else {
        print_artifacts(&artifacts);
        return Ok(());
    };

    output::header("Generate Go Code");
    if let Some(input) = &args.input {
        output::kv("Input", &input.display().to_string());
    }
    output::kv("Output", &output_dir.display().to_string());
    output::kv("Tables", &parsed.tables.len().to_string());
    output::newline();

    output::step(1, 2, "Writing files...");
    let written = write_artifacts(output_dir, &artifacts)?;

    output::step(2, 2, "Formatting...");
    if plan.format {
        let go_files: Vec<&PathBuf> = written
            .iter()
            .filter(|path| path.extension().is_some_and(|ext| ext == "go"))
            .collect();
        format_go_files(&go_files);
    } else {
        output::dim("  skipped");
    }

    output::newline();
    output::section("Generated files");
    for file in &written {
        let relative = file.strip_prefix(&cwd).unwrap_or(file);
        output::list_item(&relative.display().to_string());
    }

    output::newline();
    success(&format!(
        "Generated {} files in {:.2}s",
        written.len(),
        started.elapsed().as_secs_f64()
    ));

    Ok(())
}

/// Print artifacts on stdout, each headed by its path when there are several.
fn print_artifacts(artifacts: &[Artifact]) {
    let headed = artifacts.len() > 1;
    for (i, artifact) in artifacts.iter().enumerate() {
        if headed {
            if i > 0 {
                println!();
            }
            println!("==> {} <==", artifact.path.display());
        }
        print!("{}", artifact.content);
    }
}

/// Write artifacts under `root`, creating directories as needed.
pub fn write_artifacts(root: &Path, artifacts: &[Artifact]) -> CliResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = root.join(&artifact.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &artifact.content)?;
        info!(target_name = %artifact.target, path = %path.display(), "wrote artifact");
        written.push(path);
    }
    Ok(written)
}

/// Run gofmt over `files` when it is installed. Failures only warn.
fn format_go_files(files: &[&PathBuf]) {
    if files.is_empty() {
        return;
    }
    let Some(gofmt) = find_on_path(GOFMT) else {
        output::dim("  gofmt not found, files left as generated");
        return;
    };

    match Command::new(&gofmt).arg("-w").args(files).status() {
        Ok(status) if status.success() => debug!(files = files.len(), "gofmt done"),
        Ok(status) => output::warn(&format!("gofmt exited with {}", status)),
        Err(err) => output::warn(&format!("failed to run gofmt: {}", err)),
    }
}

/// Locate an executable on `PATH`.
fn find_on_path(name: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .flat_map(|dir| {
            [
                dir.join(name),
                dir.join(format!("{name}{}", std::env::consts::EXE_SUFFIX)),
            ]
        })
        .find(|candidate| candidate.is_file())
}
