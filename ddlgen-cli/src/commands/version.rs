//! `ddlgen version` command - Display version information.

use ddlgen_codegen::{GenerationOptions, Target, Targets};

use crate::error::CliResult;
use crate::output::{self, kv};

/// Package version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name
const NAME: &str = env!("CARGO_PKG_NAME");

/// Run the version command
pub fn run() -> CliResult<()> {
    output::header("ddlgen");

    kv("Version", VERSION);
    kv("Binary", NAME);

    #[cfg(debug_assertions)]
    let build_mode = "debug";
    #[cfg(not(debug_assertions))]
    let build_mode = "release";

    kv("Build", build_mode);

    output::newline();

    output::section("Targets");
    let options = GenerationOptions::default().with_targets(Targets::all());
    for target in Target::ALL {
        kv(target.name(), &target.path(&options).display().to_string());
    }

    output::newline();
    output::dim("Input: MySQL CREATE TABLE statements. Output: Go (database/sql, gin, gorm).");

    Ok(())
}
