//! ddlgen - Go code from MySQL table declarations.

use clap::Parser;

use ddlgen_cli::cli::{Cli, Command};
use ddlgen_cli::commands;
use ddlgen_cli::error::CliResult;
use ddlgen_cli::logging;
use ddlgen_cli::output;

fn main() {
    if let Err(e) = run() {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Generate(args) => commands::generate::run(args),
        Command::Validate(args) => commands::validate::run(args),
        Command::Line(args) => commands::line::run(args),
        Command::Version => commands::version::run(),
    }
}
