//! stackcmp CLI - stack-frame layout comparison.

mod cli;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use cli::{Cli, EXIT_FAILURE, EXIT_SUCCESS};
use stackcmp::{SymbolTable, classify, input, reconcile, report};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "debug"
    } else if cli.silent {
        "error"
    } else {
        "info"
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("stackcmp={default_level}").parse().unwrap())
        .add_directive(format!("stackcmp_core={default_level}").parse().unwrap());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    std::process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let hunks = match input::read_diff_file(&cli.diff) {
        Ok(hunks) => hunks,
        Err(e) => {
            error!(error = %e, path = %cli.diff.display(), "failed to read diff");
            return EXIT_FAILURE;
        }
    };

    let symbols = match &cli.symbols {
        Some(path) => {
            let records = match input::read_symbol_file(path) {
                Ok(records) => records,
                Err(e) => {
                    error!(error = %e, path = %path.display(), "failed to read symbol listing");
                    return EXIT_FAILURE;
                }
            };
            match SymbolTable::from_records(&records) {
                Ok(table) => table,
                Err(e) => {
                    error!(error = %e, path = %path.display(), "failed to build symbol table");
                    return EXIT_FAILURE;
                }
            }
        }
        None => SymbolTable::default(),
    };

    let result = reconcile(&hunks);
    let comparison = classify(&result, &symbols);
    print!("{}", report::render(&comparison));

    // Warning flags are report content; the caller decides pass/fail.
    EXIT_SUCCESS
}
