//! CLI definitions and argument types.

use std::path::PathBuf;

use clap::Parser;

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "stackcmp")]
#[command(about = "Compare stack-frame variable layout between an original and recompiled function")]
#[command(version)]
pub struct Cli {
    /// Unified diff of the function's disassembly (original vs. recomp)
    #[arg(value_name = "DIFF")]
    pub diff: PathBuf,

    /// Stack-symbol listing for the recompiled function
    #[arg(short = 'S', long, value_name = "SYMS")]
    pub symbols: Option<PathBuf>,

    /// Enable verbose output (sets RUST_LOG=debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress output (only show errors)
    #[arg(short, long, conflicts_with = "verbose")]
    pub silent: bool,
}
