/**
 * ngxc - TSX component compiler
 *
 * Compiles TSX component functions into Angular component definitions.
 */
use std::path::PathBuf;
use std::process;

use clap::Parser;
use ngxc_cli::main_entry::{self, RunOptions};
use ngxc_cli::ngtsc::transform::SynthesisStrategy;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "ngxc")]
#[command(about = "Compiles TSX component functions into Angular component definitions")]
#[command(version)]
struct Cli {
    /// Files to compile (defaults to the configured include globs)
    files: Vec<PathBuf>,

    /// Path to ngxc.json
    #[arg(short, long, default_value = "ngxc.json")]
    project: PathBuf,

    /// Synthesis strategy: lazy or direct
    #[arg(long)]
    strategy: Option<SynthesisStrategy>,

    /// Write outputs here instead of stdout
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Print the compiled definitions instead of the transformed files
    #[arg(long)]
    emit_ir: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ngxc=info"))
    };
    fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();

    let run = RunOptions {
        files: cli.files,
        project: cli.project,
        strategy: cli.strategy,
        out_dir: cli.out_dir,
        emit_ir: cli.emit_ir,
    };
    match main_entry::main(run) {
        Ok(code) => process::exit(code),
        Err(err) => {
            error!("{:#}", err);
            process::exit(1);
        }
    }
}
