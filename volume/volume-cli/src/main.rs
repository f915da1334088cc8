//! STL volume measurement from the command line.
//!
//! # Usage
//!
//! ```text
//! stl-volume <path-to-stl> [tolerance]
//! ```
//!
//! Prints the measured volume to standard output as a bare number. Open
//! seams, flipped faces and duplicate vertices are repaired on the fly,
//! and internal cavities are subtracted from the total, so the number is
//! printed even for imperfect meshes. Mesh-quality diagnostics go to
//! standard error through `tracing`; they never change the exit status.

// Safety: Deny unwrap/expect outside tests.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;

/// Measure the enclosed volume of an STL file.
///
/// Handles binary and ASCII STL. The result is the absolute enclosed
/// volume in cubic model units, with nested cavities subtracted.
#[derive(Parser)]
#[command(name = "stl-volume")]
#[command(about = "Measure the enclosed volume of an STL file", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the STL file (binary or ASCII)
    #[arg(name = "PATH")]
    path: PathBuf,

    /// Vertex welding tolerance in model units; values that fail to
    /// parse as a number fall back to the scale-derived default
    #[arg(name = "TOLERANCE")]
    tolerance: Option<String>,
}

fn main() -> ExitCode {
    // Default: WARN for everything, so mesh-quality diagnostics are
    // visible. Override with RUST_LOG (e.g. RUST_LOG=volume_measure=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return ExitCode::SUCCESS;
        }
        Err(_) => {
            eprintln!("Usage: stl-volume <path-to-stl> [tolerance]");
            return ExitCode::from(1);
        }
    };

    let tolerance = cli.tolerance.and_then(|raw| raw.parse::<f64>().ok());
    let volume = volume_measure::calculate_stl_volume(&cli.path, tolerance);
    println!("{volume}");
    ExitCode::SUCCESS
}
