//! Command line entry point.
//!
//! ```text
//! querycad <INPUT> <OUTPUT> [STEP]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use querycad::QueryCad;

/// Discretize the boundary of a planar STEP face into a VTK polyline mesh.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// STEP file holding exactly one planar face.
    input: PathBuf,
    /// Destination VTK file.
    output: PathBuf,
    /// Target arc length between samples.
    #[arg(default_value_t = 0.01)]
    step: f64,
}

fn main() -> anyhow::Result<ExitCode> {
    // Default: WARN for everything, INFO for querycad.
    // Override with RUST_LOG env var (e.g. RUST_LOG=querycad=debug).
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .from_env_lossy();
    let env_filter = if std::env::var_os("RUST_LOG").is_some() {
        env_filter
    } else {
        env_filter.add_directive("querycad=info".parse()?)
    };
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = Args::parse();

    let mut session = QueryCad::open(&args.input);
    if !session.is_valid() {
        // The reason has already been logged while opening.
        return Ok(ExitCode::FAILURE);
    }
    session
        .discretize(args.step)
        .with_context(|| format!("failed to discretize {}", args.input.display()))?;
    session
        .write_vtk(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    Ok(ExitCode::SUCCESS)
}
