use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;

/// Compile a C8 source file into a CHIP-8 ROM.
#[derive(Parser)]
#[command(name = "c8c", version, about)]
struct Cli {
    /// Path to the C8 source file
    input: PathBuf,
}

const OUTPUT_FILE: &str = "output.ch8";

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let rom = c8c::compile(&source)?;
    fs::write(OUTPUT_FILE, &rom)
        .with_context(|| format!("failed to write {OUTPUT_FILE}"))?;
    Ok(())
}
