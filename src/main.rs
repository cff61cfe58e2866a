use std::io::{self, Read, Write};

use clap::Parser;

/// Batch transport-network query engine.
///
/// Reads a single JSON input document (base requests, render settings,
/// routing settings, stat requests), builds the catalogue/router/renderer,
/// and writes the JSON response array to stdout.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Path to the input document. Reads stdin when omitted.
    input: Option<std::path::PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    let input = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let output = transit_catalogue::dispatch::run(&input)?;

    io::stdout().write_all(output.as_bytes())?;
    io::stdout().write_all(b"\n")?;
    Ok(())
}
