mod cli;
mod outline;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Format, Output};
use dt_wit::{TypeGraph, WasmTools, WitInput};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_graph(cli: &Cli) -> Result<TypeGraph> {
    let source = if cli.reads_stdin() {
        "<stdin>".to_string()
    } else {
        cli.input.display().to_string()
    };
    let format = cli.format();
    info!(%source, ?format, "reading input");

    let graph = match format {
        Format::Json if cli.reads_stdin() => dt_wit::decode_json(io::stdin().lock())?,
        Format::Json => dt_wit::load_json(&cli.input)?,
        Format::Wit => {
            let mut compiler = WasmTools::new().all_features(!cli.no_all_features);
            if let Some(executable) = &cli.wasm_tools {
                compiler = compiler.executable(executable);
            }
            if let Some(seconds) = cli.timeout {
                compiler = compiler.timeout(Duration::from_secs(seconds));
            }
            let input = if cli.reads_stdin() {
                WitInput::reader(io::stdin())
            } else {
                WitInput::path(&cli.input)
            };
            dt_wit::load(&compiler, input)?
        }
    };
    Ok(graph)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let graph = read_graph(&cli).with_context(|| {
        format!("failed to resolve {}", cli.input.display())
    })?;

    let mut out = io::stdout().lock();
    match cli.output {
        Output::Outline => outline::write_outline(&graph, &mut out),
        Output::Summary => outline::write_summary(&graph, &mut out),
    }
    .and_then(|()| out.flush())
    .context("failed to write output")
}
