//! CLI entrypoint for `autojson-codegen`.

mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use autojson_codegen::error::CodegenError;
use autojson_codegen::{config, driver};

use crate::cli::Args;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_tracing();
    run().map_err(color_eyre::eyre::Report::from)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<(), CodegenError> {
    let args = Args::parse();
    let config = config::load(args.config.as_deref(), &args.overrides())?;
    driver::run(&args.input, &args.output, &config)?;
    Ok(())
}
