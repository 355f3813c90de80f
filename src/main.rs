use anyhow::Result;
use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use viewcall::cli::{self, Args};
use viewcall::{app, config};

fn main() -> Result<()> {
    let args = Args::parse_from(cli::normalize_flags(std::env::args_os()));
    init_tracing(args.verbose);

    let request = match args.into_request() {
        Ok(request) => request,
        Err(err) => {
            eprintln!("Error: {err}");
            if err.shows_usage() {
                cli::print_usage();
            }
            std::process::exit(1);
        }
    };

    let config = config::load();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(app::run(request, &config))
}

/// Logs go to stderr so stdout carries only results
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("viewcall=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
