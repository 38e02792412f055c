// CLI binary entry point for tagsniff

mod cli;

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Config;

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let config = Config::parse();
    init_tracing(&config);

    if let Err(e) = cli::commands::run(config) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
