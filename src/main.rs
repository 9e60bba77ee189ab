use clap::Parser;
use tracing_subscriber::EnvFilter;

use report_relay::{run, Cli};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("[ERROR] report-relay failed: {e:#}");
        std::process::exit(1);
    }
}
