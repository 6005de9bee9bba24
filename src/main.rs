use std::process;

use clap::Parser;
use commit_theatre::Cli;

#[tokio::main]
async fn main() {
    // RUST_LOG controls verbosity, "warn" by default. Logs go to stderr so
    // they never interleave with the screenplay or plan YAML on stdout.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli.execute().await {
        eprintln!("Error: {e}");
        for cause in e.chain().skip(1) {
            eprintln!("  Caused by: {cause}");
        }
        process::exit(1);
    }
}
