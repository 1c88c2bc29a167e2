use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = lifeplan::api::Cli::parse();
    if let Err(e) = lifeplan::api::run_cli(cli).await {
        tracing::error!(error = %e, "lifeplan failed");
        std::process::exit(1);
    }
}
