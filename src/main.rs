//! vepanno - VCF variant annotation via the Ensembl VEP REST API.
//!
//! Reads variants from a VCF file, annotates each one with consequence
//! predictions from the Ensembl VEP service, and writes a TSV report.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vepanno::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "vepanno=info"
    } else {
        "vepanno=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Run CLI
    cli::run().await
}
