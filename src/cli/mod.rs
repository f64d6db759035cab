//! CLI parsing and the annotate pipeline command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use crate::config::{self, AnnotateConfig};
use crate::report;
use crate::services::{AnnotationEvent, AnnotationService};
use crate::vcf::VcfReader;
use crate::vep::{FetchOutcome, VepClient};

#[derive(Parser)]
#[command(name = "vepanno")]
#[command(about = "Annotate VCF variants with Ensembl VEP consequence predictions")]
#[command(version)]
pub struct Cli {
    /// Input VCF file
    pub input_vcf: PathBuf,

    /// Output TSV file
    pub output_tsv: PathBuf,

    /// Base URL of the Ensembl REST server
    #[arg(long, default_value = config::DEFAULT_SERVER)]
    pub server: String,

    /// Maximum requests per second against the server
    #[arg(long, default_value_t = config::DEFAULT_REQS_PER_SEC)]
    pub rate_limit: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Maximum attempts for a server-throttled request
    #[arg(long, default_value_t = config::DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

/// Parse arguments and run the annotation pipeline.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AnnotateConfig {
        server: cli.server,
        reqs_per_sec: cli.rate_limit,
        request_timeout_secs: cli.timeout,
        max_retries: cli.max_retries,
    };

    let variants = VcfReader::open(&cli.input_vcf)
        .and_then(VcfReader::read_all)
        .with_context(|| format!("failed to read {}", cli.input_vcf.display()))?;

    if variants.is_empty() {
        println!(
            "{} No variants found in {}",
            style("!").yellow(),
            cli.input_vcf.display()
        );
        return Ok(());
    }

    println!(
        "{} Annotating {} variants against {} ({} req/s)",
        style("→").cyan(),
        variants.len(),
        config.server,
        config.reqs_per_sec
    );

    let service = AnnotationService::new(Arc::new(VepClient::new(&config)));

    // Event channel for progress updates
    let (event_tx, mut event_rx) = mpsc::channel::<AnnotationEvent>(100);

    // Progress bar driven from the event channel (UI layer)
    let progress = ProgressBar::new(variants.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
            .expect("valid progress template")
            .progress_chars("█▓░"),
    );
    progress.set_message("Annotating variants...");

    let progress_clone = progress.clone();
    let event_handler = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                AnnotationEvent::Completed { hgvs, outcome } => {
                    if let FetchOutcome::Failed(ref error) = outcome {
                        progress_clone.println(format!(
                            "{} Failed to annotate {}: {}",
                            style("✗").red(),
                            hgvs,
                            error
                        ));
                    }
                    progress_clone.inc(1);
                }
            }
        }
    });

    let result = service.annotate_all(variants, event_tx).await?;

    if let Err(e) = event_handler.await {
        tracing::warn!("Event handler task failed: {}", e);
    }
    progress.finish_and_clear();

    report::write_tsv(&result.variants, &cli.output_tsv)
        .with_context(|| format!("failed to write {}", cli.output_tsv.display()))?;

    // Print results (UI layer)
    println!(
        "{} Annotated {} of {} variants",
        style("✓").green(),
        result.annotated,
        result.variants.len()
    );
    if result.no_data > 0 {
        println!(
            "  {} {} with no annotation available",
            style("→").dim(),
            result.no_data
        );
    }
    if result.throttled > 0 {
        println!(
            "  {} {} still throttled after retries",
            style("!").yellow(),
            result.throttled
        );
    }
    if result.failed > 0 {
        println!("  {} {} failed to fetch", style("✗").red(), result.failed);
    }
    println!(
        "  {} Report written to {}",
        style("→").dim(),
        cli.output_tsv.display()
    );

    Ok(())
}
