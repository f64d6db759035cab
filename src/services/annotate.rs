//! Variant annotation orchestrator.
//!
//! Fans out one VEP fetch task per input variant, collects results as they
//! complete, and emits one progress event per finished task. Separated from
//! UI concerns - the CLI drives a progress bar from the event channel.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::models::Variant;
use crate::vep::{FetchOutcome, VepClient};

/// Events emitted while the batch runs.
#[derive(Debug, Clone)]
pub enum AnnotationEvent {
    /// One variant finished, successfully or not.
    Completed { hgvs: String, outcome: FetchOutcome },
}

/// Result of annotating a batch of variants.
///
/// `variants` is ordered by completion, not by input order.
#[derive(Debug, Default)]
pub struct AnnotationResult {
    pub variants: Vec<Variant>,
    pub annotated: usize,
    pub no_data: usize,
    pub throttled: usize,
    pub failed: usize,
}

/// Service for annotating variants against the VEP API.
pub struct AnnotationService {
    client: Arc<VepClient>,
}

impl AnnotationService {
    /// Create a new annotation service around a shared VEP client.
    pub fn new(client: Arc<VepClient>) -> Self {
        Self { client }
    }

    /// Annotate every variant concurrently and return once all are done.
    ///
    /// Remote failures are absorbed per-variant inside the client and show
    /// up only in the outcome counts. A panicking task aborts the whole
    /// batch; the event channel may be closed by the receiver without
    /// affecting the result.
    pub async fn annotate_all(
        &self,
        variants: Vec<Variant>,
        event_tx: mpsc::Sender<AnnotationEvent>,
    ) -> anyhow::Result<AnnotationResult> {
        let mut tasks = JoinSet::new();
        for variant in variants {
            let client = self.client.clone();
            tasks.spawn(async move { client.annotate(variant).await });
        }

        let mut result = AnnotationResult::default();
        while let Some(joined) = tasks.join_next().await {
            let annotated = joined.context("annotation task failed")?;

            match annotated.outcome {
                FetchOutcome::Annotated => result.annotated += 1,
                FetchOutcome::NoData => result.no_data += 1,
                FetchOutcome::Throttled => result.throttled += 1,
                FetchOutcome::Failed(_) => result.failed += 1,
            }

            let _ = event_tx
                .send(AnnotationEvent::Completed {
                    hgvs: annotated.variant.hgvs.clone(),
                    outcome: annotated.outcome,
                })
                .await;

            result.variants.push(annotated.variant);
        }

        Ok(result)
    }
}
