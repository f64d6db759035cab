//! VEP REST API client.
//!
//! One annotation request per variant against the Ensembl VEP endpoint,
//! gated by the shared rate limiter. Ordinary remote failures never escape
//! this module: every variant comes back with a classified outcome and its
//! annotation fields either filled or null.

mod rate_limit;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::time::Duration;
use tracing::{error, info, warn};

use crate::config::AnnotateConfig;
use crate::models::{Variant, VepAnnotation};

pub use rate_limit::RateLimiter;

/// Upper bound for the exponential backoff used when a 429 response
/// carries no Retry-After header.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Classification of one annotation fetch.
///
/// Distinguishes "the service has no data" from "the fetch failed" so the
/// orchestrator and tests do not have to infer the difference from nulled
/// fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Response parsed; annotation fields merged (individual fields may
    /// still be null when the service omitted them).
    Annotated,
    /// HTTP 400: no annotation available for this identifier.
    NoData,
    /// Still throttled after the retry budget was spent.
    Throttled,
    /// Transport failure, unexpected status, or malformed body.
    Failed(String),
}

/// A variant paired with the outcome of its annotation fetch.
#[derive(Debug, Clone)]
pub struct AnnotatedVariant {
    pub variant: Variant,
    pub outcome: FetchOutcome,
}

/// Internal reply classification for one endpoint call.
enum VepReply {
    Payload(Value),
    NoData,
    Throttled,
    Failed(String),
}

/// Client for the Ensembl VEP REST API.
pub struct VepClient {
    client: Client,
    server: String,
    rate_limiter: RateLimiter,
    max_retries: u32,
}

impl VepClient {
    /// Create a new client from the pipeline configuration.
    pub fn new(config: &AnnotateConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            server: config.server.trim_end_matches('/').to_string(),
            rate_limiter: RateLimiter::new(config.reqs_per_sec),
            max_retries: config.max_retries.max(1),
        }
    }

    /// Get the rate limiter shared by this client's requests.
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Annotate one variant.
    ///
    /// Always returns the variant; remote failures of any kind leave its
    /// annotation fields null and are reported through the outcome.
    pub async fn annotate(&self, mut variant: Variant) -> AnnotatedVariant {
        let endpoint = format!("/vep/human/hgvs/{}", variant.hgvs);
        let reply = self.perform_rest_action(&endpoint).await;

        let outcome = match reply {
            VepReply::Payload(payload) => {
                variant.apply_annotation(extract_annotation(
                    &payload,
                    &variant.alt_allele,
                    &variant.hgvs,
                ));
                FetchOutcome::Annotated
            }
            VepReply::NoData => {
                variant.apply_annotation(VepAnnotation::default());
                FetchOutcome::NoData
            }
            VepReply::Throttled => {
                variant.apply_annotation(VepAnnotation::default());
                FetchOutcome::Throttled
            }
            VepReply::Failed(reason) => {
                variant.apply_annotation(VepAnnotation::default());
                FetchOutcome::Failed(reason)
            }
        };

        AnnotatedVariant { variant, outcome }
    }

    /// Call one VEP endpoint and classify the reply.
    ///
    /// Waits on the rate limiter before every send, including retries, so
    /// a retried request occupies a fresh slot in the window. 429 replies
    /// are retried up to the configured budget, honoring Retry-After when
    /// the server sends it and doubling a local backoff when it does not.
    async fn perform_rest_action(&self, endpoint: &str) -> VepReply {
        let url = format!("{}{}", self.server, endpoint);
        let mut attempt = 0u32;
        let mut backoff = Duration::from_secs(1);

        loop {
            self.rate_limiter.admit().await;

            let response = match self
                .client
                .get(&url)
                .query(&[("pick", "1")])
                .header("Content-Type", "application/json")
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    error!("error making request for {}: {}", endpoint, e);
                    return VepReply::Failed(e.to_string());
                }
            };

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                attempt += 1;
                if attempt >= self.max_retries {
                    warn!(
                        "still throttled after {} attempts for {}",
                        attempt, endpoint
                    );
                    return VepReply::Throttled;
                }
                let wait = retry_after(&response).unwrap_or(backoff);
                warn!("rate limit exceeded, retrying after {:?}", wait);
                tokio::time::sleep(wait).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
                continue;
            }

            if status == StatusCode::BAD_REQUEST {
                info!("no annotation available for {}", endpoint);
                return VepReply::NoData;
            }

            if !status.is_success() {
                error!("request failed for {}: HTTP {}", endpoint, status);
                return VepReply::Failed(format!("HTTP {}", status));
            }

            // The service answers one query with a one-element array.
            return match response.json::<Vec<Value>>().await {
                Ok(mut items) if !items.is_empty() => VepReply::Payload(items.remove(0)),
                Ok(_) => {
                    error!("empty response array for {}", endpoint);
                    VepReply::Failed("empty response array".to_string())
                }
                Err(e) => {
                    error!("malformed response for {}: {}", endpoint, e);
                    VepReply::Failed(e.to_string())
                }
            };
        }
    }
}

/// Parse a Retry-After header as (possibly fractional) seconds.
fn retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get("Retry-After")?
        .to_str()
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(Duration::from_secs_f64)
}

/// Extract the annotation fields from one VEP response object.
///
/// Missing arrays or keys mean "field absent", never an error. The minor
/// allele frequency comes from the last colocated variant, keyed by the
/// ALT allele.
fn extract_annotation(payload: &Value, alt_allele: &str, hgvs: &str) -> VepAnnotation {
    let consequence = payload
        .get("transcript_consequences")
        .and_then(|v| v.get(0));
    if consequence.is_none() {
        tracing::debug!("no transcript consequences found for {}", hgvs);
    }

    let field = |key: &str| -> Option<String> {
        consequence?
            .get(key)?
            .as_str()
            .map(str::to_string)
    };

    let minor_allele_frequency = payload
        .get("colocated_variants")
        .and_then(Value::as_array)
        .and_then(|colocated| colocated.last())
        .and_then(|v| v.get("frequencies"))
        .and_then(|freqs| freqs.get(alt_allele))
        .and_then(|entry| entry.get("af"))
        .and_then(Value::as_f64);
    if minor_allele_frequency.is_none() {
        tracing::debug!("no minor allele frequency found for {}", hgvs);
    }

    VepAnnotation {
        gene_id: field("gene_id"),
        gene_symbol: field("gene_symbol"),
        biotype: field("biotype"),
        impact: field("impact"),
        most_severe_consequence: payload
            .get("most_severe_consequence")
            .and_then(Value::as_str)
            .map(str::to_string),
        minor_allele_frequency,
    }
}
