//! vepanno - VCF variant annotation via the Ensembl VEP REST API.
//!
//! Reads variants from a VCF file, fetches consequence predictions for each
//! one concurrently (rate limited against the remote service), and writes a
//! combined TSV report.

pub mod cli;
pub mod config;
pub mod models;
pub mod report;
pub mod services;
pub mod vcf;
pub mod vep;
