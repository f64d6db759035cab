//! Variant model.
//!
//! One `Variant` per ALT allele of a VCF record, carrying the HGVS-style
//! query identifier used against the VEP service. Field order here is the
//! column order of the TSV report.

use serde::Serialize;

/// A single genomic variant with optional coverage and annotation data.
///
/// Each variant is owned by exactly one in-flight annotation task; the
/// annotation fields are written exactly once per fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variant {
    /// Chromosome name as it appears in the VCF.
    pub chrom: String,
    /// 1-based position.
    pub pos: u64,
    /// Reference allele.
    #[serde(rename = "ref")]
    pub ref_allele: String,
    /// Alternate allele.
    #[serde(rename = "alt")]
    pub alt_allele: String,
    /// HGVS-style identifier (`chrom:g.posRef>Alt`) used to query VEP.
    pub hgvs: String,

    // Coverage ride-along fields from the first sample (NR/NV).
    pub num_reads: Option<u32>,
    pub variant_reads: Option<u32>,
    pub variant_percentage: Option<f64>,

    // Annotation fields filled from the VEP response.
    pub gene_id: Option<String>,
    pub gene_symbol: Option<String>,
    pub biotype: Option<String>,
    pub impact: Option<String>,
    pub most_severe_consequence: Option<String>,
    pub minor_allele_frequency: Option<f64>,
}

impl Variant {
    /// Create a variant from its identifying fields, deriving the HGVS
    /// identifier. Coverage and annotation fields start unset.
    pub fn new(chrom: &str, pos: u64, ref_allele: &str, alt_allele: &str) -> Self {
        Self {
            chrom: chrom.to_string(),
            pos,
            ref_allele: ref_allele.to_string(),
            alt_allele: alt_allele.to_string(),
            hgvs: format!("{}:g.{}{}>{}", chrom, pos, ref_allele, alt_allele),
            num_reads: None,
            variant_reads: None,
            variant_percentage: None,
            gene_id: None,
            gene_symbol: None,
            biotype: None,
            impact: None,
            most_severe_consequence: None,
            minor_allele_frequency: None,
        }
    }

    /// Overwrite all six annotation fields from a fetched annotation.
    ///
    /// Fields the response lacked become `None`; nothing stale survives a
    /// re-annotation.
    pub fn apply_annotation(&mut self, annotation: VepAnnotation) {
        self.gene_id = annotation.gene_id;
        self.gene_symbol = annotation.gene_symbol;
        self.biotype = annotation.biotype;
        self.impact = annotation.impact;
        self.most_severe_consequence = annotation.most_severe_consequence;
        self.minor_allele_frequency = annotation.minor_allele_frequency;
    }
}

/// The annotation fields extracted from one VEP response.
///
/// Every field is nullable; a default value means "no data".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VepAnnotation {
    pub gene_id: Option<String>,
    pub gene_symbol: Option<String>,
    pub biotype: Option<String>,
    pub impact: Option<String>,
    pub most_severe_consequence: Option<String>,
    pub minor_allele_frequency: Option<f64>,
}
