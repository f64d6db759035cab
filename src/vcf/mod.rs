//! VCF input parsing.
//!
//! Reads each variant from a VCF file, fanning multi-allelic records out
//! into one `Variant` per ALT allele. Coverage statistics (NR/NV) from the
//! first sample ride along when present.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;
use tracing::{error, warn};

use crate::models::Variant;

/// Errors raised while reading the input VCF.
#[derive(Debug, Error)]
pub enum VcfError {
    #[error("error reading input VCF file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid VCF record at line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },
}

/// Reader over the variants of a VCF file.
pub struct VcfReader {
    reader: BufReader<File>,
}

impl VcfReader {
    /// Open a VCF file for reading.
    pub fn open(path: &Path) -> Result<Self, VcfError> {
        let file = File::open(path).map_err(|e| {
            error!("could not open input VCF file {}: {}", path.display(), e);
            e
        })?;
        Ok(Self {
            reader: BufReader::new(file),
        })
    }

    /// Read every variant in the file, in input order.
    ///
    /// Meta (`##`) and header (`#CHROM`) lines are skipped; each data line
    /// yields one variant per ALT allele.
    pub fn read_all(self) -> Result<Vec<Variant>, VcfError> {
        let mut variants = Vec::new();
        for (idx, line) in self.reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            variants.extend(parse_data_line(&line, line_no)?);
        }
        Ok(variants)
    }
}

/// Parse one VCF data line into one variant per ALT allele.
fn parse_data_line(line: &str, line_no: usize) -> Result<Vec<Variant>, VcfError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 8 {
        return Err(VcfError::InvalidRecord {
            line: line_no,
            reason: format!("expected at least 8 columns, found {}", fields.len()),
        });
    }

    let chrom = fields[0];
    let pos: u64 = fields[1].parse().map_err(|_| VcfError::InvalidRecord {
        line: line_no,
        reason: format!("position is not an integer: {}", fields[1]),
    })?;
    let ref_allele = fields[3];
    let format = fields.get(8).copied();
    let sample = fields.get(9).copied();

    let mut variants = Vec::new();
    for (allele_index, alt) in fields[4].split(',').enumerate() {
        let mut variant = Variant::new(chrom, pos, ref_allele, alt);
        if let Some((num_reads, variant_reads)) =
            coverage_for_allele(format, sample, allele_index)
        {
            let proportion = if num_reads > 0 {
                variant_reads as f64 / num_reads as f64
            } else {
                0.0
            };
            variant.num_reads = Some(num_reads);
            variant.variant_reads = Some(variant_reads);
            variant.variant_percentage = Some(proportion * 100.0);
        } else {
            warn!("could not find coverage info at line {}", line_no);
        }
        variants.push(variant);
    }
    Ok(variants)
}

/// Look up NR (total reads) and NV (variant reads) for one allele from the
/// FORMAT column and the first sample. Missing keys or short lists are not
/// errors; the coverage fields simply stay unset.
fn coverage_for_allele(
    format: Option<&str>,
    sample: Option<&str>,
    allele_index: usize,
) -> Option<(u32, u32)> {
    let keys: Vec<&str> = format?.split(':').collect();
    let values: Vec<&str> = sample?.split(':').collect();

    let field_for = |key: &str| -> Option<&str> {
        let pos = keys.iter().position(|k| *k == key)?;
        values.get(pos).copied()
    };

    let num_reads = field_for("NR")?.split(',').nth(allele_index)?.parse().ok()?;
    let variant_reads = field_for("NV")?.split(',').nth(allele_index)?.parse().ok()?;
    Some((num_reads, variant_reads))
}
