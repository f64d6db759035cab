//! TSV report output.

use std::path::Path;

use tracing::{error, info};

use crate::models::Variant;

/// Write the annotated variants as tab-separated values.
///
/// The header row comes from the variant's field order. An empty batch
/// writes nothing and is not an error; an unwritable destination is.
pub fn write_tsv(variants: &[Variant], path: &Path) -> Result<(), csv::Error> {
    if variants.is_empty() {
        info!("no annotated variants to write");
        return Ok(());
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .map_err(|e| {
            error!("error writing to output TSV file {}: {}", path.display(), e);
            e
        })?;

    for variant in variants {
        writer.serialize(variant)?;
    }
    writer.flush()?;

    info!("annotated variants written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Variant, VepAnnotation};

    #[test]
    fn writes_header_and_rows() {
        let mut variant = Variant::new("1", 100, "A", "T");
        variant.num_reads = Some(50);
        variant.variant_reads = Some(10);
        variant.variant_percentage = Some(20.0);
        variant.apply_annotation(VepAnnotation {
            gene_id: Some("G1".to_string()),
            gene_symbol: Some("GENE1".to_string()),
            biotype: Some("protein_coding".to_string()),
            impact: Some("MODERATE".to_string()),
            most_severe_consequence: Some("missense_variant".to_string()),
            minor_allele_frequency: Some(0.05),
        });

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        write_tsv(&[variant], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "chrom\tpos\tref\talt\thgvs\tnum_reads\tvariant_reads\tvariant_percentage\t\
             gene_id\tgene_symbol\tbiotype\timpact\tmost_severe_consequence\t\
             minor_allele_frequency"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("1\t100\tA\tT\t1:g.100A>T\t50\t10\t20"));
        assert!(row.contains("G1\tGENE1\tprotein_coding\tMODERATE\tmissense_variant\t0.05"));
    }

    #[test]
    fn null_annotation_fields_serialize_empty() {
        let variant = Variant::new("2", 200, "C", "G");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        write_tsv(&[variant], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let row = contents.lines().nth(1).unwrap();
        assert_eq!(row, "2\t200\tC\tG\t2:g.200C>G\t\t\t\t\t\t\t\t\t");
    }

    #[test]
    fn empty_batch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        write_tsv(&[], &path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_destination_is_an_error() {
        let variant = Variant::new("1", 100, "A", "T");
        let result = write_tsv(&[variant], Path::new("/nonexistent/dir/out.tsv"));
        assert!(result.is_err());
    }
}
