use anyhow::{Context, Result};
use std::path::PathBuf;

use omssa::index::IndexConfig;
use omssa::OmssaFile;

fn show<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Print each peptide of a protein with its hit detail
pub fn run(file: PathBuf, accession: &str, index_config: IndexConfig) -> Result<()> {
    let result = OmssaFile::from_path(&file, &index_config)
        .with_context(|| format!("Failed to read OMSSA result: {}", file.display()))?;

    let peptides = result.peptides_of_protein(accession);
    if peptides.is_empty() {
        anyhow::bail!("No peptides matched protein {accession}");
    }

    println!("Protein {accession}: {} peptide(s)", peptides.len());
    if let Some(defline) = peptides.values().find_map(|hit| hit.defline()) {
        println!("  {defline}");
    }
    println!();
    println!("  {:<30} {:>8} {:>8} {:>8}", "Peptide", "Start", "Stop", "Spectra");
    for (peptide, hit) in &peptides {
        println!(
            "  {:<30} {:>8} {:>8} {:>8}",
            peptide,
            show(hit.start()),
            show(hit.stop()),
            result.index().spectra_for_peptide(peptide).len()
        );
    }

    Ok(())
}
