use anyhow::{Context, Result};
use std::path::PathBuf;

use omssa::index::IndexConfig;
use omssa::OmssaFile;

/// Print the peptides and hits of every spectrum under `number`
pub fn run(file: PathBuf, number: usize, index_config: IndexConfig) -> Result<()> {
    let result = OmssaFile::from_path(&file, &index_config)
        .with_context(|| format!("Failed to read OMSSA result: {}", file.display()))?;

    let matches: Vec<_> = result
        .spectrum_to_hit_set()
        .iter()
        .filter(|(spectrum, _)| spectrum.key() == number)
        .collect();
    if matches.is_empty() {
        anyhow::bail!("No spectrum with key {number}");
    }

    for (spectrum, hit_set) in matches {
        println!(
            "Spectrum {} (request {}): {}",
            spectrum.key(),
            spectrum.request(),
            spectrum.name().unwrap_or("<unnamed>")
        );
        println!("  Charges: {:?}", spectrum.charges());
        if let Some(mz) = spectrum.precursor_mz() {
            println!("  Precursor m/z (scaled): {mz}");
        }

        if let Some(peptides) = result.index().peptides(spectrum) {
            let peptides: Vec<_> = peptides.iter().map(String::as_str).collect();
            println!("  Peptides: {}", peptides.join(", "));
        }

        let hits = hit_set.hits();
        println!("  Hits: {}", hits.len());
        for hit in &hits {
            let accessions: Vec<_> = hit
                .pep_hits()
                .iter()
                .filter_map(|p| p.accession().map(str::to_owned))
                .collect();
            println!(
                "    {:<30} e={:<12} charge={:<3} {}",
                hit.pepstring().unwrap_or("-"),
                hit.evalue().map_or_else(|| "-".to_string(), |e| format!("{e:.3e}")),
                hit.charge().map_or_else(|| "-".to_string(), |c| c.to_string()),
                accessions.join(",")
            );
        }
        println!();
    }

    Ok(())
}
