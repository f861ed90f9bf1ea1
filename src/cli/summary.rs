use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use omssa::index::IndexConfig;
use omssa::mods::ModificationRegistry;
use omssa::{OmssaFile, Summary};

#[derive(Serialize)]
struct SummaryReport {
    file: PathBuf,
    #[serde(flatten)]
    summary: Summary,
    failed_modification_files: Vec<PathBuf>,
}

/// Print counts for an OMSSA result file
pub fn run(
    file: PathBuf,
    mods: Option<PathBuf>,
    usermods: Option<PathBuf>,
    index_config: IndexConfig,
    json: bool,
) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let mut result = OmssaFile::from_path(&file, &index_config)
        .with_context(|| format!("Failed to read OMSSA result: {}", file.display()))?;

    let mut failed = Vec::new();
    if mods.is_some() || usermods.is_some() {
        let (registry, report) = ModificationRegistry::load(mods.as_deref(), usermods.as_deref());
        failed = report.failed.into_iter().map(|e| e.path).collect();
        result = result.with_modifications(registry);
    }

    let report = SummaryReport {
        file,
        summary: result.summary(),
        failed_modification_files: failed,
    };

    if json {
        let out = serde_json::to_string_pretty(&report).context("Failed to serialize summary")?;
        println!("{out}");
        return Ok(());
    }

    let summary = &report.summary;
    println!("OMSSA Result Summary");
    println!("====================");
    println!("File: {}", report.file.display());
    println!();
    println!("  Requests:  {}", summary.requests);
    println!("  Responses: {}", summary.responses);
    println!("  Spectra:   {}", summary.spectra);
    println!("  Hit sets:  {}", summary.hit_sets);
    println!("  Hits:      {}", summary.hits);
    println!("  Peptides:  {}", summary.peptides);
    println!("  Proteins:  {}", summary.proteins);
    if let Some(count) = summary.modifications {
        println!("  Modifications: {count}");
    }
    for path in &report.failed_modification_files {
        println!("  Failed to load: {}", path.display());
    }

    Ok(())
}
