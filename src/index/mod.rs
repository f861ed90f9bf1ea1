//! # Cross-reference indices
//!
//! An OMX document answers each request spectrum with a hit set in the
//! response at the same list position and under the same key. The indices
//! built here let consumers move between spectra, hit sets, peptides and
//! proteins without walking the tree again:
//!
//! | Index | Key | Value |
//! |-------|-----|-------|
//! | spectrum → hit set | [`Spectrum`] | [`HitSet`] |
//! | spectrum → peptides | [`Spectrum`] | distinct peptide strings |
//! | peptide → spectra | peptide string | [`Spectrum`]s, append order |
//! | peptide → protein hits | peptide string | [`PepHit`]s |
//! | protein → peptides | accession | peptide strings |
//!
//! Indices are built once right after decoding and never change afterwards.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Deserialize;

use crate::omx::model::{HitSet, PepHit, Request, Response, Spectrum};
use crate::omx::Node;

pub use error::IndexError;

mod error;

#[cfg(test)]
mod tests;

/// What to do with a hit set whose key has no spectrum in the aligned request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentPolicy {
    /// Fail with [`IndexError::MisalignedIndex`]
    #[default]
    Strict,
    /// Log a warning and leave the hit set out of the spectrum indices
    Lenient,
}

/// Configuration for building indices
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct IndexConfig {
    /// Request/response alignment policy
    #[serde(default)]
    pub alignment: AlignmentPolicy,
}

impl IndexConfig {
    /// Configuration that skips misaligned hit sets instead of failing
    pub fn lenient() -> Self {
        Self {
            alignment: AlignmentPolicy::Lenient,
        }
    }
}

/// Builds an [`OmssaIndex`] from a decoded document root
#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
    config: IndexConfig,
}

impl IndexBuilder {
    /// Create a builder with the given configuration
    pub fn new(config: IndexConfig) -> Self {
        Self { config }
    }

    /// Walk the decoded root once and build all five indices
    pub fn build(&self, root: &Node) -> Result<OmssaIndex, IndexError> {
        let requests = Request::all(root);
        let responses = Response::all(root);
        let mut index = OmssaIndex::default();

        // Pair every hit set with the spectrum under the same key.
        for response in &responses {
            let hit_sets = response.hit_sets();
            if hit_sets.is_empty() {
                continue;
            }
            let Some(request) = requests.get(response.position()) else {
                self.misaligned(IndexError::MissingRequest {
                    response: response.position(),
                })?;
                continue;
            };

            for hit_set in hit_sets {
                let Some(spectrum) = request.spectrum(hit_set.key()) else {
                    self.misaligned(IndexError::MisalignedIndex {
                        response: response.position(),
                        key: hit_set.key(),
                    })?;
                    continue;
                };

                let peptides: BTreeSet<String> = hit_set
                    .hits()
                    .iter()
                    .filter_map(|hit| hit.pepstring())
                    .map(str::to_owned)
                    .collect();

                index.spectrum_to_peptides.insert(spectrum.clone(), peptides);
                index.spectrum_to_hit_set.insert(spectrum, hit_set);
            }
        }

        for (spectrum, hit_set) in &index.spectrum_to_hit_set {
            for hit in hit_set.hits() {
                if let Some(pepstring) = hit.pepstring() {
                    index
                        .peptide_to_spectra
                        .entry(pepstring.to_owned())
                        .or_default()
                        .push(spectrum.clone());
                }
            }
        }

        // Protein side, independent of the spectrum pairing.
        for hit_set in responses.iter().flat_map(Response::hit_sets) {
            for hit in hit_set.hits() {
                let Some(pepstring) = hit.pepstring() else {
                    continue;
                };
                for pep_hit in hit.pep_hits() {
                    if let Some(accession) = pep_hit.accession() {
                        index
                            .protein_to_peptides
                            .entry(accession.to_owned())
                            .or_default()
                            .push(pepstring.to_owned());
                    }
                    index
                        .peptide_to_pep_hits
                        .entry(pepstring.to_owned())
                        .or_default()
                        .push(pep_hit);
                }
            }
        }

        log::info!(
            "indexed {} spectra, {} peptides, {} proteins",
            index.spectrum_to_hit_set.len(),
            index.peptide_to_pep_hits.len(),
            index.protein_to_peptides.len()
        );
        Ok(index)
    }

    fn misaligned(&self, error: IndexError) -> Result<(), IndexError> {
        match self.config.alignment {
            AlignmentPolicy::Strict => Err(error),
            AlignmentPolicy::Lenient => {
                log::warn!("{error}; skipping");
                Ok(())
            }
        }
    }
}

/// The five derived cross-reference indices of a decoded document
#[derive(Debug, Clone, Default)]
pub struct OmssaIndex {
    spectrum_to_hit_set: BTreeMap<Spectrum, HitSet>,
    spectrum_to_peptides: BTreeMap<Spectrum, BTreeSet<String>>,
    peptide_to_spectra: HashMap<String, Vec<Spectrum>>,
    peptide_to_pep_hits: HashMap<String, Vec<PepHit>>,
    protein_to_peptides: HashMap<String, Vec<String>>,
}

impl OmssaIndex {
    /// Build the indices for `root` with the given configuration
    pub fn build(root: &Node, config: IndexConfig) -> Result<Self, IndexError> {
        IndexBuilder::new(config).build(root)
    }

    /// Spectrum → hit set
    pub fn spectrum_to_hit_set(&self) -> &BTreeMap<Spectrum, HitSet> {
        &self.spectrum_to_hit_set
    }

    /// Spectrum → distinct peptide strings of its hits
    pub fn spectrum_to_peptides(&self) -> &BTreeMap<Spectrum, BTreeSet<String>> {
        &self.spectrum_to_peptides
    }

    /// Peptide string → spectra whose hit sets contain it
    pub fn peptide_to_spectra(&self) -> &HashMap<String, Vec<Spectrum>> {
        &self.peptide_to_spectra
    }

    /// Peptide string → peptide-protein hits
    pub fn peptide_to_pep_hits(&self) -> &HashMap<String, Vec<PepHit>> {
        &self.peptide_to_pep_hits
    }

    /// Protein accession → peptide strings
    pub fn protein_to_peptides(&self) -> &HashMap<String, Vec<String>> {
        &self.protein_to_peptides
    }

    /// Hit set answering `spectrum`
    pub fn hit_set(&self, spectrum: &Spectrum) -> Option<&HitSet> {
        self.spectrum_to_hit_set.get(spectrum)
    }

    /// Distinct peptides matched to `spectrum`
    pub fn peptides(&self, spectrum: &Spectrum) -> Option<&BTreeSet<String>> {
        self.spectrum_to_peptides.get(spectrum)
    }

    /// Spectra matched to `pepstring`
    pub fn spectra_for_peptide(&self, pepstring: &str) -> &[Spectrum] {
        self.peptide_to_spectra
            .get(pepstring)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Protein hits of `pepstring`
    pub fn pep_hits_for_peptide(&self, pepstring: &str) -> &[PepHit] {
        self.peptide_to_pep_hits
            .get(pepstring)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Peptides matched to the protein `accession`
    pub fn peptides_for_protein(&self, accession: &str) -> &[String] {
        self.protein_to_peptides
            .get(accession)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// For one protein, each of its peptides with the hit detail for that protein
    ///
    /// When a peptide has several hits on the same accession, the first one
    /// in traversal order is returned.
    pub fn peptides_of_protein(&self, accession: &str) -> BTreeMap<String, PepHit> {
        let mut result = BTreeMap::new();
        for pepstring in self.peptides_for_protein(accession) {
            if result.contains_key(pepstring) {
                continue;
            }
            let found = self
                .pep_hits_for_peptide(pepstring)
                .iter()
                .find(|pep_hit| pep_hit.accession() == Some(accession));
            if let Some(pep_hit) = found {
                result.insert(pepstring.clone(), pep_hit.clone());
            }
        }
        result
    }

    /// All spectra that have a hit set, in request/key order
    pub fn spectra(&self) -> impl Iterator<Item = &Spectrum> {
        self.spectrum_to_hit_set.keys()
    }

    /// All protein accessions with at least one peptide
    pub fn proteins(&self) -> impl Iterator<Item = &str> {
        self.protein_to_peptides.keys().map(String::as_str)
    }
}
