//! Decoded and indexed OMSSA result file
//!
//! [`OmssaFile`] is what most callers want: it decodes a document with the
//! OMSSA registry, builds the cross-reference indices straight away and keeps
//! both together. The modification table is independent of the document and
//! can be attached afterwards with [`OmssaFile::with_modifications`].

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::index::{IndexConfig, OmssaIndex};
use crate::mods::ModificationRegistry;
use crate::omx::model::{HitSet, PepHit, Request, Response, Spectrum};
use crate::omx::{omssa_registry, DecodeStats, Node, OmxDecoder, XmlEventSource};

/// Counts describing one result file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// `MSSearch_request` entries
    pub requests: usize,
    /// `MSSearch_response` entries
    pub responses: usize,
    /// Spectra across all requests
    pub spectra: usize,
    /// Hit sets across all responses
    pub hit_sets: usize,
    /// Hits across all hit sets
    pub hits: usize,
    /// Distinct peptide strings
    pub peptides: usize,
    /// Distinct protein accessions
    pub proteins: usize,
    /// Loaded modifications, if a table is attached
    pub modifications: Option<usize>,
}

/// A decoded OMSSA result with its indices
#[derive(Debug, Clone)]
pub struct OmssaFile {
    root: Arc<Node>,
    index: OmssaIndex,
    stats: DecodeStats,
    modifications: Option<ModificationRegistry>,
}

impl OmssaFile {
    /// Decode and index an `.omx` file
    pub fn from_path(path: impl AsRef<Path>, config: &IndexConfig) -> Result<Self> {
        let path = path.as_ref();
        log::info!("reading {}", path.display());
        Self::from_events(XmlEventSource::from_path(path)?, config)
    }

    /// Decode and index a document from a BufRead source
    pub fn from_reader<R: BufRead>(reader: R, config: &IndexConfig) -> Result<Self> {
        Self::from_events(XmlEventSource::new(reader), config)
    }

    fn from_events<R: BufRead>(events: XmlEventSource<R>, config: &IndexConfig) -> Result<Self> {
        let (root, stats) = OmxDecoder::new(omssa_registry()).decode_with_stats(events)?;
        let index = OmssaIndex::build(&root, *config)?;
        Ok(Self {
            root,
            index,
            stats,
            modifications: None,
        })
    }

    /// Attach a modification table
    pub fn with_modifications(mut self, modifications: ModificationRegistry) -> Self {
        self.modifications = Some(modifications);
        self
    }

    /// Decoded document root
    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    /// Cross-reference indices
    pub fn index(&self) -> &OmssaIndex {
        &self.index
    }

    /// Counters from decoding
    pub fn decode_stats(&self) -> DecodeStats {
        self.stats
    }

    /// Attached modification table
    pub fn modifications(&self) -> Option<&ModificationRegistry> {
        self.modifications.as_ref()
    }

    /// Request entries in document order
    pub fn requests(&self) -> Vec<Request> {
        Request::all(&self.root)
    }

    /// Response entries in document order
    pub fn responses(&self) -> Vec<Response> {
        Response::all(&self.root)
    }

    /// Every spectrum of every request, in request/key order
    pub fn spectra(&self) -> Vec<Spectrum> {
        self.requests().iter().flat_map(Request::spectra).collect()
    }

    /// Every hit set of every response, in response/key order
    pub fn hit_sets(&self) -> Vec<HitSet> {
        self.responses().iter().flat_map(Response::hit_sets).collect()
    }

    /// Spectrum → hit set
    pub fn spectrum_to_hit_set(&self) -> &BTreeMap<Spectrum, HitSet> {
        self.index.spectrum_to_hit_set()
    }

    /// Spectrum → distinct peptide strings
    pub fn spectrum_to_peptides(&self) -> &BTreeMap<Spectrum, BTreeSet<String>> {
        self.index.spectrum_to_peptides()
    }

    /// Peptide string → spectra
    pub fn peptide_to_spectra(&self) -> &HashMap<String, Vec<Spectrum>> {
        self.index.peptide_to_spectra()
    }

    /// Peptide string → peptide-protein hits
    pub fn peptide_to_pep_hits(&self) -> &HashMap<String, Vec<PepHit>> {
        self.index.peptide_to_pep_hits()
    }

    /// Protein accession → peptide strings
    pub fn protein_to_peptides(&self) -> &HashMap<String, Vec<String>> {
        self.index.protein_to_peptides()
    }

    /// Peptides of one protein with their hit detail for that protein
    pub fn peptides_of_protein(&self, accession: &str) -> BTreeMap<String, PepHit> {
        self.index.peptides_of_protein(accession)
    }

    /// Number of spectra across all requests
    pub fn spectrum_count(&self) -> usize {
        self.requests().iter().map(|r| r.spectra().len()).sum()
    }

    /// Number of hits across all hit sets
    pub fn hit_count(&self) -> usize {
        self.hit_sets().iter().map(|h| h.hits().len()).sum()
    }

    /// Counts for reporting
    pub fn summary(&self) -> Summary {
        let requests = self.requests();
        let responses = self.responses();
        let hit_sets = self.hit_sets();
        let hits: Vec<_> = hit_sets.iter().flat_map(HitSet::hits).collect();
        let peptides: BTreeSet<&str> = hits.iter().filter_map(|hit| hit.pepstring()).collect();
        Summary {
            requests: requests.len(),
            responses: responses.len(),
            spectra: requests.iter().map(|r| r.spectra().len()).sum(),
            hit_sets: hit_sets.len(),
            hits: hits.len(),
            peptides: peptides.len(),
            proteins: self.index.protein_to_peptides().len(),
            modifications: self.modifications.as_ref().map(ModificationRegistry::len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexError;
    use crate::Error;
    use std::io::Cursor;

    const SMALL: &str = r#"<?xml version="1.0"?>
<MSSearch>
  <MSSearch_request>
    <MSRequest>
      <MSRequest_spectra>
        <MSSpectrumset>
          <MSSpectrum><MSSpectrum_number>1</MSSpectrum_number></MSSpectrum>
          <MSSpectrum><MSSpectrum_number>2</MSSpectrum_number></MSSpectrum>
        </MSSpectrumset>
      </MSRequest_spectra>
    </MSRequest>
  </MSSearch_request>
  <MSSearch_response>
    <MSResponse>
      <MSResponse_hitsets>
        <MSHitSet>
          <MSHitSet_number>1</MSHitSet_number>
          <MSHitSet_hits>
            <MSHits>
              <MSHits_pepstring>AAK</MSHits_pepstring>
              <MSHits_pephits>
                <MSPepHit><MSPepHit_accession>P1</MSPepHit_accession></MSPepHit>
              </MSHits_pephits>
            </MSHits>
            <MSHits><MSHits_pepstring>CCK</MSHits_pepstring></MSHits>
          </MSHitSet_hits>
        </MSHitSet>
        <MSHitSet><MSHitSet_number>2</MSHitSet_number></MSHitSet>
      </MSResponse_hitsets>
    </MSResponse>
  </MSSearch_response>
</MSSearch>"#;

    #[test]
    fn test_summary() {
        let file = OmssaFile::from_reader(Cursor::new(SMALL), &IndexConfig::default()).unwrap();
        let summary = file.summary();
        assert_eq!(
            summary,
            Summary {
                requests: 1,
                responses: 1,
                spectra: 2,
                hit_sets: 2,
                hits: 2,
                peptides: 2,
                proteins: 1,
                modifications: None,
            }
        );
        assert_eq!(file.spectrum_count(), 2);
        assert_eq!(file.hit_count(), 2);
        assert_eq!(file.spectrum_to_hit_set().len(), 2);
        assert!(file.decode_stats().elements > 0);
    }

    #[test]
    fn test_with_modifications() {
        let file = OmssaFile::from_reader(Cursor::new(SMALL), &IndexConfig::default())
            .unwrap()
            .with_modifications(ModificationRegistry::new());
        assert_eq!(file.summary().modifications, Some(0));
    }

    #[test]
    fn test_errors_carry_stage() {
        let err = OmssaFile::from_reader(Cursor::new("<MSSearch>"), &IndexConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));

        let misaligned = SMALL.replace(
            "<MSHitSet><MSHitSet_number>2</MSHitSet_number></MSHitSet>",
            "<MSHitSet/><MSHitSet/>",
        );
        let err = OmssaFile::from_reader(Cursor::new(misaligned), &IndexConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Index(IndexError::MisalignedIndex { response: 0, key: 2 })
        ));
    }
}
