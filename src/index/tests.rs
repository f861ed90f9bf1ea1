use super::*;
use crate::omx::{omssa_registry, OmxDecoder};
use std::io::Cursor;
use std::sync::Arc;

/// `(peptide, accessions)` for one hit
type HitSpec<'a> = (&'a str, &'a [&'a str]);

fn spectrum_xml(number: usize, id: &str) -> String {
    format!(
        r#"<MSSpectrum>
  <MSSpectrum_number>{number}</MSSpectrum_number>
  <MSSpectrum_charge><MSSpectrum_charge_E>2</MSSpectrum_charge_E></MSSpectrum_charge>
  <MSSpectrum_precursormz>500000</MSSpectrum_precursormz>
  <MSSpectrum_ids><MSSpectrum_ids_E>{id}</MSSpectrum_ids_E></MSSpectrum_ids>
</MSSpectrum>"#
    )
}

fn hit<'a>(pep: &'a str, accessions: &'a [&'a str]) -> HitSpec<'a> {
    (pep, accessions)
}

fn hit_set_xml(number: usize, hits: &[HitSpec]) -> String {
    let mut xml = format!(
        "<MSHitSet><MSHitSet_number>{number}</MSHitSet_number>\
         <MSHitSet_error><MSHitError value=\"none\">0</MSHitError></MSHitSet_error><MSHitSet_hits>"
    );
    for (pep, accessions) in hits {
        xml.push_str(
            "<MSHits><MSHits_evalue>0.001</MSHits_evalue><MSHits_charge>2</MSHits_charge><MSHits_pephits>",
        );
        for accession in accessions.iter() {
            xml.push_str(&format!(
                "<MSPepHit><MSPepHit_start>10</MSPepHit_start>\
                 <MSPepHit_accession>{accession}</MSPepHit_accession>\
                 <MSPepHit_defline>{accession} protein</MSPepHit_defline></MSPepHit>"
            ));
        }
        xml.push_str(&format!(
            "</MSHits_pephits><MSHits_pepstring>{pep}</MSHits_pepstring></MSHits>"
        ));
    }
    xml.push_str("</MSHitSet_hits></MSHitSet>");
    xml
}

fn document(spectra: &[&str], hit_sets: Vec<Vec<HitSpec>>) -> String {
    let spectra: String = spectra
        .iter()
        .enumerate()
        .map(|(i, id)| spectrum_xml(i, id))
        .collect();
    let hit_sets: String = hit_sets
        .iter()
        .enumerate()
        .map(|(i, hits)| hit_set_xml(i, hits))
        .collect();
    format!(
        r#"<?xml version="1.0"?>
<MSSearch>
  <MSSearch_request>
    <MSRequest>
      <MSRequest_spectra><MSSpectrumset>{spectra}</MSSpectrumset></MSRequest_spectra>
    </MSRequest>
  </MSSearch_request>
  <MSSearch_response>
    <MSResponse>
      <MSResponse_hitsets>{hit_sets}</MSResponse_hitsets>
      <MSResponse_scale>1000</MSResponse_scale>
    </MSResponse>
  </MSSearch_response>
</MSSearch>"#
    )
}

fn decode(xml: &str) -> Arc<Node> {
    OmxDecoder::new(omssa_registry())
        .decode_reader(Cursor::new(xml.as_bytes()))
        .unwrap()
}

fn build(xml: &str) -> OmssaIndex {
    OmssaIndex::build(&decode(xml), IndexConfig::default()).unwrap()
}

fn by_name<'a>(index: &'a OmssaIndex, name: &str) -> &'a Spectrum {
    index
        .spectra()
        .find(|s| s.name() == Some(name))
        .unwrap_or_else(|| panic!("spectrum {name} not indexed"))
}

#[test]
fn test_scenario() {
    let index = build(&document(
        &["specA", "specB"],
        vec![vec![hit("PEPTIDEK", &["P1"])], vec![]],
    ));

    assert_eq!(index.spectrum_to_hit_set().len(), 2);

    let spec_a = by_name(&index, "specA");
    let spec_b = by_name(&index, "specB");
    assert_eq!(
        index.peptides(spec_a).unwrap().iter().collect::<Vec<_>>(),
        vec!["PEPTIDEK"]
    );
    assert!(index.peptides(spec_b).unwrap().is_empty());

    let spectra = index.spectra_for_peptide("PEPTIDEK");
    assert_eq!(spectra.len(), 1);
    assert_eq!(spectra[0].name(), Some("specA"));

    assert_eq!(index.peptides_for_protein("P1"), ["PEPTIDEK".to_string()]);
    assert!(index.hit_set(spec_b).unwrap().is_empty());
}

#[test]
fn test_each_spectrum_gets_own_peptide_set() {
    let index = build(&document(
        &["s0", "s1"],
        vec![vec![hit("AAAK", &["P1"])], vec![hit("CCCK", &["P2"])]],
    ));

    let s0 = index.peptides(by_name(&index, "s0")).unwrap();
    let s1 = index.peptides(by_name(&index, "s1")).unwrap();
    assert!(s0.contains("AAAK") && !s0.contains("CCCK"));
    assert!(s1.contains("CCCK") && !s1.contains("AAAK"));
}

#[test]
fn test_index_completeness() {
    let root = decode(&document(
        &["a", "b", "c"],
        vec![
            vec![hit("AAAK", &["P1"])],
            vec![hit("BBBK", &["P1"])],
            vec![hit("AAAK", &["P2"])],
        ],
    ));
    let index = OmssaIndex::build(&root, IndexConfig::default()).unwrap();

    let request = Request::all(&root).pop().unwrap();
    assert_eq!(request.spectra().len(), 3);
    for spectrum in request.spectra() {
        assert!(index.hit_set(&spectrum).is_some());
    }
    for spectrum in index.spectrum_to_peptides().keys() {
        assert!(index.spectrum_to_hit_set().contains_key(spectrum));
    }
    assert_eq!(index.spectra_for_peptide("AAAK").len(), 2);
}

#[test]
fn test_peptide_protein_fan_out() {
    let index = build(&document(
        &["s0"],
        vec![vec![hit("SHAREDK", &["P1"]), hit("SHAREDK", &["P2"])]],
    ));

    let accessions: Vec<_> = index
        .pep_hits_for_peptide("SHAREDK")
        .iter()
        .filter_map(|hit| hit.accession())
        .collect();
    assert_eq!(accessions, vec!["P1", "P2"]);
    assert_eq!(index.peptides_for_protein("P1"), ["SHAREDK".to_string()]);
    assert_eq!(index.peptides_for_protein("P2"), ["SHAREDK".to_string()]);

    // One set entry, one spectrum append per hit.
    let s0 = by_name(&index, "s0");
    assert_eq!(index.peptides(s0).unwrap().len(), 1);
    assert_eq!(index.spectra_for_peptide("SHAREDK").len(), 2);
}

#[test]
fn test_peptides_of_protein() {
    let index = build(&document(
        &["s0", "s1"],
        vec![
            vec![hit("AAAK", &["P1", "P2"]), hit("CCCK", &["P2"])],
            vec![hit("AAAK", &["P1"])],
        ],
    ));

    let detail = index.peptides_of_protein("P2");
    assert_eq!(detail.keys().collect::<Vec<_>>(), vec!["AAAK", "CCCK"]);
    assert_eq!(detail["AAAK"].accession(), Some("P2"));
    assert_eq!(detail["AAAK"].defline(), Some("P2 protein"));
    assert_eq!(detail["AAAK"].start(), Some(10));

    // P1 lists AAAK twice; the detail map holds it once.
    assert_eq!(index.peptides_for_protein("P1").len(), 2);
    assert_eq!(index.peptides_of_protein("P1").len(), 1);
    assert!(index.peptides_of_protein("unknown").is_empty());
}

#[test]
fn test_misaligned_strict_and_lenient() {
    // Three hit sets answer a request with two spectra.
    let xml = document(
        &["s0", "s1"],
        vec![vec![hit("AAAK", &["P1"])], vec![], vec![hit("DDDK", &["P3"])]],
    );
    let root = decode(&xml);

    let err = OmssaIndex::build(&root, IndexConfig::default()).unwrap_err();
    assert_eq!(err, IndexError::MisalignedIndex { response: 0, key: 2 });

    let index = OmssaIndex::build(&root, IndexConfig::lenient()).unwrap();
    assert_eq!(index.spectrum_to_hit_set().len(), 2);
    assert!(index.spectra_for_peptide("DDDK").is_empty());
    // The protein side still sees every hit.
    assert_eq!(index.peptides_for_protein("P3"), ["DDDK".to_string()]);
}

#[test]
fn test_missing_request() {
    let xml = r#"<MSSearch>
  <MSSearch_request></MSSearch_request>
  <MSSearch_response>
    <MSResponse><MSResponse_hitsets><MSHitSet><MSHitSet_number>0</MSHitSet_number></MSHitSet></MSResponse_hitsets></MSResponse>
  </MSSearch_response>
</MSSearch>"#;
    let root = decode(xml);

    assert_eq!(
        OmssaIndex::build(&root, IndexConfig::default()).unwrap_err(),
        IndexError::MissingRequest { response: 0 }
    );
    let index = OmssaIndex::build(&root, IndexConfig::lenient()).unwrap();
    assert!(index.spectrum_to_hit_set().is_empty());
}

#[test]
fn test_response_without_hit_sets_needs_no_request() {
    let xml = r#"<MSSearch>
  <MSSearch_request>
    <MSRequest><MSRequest_spectra><MSSpectrumset>
      <MSSpectrum><MSSpectrum_number>0</MSSpectrum_number></MSSpectrum>
    </MSSpectrumset></MSRequest_spectra></MSRequest>
  </MSSearch_request>
  <MSSearch_response>
    <MSResponse><MSResponse_hitsets><MSHitSet><MSHitSet_number>0</MSHitSet_number></MSHitSet></MSResponse_hitsets></MSResponse>
    <MSResponse><MSResponse_scale>1000</MSResponse_scale></MSResponse>
  </MSSearch_response>
</MSSearch>"#;
    let root = decode(xml);

    let index = OmssaIndex::build(&root, IndexConfig::default()).unwrap();
    assert_eq!(index.spectrum_to_hit_set().len(), 1);
}

#[test]
fn test_typed_views() {
    let root = decode(&document(&["specA"], vec![vec![hit("PEPTIDEK", &["P1"])]]));
    let request = &Request::all(&root)[0];
    let spectrum = request.spectrum(0).unwrap();
    assert_eq!(spectrum.number(), Some(0));
    assert_eq!(spectrum.charges(), vec![2]);
    assert_eq!(spectrum.precursor_mz(), Some(500_000));

    let response = &Response::all(&root)[0];
    assert_eq!(response.scale(), Some(1000));
    let hit_set = &response.hit_sets()[0];
    assert_eq!(hit_set.error(), Some(0));
    let hit = &hit_set.hits()[0];
    assert_eq!(hit.pepstring(), Some("PEPTIDEK"));
    assert_eq!(hit.charge(), Some(2));
    assert!((hit.evalue().unwrap() - 0.001).abs() < 1e-12);
}

#[test]
fn test_alignment_policy_from_toml() {
    let config: IndexConfig = toml::from_str(r#"alignment = "lenient""#).unwrap();
    assert_eq!(config.alignment, AlignmentPolicy::Lenient);
    let config: IndexConfig = toml::from_str("").unwrap();
    assert_eq!(config.alignment, AlignmentPolicy::Strict);
}
