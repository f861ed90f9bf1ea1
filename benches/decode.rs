use std::io::Cursor;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use omssa::index::{IndexConfig, OmssaIndex};
use omssa::omx::{omssa_registry, OmxDecoder};

fn generate_test_omx(num_spectra: usize, hits_per_spectrum: usize) -> Vec<u8> {
    let mut spectra = String::new();
    let mut hit_sets = String::new();

    for i in 0..num_spectra {
        let mz: String = (0..50)
            .map(|j| format!("<MSSpectrum_mz_E>{}</MSSpectrum_mz_E>", 100_000 + j * 1_000 + i))
            .collect();
        spectra.push_str(&format!(
            r#"
          <MSSpectrum>
            <MSSpectrum_number>{i}</MSSpectrum_number>
            <MSSpectrum_charge><MSSpectrum_charge_E>2</MSSpectrum_charge_E></MSSpectrum_charge>
            <MSSpectrum_precursormz>{}</MSSpectrum_precursormz>
            <MSSpectrum_mz>{mz}</MSSpectrum_mz>
            <MSSpectrum_ids><MSSpectrum_ids_E>scan={}</MSSpectrum_ids_E></MSSpectrum_ids>
          </MSSpectrum>"#,
            500_000 + i,
            i + 1
        ));

        hit_sets.push_str(&format!(
            r#"
          <MSHitSet>
            <MSHitSet_number>{i}</MSHitSet_number>
            <MSHitSet_error><MSHitError value="none">0</MSHitError></MSHitSet_error>
            <MSHitSet_hits>"#
        ));
        for h in 0..hits_per_spectrum {
            hit_sets.push_str(&format!(
                r#"
              <MSHits>
                <MSHits_evalue>{}</MSHits_evalue>
                <MSHits_charge>2</MSHits_charge>
                <MSHits_pephits>
                  <MSPepHit>
                    <MSPepHit_start>{h}</MSPepHit_start>
                    <MSPepHit_accession>PROT{}</MSPepHit_accession>
                  </MSPepHit>
                </MSHits_pephits>
                <MSHits_pepstring>PEPTIDE{}K</MSHits_pepstring>
                <MSHits_unknown-extension><Anything>ignored</Anything></MSHits_unknown-extension>
              </MSHits>"#,
                0.001 * (h + 1) as f64,
                (i + h) % 97,
                (i * 7 + h) % 503
            ));
        }
        hit_sets.push_str("</MSHitSet_hits></MSHitSet>");
    }

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
    .into_bytes()
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("omx_decode");
    let decoder = OmxDecoder::new(omssa_registry());

    for num_spectra in [100, 500, 1000] {
        let omx_bytes = Arc::new(generate_test_omx(num_spectra, 5));

        group.throughput(Throughput::Bytes(omx_bytes.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_spectra),
            &omx_bytes,
            |b, bytes| {
                b.iter(|| {
                    let root = decoder.decode_reader(Cursor::new(bytes.as_slice())).unwrap();
                    black_box(root);
                });
            },
        );
    }

    group.finish();
}

fn bench_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("omx_index");
    let decoder = OmxDecoder::new(omssa_registry());

    for num_spectra in [100, 500, 1000] {
        let root = decoder
            .decode_reader(Cursor::new(generate_test_omx(num_spectra, 5)))
            .unwrap();

        group.throughput(Throughput::Elements(num_spectra as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_spectra), &root, |b, root| {
            b.iter(|| {
                let index = OmssaIndex::build(root, IndexConfig::default()).unwrap();
                black_box(index.spectrum_to_hit_set().len());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_index);
criterion_main!(benches);
