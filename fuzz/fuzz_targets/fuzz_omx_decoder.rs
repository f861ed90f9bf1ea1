#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use omssa::index::{IndexConfig, OmssaIndex};
use omssa::omx::{omssa_registry, OmxDecoder};

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must either succeed or fail with an error,
    // never panic
    let decoder = OmxDecoder::new(omssa_registry());
    if let Ok(root) = decoder.decode_reader(Cursor::new(data)) {
        // Whatever decoded must also index without panicking
        let _ = OmssaIndex::build(&root, IndexConfig::default());
        let _ = OmssaIndex::build(&root, IndexConfig::lenient());
    }
});
