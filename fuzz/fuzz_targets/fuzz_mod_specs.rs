#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use omssa::mods::ModificationRegistry;

fuzz_target!(|data: &[u8]| {
    let mut registry = ModificationRegistry::new();
    let _ = registry.load_reader(Cursor::new(data));
});
