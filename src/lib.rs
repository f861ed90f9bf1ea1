//! # omssa - OMSSA search results in Rust
//!
//! `omssa` reads the XML result files (`.omx`) written by the OMSSA peptide
//! search engine and the `mods.xml`/`usermods.xml` modification tables that
//! accompany them.
//!
//! ## Key Features
//!
//! - **Streaming decoding**: OMX documents are read through a pull parser with
//!   an explicit element stack, so very large and very deep documents decode
//!   in one pass without recursion.
//!
//! - **Schema driven**: the element vocabulary lives in a [`SchemaRegistry`]
//!   built once and shared read-only. Elements the registry does not know are
//!   skipped with their whole subtree, so newer OMSSA output still decodes.
//!
//! - **Cross-reference indices**: spectrum → hit set, spectrum → peptides,
//!   peptide → spectra, peptide → protein hits and protein → peptides are
//!   built right after decoding.
//!
//! - **Modification tables**: base and user modification files are loaded
//!   independently; one broken file does not lose the other.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use omssa::prelude::*;
//!
//! let file = OmssaFile::from_path("search.omx", &IndexConfig::default())?;
//!
//! for (spectrum, peptides) in file.spectrum_to_peptides() {
//!     println!("{:?}: {:?}", spectrum.name(), peptides);
//! }
//!
//! for (peptide, hit) in file.peptides_of_protein("sp|P02769|ALBU_BOVIN") {
//!     println!("{peptide} at {:?}..{:?}", hit.start(), hit.stop());
//! }
//! # Ok::<(), omssa::Error>(())
//! ```
//!
//! ## Loading Modifications
//!
//! ```rust,no_run
//! use std::path::Path;
//! use omssa::mods::ModificationRegistry;
//!
//! let (mods, report) = ModificationRegistry::load(
//!     Some(Path::new("mods.xml")),
//!     Some(Path::new("usermods.xml")),
//! );
//! for failure in &report.failed {
//!     eprintln!("{failure}");
//! }
//! if let Some(oxidation) = mods.get(1) {
//!     println!("{} {:?}", oxidation.name, oxidation.mono_mass);
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`omx`]: event source, value coercion, schema registry, streaming decoder
//!   and typed views over the decoded tree
//! - [`index`]: cross-reference indices over a decoded document
//! - [`mods`]: modification table loader
//! - [`error`]: crate-level error wrapping the per-stage errors
//!
//! ## Document Layout
//!
//! ```text
//! MSSearch
//! ├── MSSearch_request
//! │   └── MSRequest*
//! │       └── MSRequest_spectra / MSSpectrumset / MSSpectrum*   (keyed 0..n)
//! └── MSSearch_response
//!     └── MSResponse*
//!         └── MSResponse_hitsets / MSHitSet*                    (keyed 0..n)
//!             └── MSHitSet_hits / MSHits*
//!                 ├── MSHits_pepstring
//!                 ├── MSHits_pephits / MSPepHit*
//!                 └── MSHits_mods / MSModHit*
//! ```
//!
//! Hit set `k` of response `i` answers spectrum `k` of request `i`.

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod file;
pub mod index;
pub mod mods;
pub mod omx;

pub use error::{Error, Result};
pub use file::{OmssaFile, Summary};
pub use omx::SchemaRegistry;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::file::{OmssaFile, Summary};
    pub use crate::index::{AlignmentPolicy, IndexConfig, IndexError, OmssaIndex};
    pub use crate::mods::{ModificationDescriptor, ModificationRegistry};
    pub use crate::omx::model::{Hit, HitSet, ModHit, PepHit, Request, Response, Spectrum};
    pub use crate::omx::{omssa_registry, DecodeError, Node, OmxDecoder};
}
