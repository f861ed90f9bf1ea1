//! # OMX decoding
//!
//! OMSSA writes its search results as NCBI serial XML ("OMX"): every ASN.1
//! object becomes an element, every member becomes a wrapper element named
//! `Object_member`, and sequences hold their items in another wrapper. The
//! documents get large, so decoding is streaming and driven by a
//! [`SchemaRegistry`] rather than by a DOM.
//!
//! ## Pipeline
//!
//! ```text
//! bytes ──► XmlEventSource ──► OmxEvent* ──► OmxDecoder + SchemaRegistry ──► Arc<Node>
//!                                                                              │
//!                                                     typed views (model) ◄────┘
//! ```
//!
//! - [`events`]: pulls `open`/`text`/`close` events out of the XML with `quick-xml`
//! - [`coerce`]: turns leaf text into integers, floats, booleans and strings
//! - [`registry`]: describes which tags are scalars, which are composites and
//!   where each child lands in its parent
//! - [`schema`]: the registry for OMSSA's `MSSearch` documents
//! - [`node`]: the decoded tree
//! - [`model`]: typed views over that tree (spectra, hit sets, hits...)
//!
//! ## Example
//!
//! ```rust,no_run
//! use omssa::omx::{omssa_registry, OmxDecoder};
//! use omssa::omx::model::Response;
//!
//! let root = OmxDecoder::new(omssa_registry()).decode_path("search.omx")?;
//! for response in Response::all(&root) {
//!     for hit_set in response.hit_sets() {
//!         println!("hit set {} has {} hits", hit_set.key(), hit_set.hits().len());
//!     }
//! }
//! # Ok::<(), omssa::omx::DecodeError>(())
//! ```

pub mod coerce;
pub mod events;
pub mod model;
pub mod node;
pub mod registry;
pub mod schema;

mod decoder;

pub use coerce::{CoercionError, Scalar, ScalarKind};
pub use decoder::{DecodeError, DecodeStats, DecoderOptions, OmxDecoder};
pub use events::{OmxEvent, XmlEventSource};
pub use node::{Composite, Node, Slot};
pub use registry::{
    Arity, CompositeDescriptor, ElementDescriptor, SchemaRegistry, SchemaRegistryBuilder,
    SlotDescriptor,
};
pub use schema::omssa_registry;
