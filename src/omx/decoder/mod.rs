//! Schema-driven streaming decoder
//!
//! The decoder turns a stream of [`OmxEvent`]s into a [`Node`] tree using a
//! [`SchemaRegistry`]. It keeps an explicit stack of open elements, so the
//! nesting depth of a document never grows the call stack.
//!
//! Elements the registry does not know, or that their parent declares no slot
//! for, are skipped together with everything inside them. This keeps older
//! decoders working on documents written by newer OMSSA versions.

use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use super::coerce::{coerce, CoercionError, ScalarKind};
use super::events::{OmxEvent, XmlEventSource, VALUE_ATTRIBUTE};
use super::node::{Composite, Node};
use super::registry::{CompositeDescriptor, ElementDescriptor, SchemaRegistry};

pub use error::DecodeError;

mod error;


/// Options for [`OmxDecoder`]
#[derive(Debug, Clone, Default)]
pub struct DecoderOptions {
    /// Designated document root element; `None` uses the registry's root
    pub root: Option<String>,
}

/// Counters collected during one decode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Elements resolved into the tree
    pub elements: usize,
    /// Unrecognized subtrees that were skipped
    pub skipped_subtrees: usize,
    /// Deepest nesting seen
    pub max_depth: usize,
}

/// Streaming decoder bound to a schema registry
///
/// The decoder holds no state between calls; each decode owns its own stack,
/// so one decoder (and one registry) can serve many documents.
#[derive(Debug, Clone)]
pub struct OmxDecoder<'r> {
    registry: &'r SchemaRegistry,
    root: String,
}

impl<'r> OmxDecoder<'r> {
    /// Create a decoder for documents described by `registry`
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self::with_options(registry, DecoderOptions::default())
    }

    /// Create a decoder with explicit options
    pub fn with_options(registry: &'r SchemaRegistry, options: DecoderOptions) -> Self {
        let root = options
            .root
            .unwrap_or_else(|| registry.root().to_string());
        Self { registry, root }
    }

    /// Name of the element this decoder binds as the document root
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Decode an XML document from a BufRead source
    pub fn decode_reader<R: BufRead>(&self, reader: R) -> Result<Arc<Node>, DecodeError> {
        self.decode(XmlEventSource::new(reader))
    }

    /// Decode an XML document from a file
    pub fn decode_path(&self, path: impl AsRef<Path>) -> Result<Arc<Node>, DecodeError> {
        self.decode(XmlEventSource::from_path(path)?)
    }

    /// Decode an event stream into the document root
    pub fn decode<I>(&self, events: I) -> Result<Arc<Node>, DecodeError>
    where
        I: IntoIterator<Item = Result<OmxEvent, DecodeError>>,
    {
        self.decode_with_stats(events).map(|(root, _)| root)
    }

    /// Decode an event stream, also returning decode counters
    pub fn decode_with_stats<I>(&self, events: I) -> Result<(Arc<Node>, DecodeStats), DecodeError>
    where
        I: IntoIterator<Item = Result<OmxEvent, DecodeError>>,
    {
        let mut state = DecodeState::new(self.registry, &self.root);

        for event in events {
            match event? {
                OmxEvent::Open { name, attribute } => state.open(name, attribute)?,
                OmxEvent::Text(text) => state.text(&text),
                OmxEvent::Close(name) => state.close(&name)?,
            }
        }

        state.finish()
    }
}

/// In-progress value of one open element
#[derive(Debug)]
enum FrameBody<'r> {
    /// Unrecognized, or inside an unrecognized subtree
    Skipped,
    Scalar {
        kind: ScalarKind,
        text: Option<String>,
        /// `value` attribute that failed coercion; text may still supply the value
        fallback: Option<String>,
        /// Already resolved from a `value` attribute
        assigned: bool,
    },
    Composite {
        descriptor: &'r CompositeDescriptor,
        node: Composite,
    },
}

#[derive(Debug)]
struct Frame<'r> {
    name: String,
    body: FrameBody<'r>,
}

impl Frame<'_> {
    fn is_recognized(&self) -> bool {
        !matches!(self.body, FrameBody::Skipped)
    }

    /// Whether this frame declares a slot for the child tag `tag`
    fn accepts(&self, tag: &str) -> bool {
        match &self.body {
            FrameBody::Composite { descriptor, .. } => descriptor.slot_for(tag).is_some(),
            _ => false,
        }
    }

    /// Place a finished child value into this frame's matching slot
    fn resolve(&mut self, tag: &str, value: Node) {
        if let FrameBody::Composite { descriptor, node } = &mut self.body {
            if let Some(slot) = descriptor.slot_for(tag) {
                node.assign(&slot.field, slot.arity, Arc::new(value));
            }
        }
    }
}

struct DecodeState<'r, 'a> {
    registry: &'r SchemaRegistry,
    root_name: &'a str,
    stack: Vec<Frame<'r>>,
    root: Option<Arc<Node>>,
    stats: DecodeStats,
}

impl<'r, 'a> DecodeState<'r, 'a> {
    fn new(registry: &'r SchemaRegistry, root_name: &'a str) -> Self {
        Self {
            registry,
            root_name,
            stack: Vec::new(),
            root: None,
            stats: DecodeStats::default(),
        }
    }

    fn open(
        &mut self,
        name: String,
        attribute: Option<(String, String)>,
    ) -> Result<(), DecodeError> {
        let body = match self.stack.last() {
            None => {
                if self.root.is_some() {
                    return Err(DecodeError::malformed(format!(
                        "element <{name}> after the document root was closed"
                    )));
                }
                if name != self.root_name {
                    return Err(DecodeError::malformed(format!(
                        "unexpected root element <{name}>, expected <{}>",
                        self.root_name
                    )));
                }
                self.body_for(&name)
            }
            Some(parent) if parent.is_recognized() && parent.accepts(&name) => self.body_for(&name),
            Some(parent) => {
                if parent.is_recognized() {
                    log::debug!(
                        "skipping unrecognized <{}> inside <{}> at depth {}",
                        name,
                        parent.name,
                        self.stack.len()
                    );
                    self.stats.skipped_subtrees += 1;
                }
                FrameBody::Skipped
            }
        };

        let mut frame = Frame { name, body };

        if let Some((key, value)) = attribute {
            if key == VALUE_ATTRIBUTE {
                self.apply_value_attribute(&mut frame, value);
            }
        }

        self.stack.push(frame);
        self.stats.max_depth = self.stats.max_depth.max(self.stack.len());
        Ok(())
    }

    fn body_for(&self, name: &str) -> FrameBody<'r> {
        match self.registry.get(name) {
            Some(ElementDescriptor::Scalar(kind)) => FrameBody::Scalar {
                kind: *kind,
                text: None,
                fallback: None,
                assigned: false,
            },
            Some(ElementDescriptor::Composite(descriptor)) => FrameBody::Composite {
                descriptor,
                node: Composite::new(name),
            },
            None => FrameBody::Skipped,
        }
    }

    /// An inline `value` attribute counts as the element's text and is
    /// resolved into the parent straight away
    fn apply_value_attribute(&mut self, frame: &mut Frame<'r>, value: String) {
        let FrameBody::Scalar {
            kind,
            fallback,
            assigned,
            ..
        } = &mut frame.body
        else {
            return;
        };

        match coerce(value.trim(), *kind) {
            Ok(scalar) => {
                match self.stack.last_mut() {
                    Some(parent) => parent.resolve(&frame.name, Node::Scalar(scalar)),
                    // open() has already checked the root name.
                    None => self.root = Some(Arc::new(Node::Scalar(scalar))),
                }
                self.stats.elements += 1;
                *assigned = true;
            }
            Err(_) => *fallback = Some(value),
        }
    }

    /// Chunks are kept raw and trimmed once when the element closes
    fn text(&mut self, content: &str) {
        if content.is_empty() {
            return;
        }
        if let Some(Frame {
            body: FrameBody::Scalar { text, .. },
            ..
        }) = self.stack.last_mut()
        {
            text.get_or_insert_with(String::new).push_str(content);
        }
    }

    fn close(&mut self, name: &str) -> Result<(), DecodeError> {
        let frame = self.stack.pop().ok_or_else(|| {
            DecodeError::malformed(format!("closing </{name}> without an open element"))
        })?;

        if frame.name != name {
            return Err(DecodeError::malformed(format!(
                "closing </{name}> does not match open <{}>",
                frame.name
            )));
        }

        let value = match frame.body {
            FrameBody::Skipped => return Ok(()),
            FrameBody::Composite { node, .. } => Node::Composite(node),
            FrameBody::Scalar { assigned: true, .. } => return Ok(()),
            FrameBody::Scalar {
                kind,
                text,
                fallback,
                ..
            } => {
                let text = text.as_deref().map(str::trim).filter(|t| !t.is_empty());
                let raw = text.or(fallback.as_deref()).unwrap_or_default();
                let scalar = coerce(raw, kind)
                    .map_err(|e: CoercionError| DecodeError::invalid_value(&frame.name, e))?;
                Node::Scalar(scalar)
            }
        };

        self.stats.elements += 1;
        match self.stack.last_mut() {
            Some(parent) => parent.resolve(&frame.name, value),
            None if frame.name == self.root_name => self.root = Some(Arc::new(value)),
            None => {
                return Err(DecodeError::malformed(format!(
                    "unexpected root element <{}>",
                    frame.name
                )))
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<(Arc<Node>, DecodeStats), DecodeError> {
        if !self.stack.is_empty() {
            let open: Vec<&str> = self.stack.iter().map(|f| f.name.as_str()).collect();
            return Err(DecodeError::malformed(format!(
                "unexpected end of document with {} open element(s): {}",
                open.len(),
                open.join(" > ")
            )));
        }

        let root = self
            .root
            .ok_or_else(|| DecodeError::malformed("document has no root element"))?;

        log::info!(
            "decoded {} elements (max depth {}), skipped {} unrecognized subtrees",
            self.stats.elements,
            self.stats.max_depth,
            self.stats.skipped_subtrees
        );
        Ok((root, self.stats))
    }
}
