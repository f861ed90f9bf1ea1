//! Schema registry: element name → node descriptor
//!
//! The registry is the decoder's only knowledge of the document vocabulary.
//! Each element is either a scalar leaf with a [`ScalarKind`] or a composite
//! whose child tags map to a named slot with an [`Arity`]. The registry is
//! built once and is read-only afterwards, so a single instance can be shared
//! by any number of concurrent decodes.
//!
//! ```
//! use omssa::omx::{Arity, ScalarKind, SchemaRegistry};
//!
//! let registry = SchemaRegistry::builder("MSHits")
//!     .composite("MSHits", |c| {
//!         c.slot("MSHits_evalue", "evalue", Arity::Single)
//!             .slot("MSHits_pephits", "pephits", Arity::Single)
//!     })
//!     .scalar("MSHits_evalue", ScalarKind::Float)
//!     .build();
//!
//! assert!(registry.get("MSHits").is_some());
//! assert!(registry.get("MSHits_pephits").is_none());
//! ```

use std::collections::HashMap;

use super::coerce::ScalarKind;

/// How many children a composite slot holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// One child; a repeated tag replaces the earlier value
    Single,
    /// Ordered sequence in document order
    List,
    /// Map keyed `0..n` in document order
    Keyed,
}

/// Where a child tag lands inside its parent composite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDescriptor {
    /// Name of the slot on the parent
    pub field: String,
    /// Slot arity
    pub arity: Arity,
}

/// Child slots of a composite element, keyed by child tag name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositeDescriptor {
    slots: HashMap<String, SlotDescriptor>,
}

impl CompositeDescriptor {
    /// Slot for the child tag `tag`
    pub fn slot_for(&self, tag: &str) -> Option<&SlotDescriptor> {
        self.slots.get(tag)
    }

    /// Number of declared child tags
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no child tags are declared
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Descriptor for one element name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementDescriptor {
    /// Leaf holding a scalar of the given kind
    Scalar(ScalarKind),
    /// Container with named child slots
    Composite(CompositeDescriptor),
}

/// Immutable mapping from element name to [`ElementDescriptor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRegistry {
    root: String,
    elements: HashMap<String, ElementDescriptor>,
}

impl SchemaRegistry {
    /// Start building a registry whose document root element is `root`
    pub fn builder(root: impl Into<String>) -> SchemaRegistryBuilder {
        SchemaRegistryBuilder {
            root: root.into(),
            elements: HashMap::new(),
        }
    }

    /// Name of the designated document root element
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Descriptor for `tag`, or `None` if the tag is not part of the schema
    pub fn get(&self, tag: &str) -> Option<&ElementDescriptor> {
        self.elements.get(tag)
    }

    /// Number of known element names
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the registry knows no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Builder for [`SchemaRegistry`]
#[derive(Debug)]
pub struct SchemaRegistryBuilder {
    root: String,
    elements: HashMap<String, ElementDescriptor>,
}

impl SchemaRegistryBuilder {
    /// Declare a scalar leaf
    pub fn scalar(mut self, tag: &str, kind: ScalarKind) -> Self {
        self.elements
            .insert(tag.to_owned(), ElementDescriptor::Scalar(kind));
        self
    }

    /// Declare several scalar leaves of the same kind
    pub fn scalars(mut self, tags: &[&str], kind: ScalarKind) -> Self {
        for tag in tags {
            self = self.scalar(tag, kind);
        }
        self
    }

    /// Declare a composite; `slots` adds its child slots
    pub fn composite(
        mut self,
        tag: &str,
        slots: impl FnOnce(CompositeBuilder) -> CompositeBuilder,
    ) -> Self {
        let built = slots(CompositeBuilder::default());
        self.elements
            .insert(tag.to_owned(), ElementDescriptor::Composite(built.descriptor));
        self
    }

    /// Declare a member wrapper holding repeated `item` children in `field`
    ///
    /// NCBI serial XML wraps sequences in a member element, e.g.
    /// `<MSSpectrum_ids><MSSpectrum_ids_E>..</MSSpectrum_ids_E></MSSpectrum_ids>`.
    pub fn sequence(self, tag: &str, item: &str, field: &str, arity: Arity) -> Self {
        self.composite(tag, |c| c.slot(item, field, arity))
    }

    /// Finish the registry
    pub fn build(self) -> SchemaRegistry {
        SchemaRegistry {
            root: self.root,
            elements: self.elements,
        }
    }
}

/// Builder for the slots of one composite element
#[derive(Debug, Default)]
pub struct CompositeBuilder {
    descriptor: CompositeDescriptor,
}

impl CompositeBuilder {
    /// Child tag `tag` lands in slot `field` with the given arity
    pub fn slot(mut self, tag: &str, field: &str, arity: Arity) -> Self {
        self.descriptor.slots.insert(
            tag.to_owned(),
            SlotDescriptor {
                field: field.to_owned(),
                arity,
            },
        );
        self
    }

    /// Several singular members whose field name is the tag after the last `_`
    ///
    /// `MSHits_evalue` lands in `evalue`.
    pub fn members(mut self, tags: &[&str]) -> Self {
        for tag in tags {
            let field = tag.rsplit('_').next().unwrap_or(*tag);
            self = self.slot(tag, field, Arity::Single);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_field_names() {
        let registry = SchemaRegistry::builder("MSHits")
            .composite("MSHits", |c| c.members(&["MSHits_evalue", "MSHits_pepstring"]))
            .build();

        let Some(ElementDescriptor::Composite(hits)) = registry.get("MSHits") else {
            panic!("MSHits should be a composite");
        };
        assert_eq!(hits.slot_for("MSHits_evalue").unwrap().field, "evalue");
        assert_eq!(hits.slot_for("MSHits_pepstring").unwrap().field, "pepstring");
        assert_eq!(hits.slot_for("MSHits_evalue").unwrap().arity, Arity::Single);
    }

    #[test]
    fn test_sequence_wrapper() {
        let registry = SchemaRegistry::builder("root")
            .sequence("MSSpectrum_ids", "MSSpectrum_ids_E", "values", Arity::List)
            .scalar("MSSpectrum_ids_E", ScalarKind::String)
            .build();

        assert_eq!(registry.root(), "root");
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get("MSSpectrum_ids_E"),
            Some(&ElementDescriptor::Scalar(ScalarKind::String))
        );
    }
}
