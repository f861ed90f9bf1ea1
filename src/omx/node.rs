//! Decoded node tree
//!
//! A decoded OMX document is a tree of [`Node`]s. Leaves are coerced
//! [`Scalar`]s; everything else is a [`Composite`] whose named slots hold one
//! child, an ordered list of children, or an integer-keyed map of children.
//! Children are reference counted so that typed views and indices can hold on
//! to them without borrowing from the tree.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::coerce::Scalar;
use super::registry::Arity;

/// The materialized result of decoding one element
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A coerced leaf value
    Scalar(Scalar),
    /// A container with named slots
    Composite(Composite),
}

impl Node {
    /// Get the scalar value, if this is a leaf
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            Node::Composite(_) => None,
        }
    }

    /// Get the composite, if this is a container
    pub fn as_composite(&self) -> Option<&Composite> {
        match self {
            Node::Composite(c) => Some(c),
            Node::Scalar(_) => None,
        }
    }

    /// Element name of a composite node
    pub fn name(&self) -> Option<&str> {
        self.as_composite().map(Composite::name)
    }

    /// The slot called `field`, if this is a composite and the slot is set
    pub fn slot(&self, field: &str) -> Option<&Slot> {
        self.as_composite()?.slot(field)
    }

    /// The single child held in `field`
    ///
    /// For list and keyed slots this is the last child, matching the
    /// "latest value wins" rule of singular slots.
    pub fn child(&self, field: &str) -> Option<&Arc<Node>> {
        self.slot(field)?.last()
    }

    /// Follow a chain of fields, taking the single child at each step
    pub fn path(&self, fields: &[&str]) -> Option<&Node> {
        let mut node = self;
        for field in fields {
            node = node.child(field).map(Arc::as_ref)?;
        }
        Some(node)
    }

    /// Scalar held in `field`
    pub fn scalar(&self, field: &str) -> Option<&Scalar> {
        self.child(field)?.as_scalar()
    }

    /// Integer held in `field`
    pub fn i64(&self, field: &str) -> Option<i64> {
        self.scalar(field)?.as_i64()
    }

    /// Float held in `field`; integer leaves are widened
    pub fn f64(&self, field: &str) -> Option<f64> {
        self.scalar(field)?.as_f64()
    }

    /// Boolean held in `field`
    pub fn bool(&self, field: &str) -> Option<bool> {
        self.scalar(field)?.as_bool()
    }

    /// String held in `field`
    pub fn str(&self, field: &str) -> Option<&str> {
        self.scalar(field)?.as_str()
    }

    /// Children held in `field` in document order, whatever the slot arity
    pub fn children(&self, field: &str) -> Vec<&Arc<Node>> {
        self.slot(field).map(Slot::values).unwrap_or_default()
    }

    /// Integer-keyed children held in `field`
    pub fn keyed(&self, field: &str) -> Option<&BTreeMap<usize, Arc<Node>>> {
        match self.slot(field)? {
            Slot::Keyed(map) => Some(map),
            _ => None,
        }
    }
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Node::Scalar(value)
    }
}

impl From<Composite> for Node {
    fn from(value: Composite) -> Self {
        Node::Composite(value)
    }
}

/// A decoded element with named child slots
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Composite {
    name: String,
    slots: HashMap<String, Slot>,
}

impl Composite {
    /// Create an empty composite for the element `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: HashMap::new(),
        }
    }

    /// Element name this composite was decoded from
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The slot called `field`
    pub fn slot(&self, field: &str) -> Option<&Slot> {
        self.slots.get(field)
    }

    /// All populated slots
    pub fn slots(&self) -> impl Iterator<Item = (&str, &Slot)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of populated slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot has been populated
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Place `value` into the slot `field` following `arity`
    ///
    /// Singular slots keep the latest value, lists append, keyed maps append
    /// under the next sequential key starting at 0. If the slot already holds
    /// a different arity it is replaced.
    pub fn assign(&mut self, field: &str, arity: Arity, value: Arc<Node>) {
        match (arity, self.slots.get_mut(field)) {
            (Arity::Single, _) => {
                self.slots.insert(field.to_owned(), Slot::Single(value));
            }
            (Arity::List, Some(Slot::List(items))) => items.push(value),
            (Arity::List, _) => {
                self.slots.insert(field.to_owned(), Slot::List(vec![value]));
            }
            (Arity::Keyed, Some(Slot::Keyed(map))) => {
                let key = map.len();
                map.insert(key, value);
            }
            (Arity::Keyed, _) => {
                let mut map = BTreeMap::new();
                map.insert(0, value);
                self.slots.insert(field.to_owned(), Slot::Keyed(map));
            }
        }
    }
}

/// Contents of one composite slot
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Exactly one child
    Single(Arc<Node>),
    /// Children in document order
    List(Vec<Arc<Node>>),
    /// Children keyed `0..n` in document order
    Keyed(BTreeMap<usize, Arc<Node>>),
}

impl Slot {
    /// Children in document order
    pub fn values(&self) -> Vec<&Arc<Node>> {
        match self {
            Slot::Single(node) => vec![node],
            Slot::List(items) => items.iter().collect(),
            Slot::Keyed(map) => map.values().collect(),
        }
    }

    /// Last child in document order
    pub fn last(&self) -> Option<&Arc<Node>> {
        match self {
            Slot::Single(node) => Some(node),
            Slot::List(items) => items.last(),
            Slot::Keyed(map) => map.values().next_back(),
        }
    }

    /// Number of children held
    pub fn len(&self) -> usize {
        match self {
            Slot::Single(_) => 1,
            Slot::List(items) => items.len(),
            Slot::Keyed(map) => map.len(),
        }
    }

    /// Whether the slot holds no child
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
