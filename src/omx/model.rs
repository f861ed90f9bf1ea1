//! Typed views over a decoded OMX tree
//!
//! The decoder produces a generic [`Node`] tree. The wrappers in this module
//! give the OMSSA records names and typed accessors without copying anything:
//! each view holds an `Arc` to its node. Absent optional members come back as
//! `None` or an empty list.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::node::Node;
use super::schema::fields;

fn items<'a>(node: &'a Node, field: &str) -> Vec<&'a Arc<Node>> {
    node.child(field)
        .map(|wrapper| wrapper.children(fields::ITEMS))
        .unwrap_or_default()
}

fn integers(node: &Node, field: &str) -> Vec<i64> {
    items(node, field)
        .into_iter()
        .filter_map(|n| n.as_scalar()?.as_i64())
        .collect()
}

fn strings<'a>(node: &'a Node, field: &str) -> Vec<&'a str> {
    items(node, field)
        .into_iter()
        .filter_map(|n| n.as_scalar()?.as_str())
        .collect()
}

/// Code of an enumeration held in a single-value wrapper
fn enumeration(node: &Node, field: &str) -> Option<i64> {
    node.child(field)?.i64(fields::VALUE)
}

/// One entry of `MSSearch_request`
#[derive(Debug, Clone)]
pub struct Request {
    position: usize,
    node: Arc<Node>,
}

impl Request {
    /// All request entries of a decoded document, in document order
    pub fn all(root: &Node) -> Vec<Request> {
        items(root, fields::REQUEST)
            .into_iter()
            .enumerate()
            .map(|(position, node)| Request {
                position,
                node: Arc::clone(node),
            })
            .collect()
    }

    /// Position in the request list
    pub fn position(&self) -> usize {
        self.position
    }

    /// Underlying node
    pub fn node(&self) -> &Arc<Node> {
        &self.node
    }

    /// Request identifier
    pub fn rid(&self) -> Option<&str> {
        self.node.str(fields::RID)
    }

    /// Search settings record, if present
    pub fn settings(&self) -> Option<&Node> {
        self.node.path(&[fields::SETTINGS, fields::VALUE])
    }

    /// Input spectra keyed by their position in the spectrum set
    pub fn spectra(&self) -> Vec<Spectrum> {
        let Some(set) = self.node.path(&[fields::SPECTRA, fields::VALUE]) else {
            return Vec::new();
        };
        set.keyed(fields::ITEMS)
            .map(|map| {
                map.iter()
                    .map(|(key, node)| Spectrum::new(self.position, *key, Arc::clone(node)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Spectrum stored under `key`
    pub fn spectrum(&self, key: usize) -> Option<Spectrum> {
        let set = self.node.path(&[fields::SPECTRA, fields::VALUE])?;
        let node = set.keyed(fields::ITEMS)?.get(&key)?;
        Some(Spectrum::new(self.position, key, Arc::clone(node)))
    }
}

/// One entry of `MSSearch_response`
#[derive(Debug, Clone)]
pub struct Response {
    position: usize,
    node: Arc<Node>,
}

impl Response {
    /// All response entries of a decoded document, in document order
    pub fn all(root: &Node) -> Vec<Response> {
        items(root, fields::RESPONSE)
            .into_iter()
            .enumerate()
            .map(|(position, node)| Response {
                position,
                node: Arc::clone(node),
            })
            .collect()
    }

    /// Position in the response list
    pub fn position(&self) -> usize {
        self.position
    }

    /// Underlying node
    pub fn node(&self) -> &Arc<Node> {
        &self.node
    }

    /// Scale factor applied to integer m/z values
    pub fn scale(&self) -> Option<i64> {
        self.node.i64(fields::SCALE)
    }

    /// OMSSA version string
    pub fn version(&self) -> Option<&str> {
        self.node.str(fields::VERSION)
    }

    /// Number of sequences in the searched database
    pub fn db_version(&self) -> Option<i64> {
        self.node.i64(fields::DB_VERSION)
    }

    /// Response error code
    pub fn error(&self) -> Option<i64> {
        enumeration(&self.node, fields::ERROR)
    }

    /// Hit sets keyed by their position in the hit set list
    pub fn hit_sets(&self) -> Vec<HitSet> {
        self.node
            .child(fields::HITSETS)
            .and_then(|wrapper| wrapper.keyed(fields::ITEMS))
            .map(|map| {
                map.iter()
                    .map(|(key, node)| HitSet::new(self.position, *key, Arc::clone(node)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// An input spectrum, identified by its request position and key
#[derive(Debug, Clone)]
pub struct Spectrum {
    request: usize,
    key: usize,
    node: Arc<Node>,
}

impl Spectrum {
    /// Wrap a spectrum node found at `key` in request `request`
    pub fn new(request: usize, key: usize, node: Arc<Node>) -> Self {
        Self { request, key, node }
    }

    /// Position of the owning request
    pub fn request(&self) -> usize {
        self.request
    }

    /// Key within the request's spectrum set
    pub fn key(&self) -> usize {
        self.key
    }

    /// Underlying node
    pub fn node(&self) -> &Arc<Node> {
        &self.node
    }

    /// Spectrum number as written by the search engine
    pub fn number(&self) -> Option<i64> {
        self.node.i64(fields::NUMBER)
    }

    /// Candidate precursor charges
    pub fn charges(&self) -> Vec<i64> {
        integers(&self.node, fields::CHARGE)
    }

    /// Precursor m/z, scaled by the response scale
    pub fn precursor_mz(&self) -> Option<i64> {
        self.node.i64(fields::PRECURSOR_MZ)
    }

    /// Intensity scale
    pub fn iscale(&self) -> Option<f64> {
        self.node.f64(fields::ISCALE)
    }

    /// Peak m/z values, scaled
    pub fn mz(&self) -> Vec<i64> {
        integers(&self.node, fields::MZ)
    }

    /// Peak abundances, scaled by `iscale`
    pub fn abundance(&self) -> Vec<i64> {
        integers(&self.node, fields::ABUNDANCE)
    }

    /// Identifiers (usually the spectrum title)
    pub fn ids(&self) -> Vec<&str> {
        strings(&self.node, fields::IDS)
    }

    /// First identifier
    pub fn name(&self) -> Option<&str> {
        self.ids().into_iter().next()
    }

    /// Retention time start
    pub fn rt_start(&self) -> Option<f64> {
        self.node.f64(fields::RT_START)
    }

    /// Retention time stop
    pub fn rt_stop(&self) -> Option<f64> {
        self.node.f64(fields::RT_STOP)
    }

    fn position(&self) -> (usize, usize) {
        (self.request, self.key)
    }
}

impl PartialEq for Spectrum {
    fn eq(&self, other: &Self) -> bool {
        self.position() == other.position()
    }
}

impl Eq for Spectrum {}

impl Hash for Spectrum {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position().hash(state);
    }
}

impl PartialOrd for Spectrum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Spectrum {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position().cmp(&other.position())
    }
}

/// The candidate matches found for one spectrum
#[derive(Debug, Clone)]
pub struct HitSet {
    response: usize,
    key: usize,
    node: Arc<Node>,
}

impl HitSet {
    /// Wrap a hit set node found at `key` in response `response`
    pub fn new(response: usize, key: usize, node: Arc<Node>) -> Self {
        Self {
            response,
            key,
            node,
        }
    }

    /// Position of the owning response
    pub fn response(&self) -> usize {
        self.response
    }

    /// Key within the response's hit set map
    pub fn key(&self) -> usize {
        self.key
    }

    /// Underlying node
    pub fn node(&self) -> &Arc<Node> {
        &self.node
    }

    /// Spectrum number this hit set answers
    pub fn number(&self) -> Option<i64> {
        self.node.i64(fields::NUMBER)
    }

    /// Hit set error code
    pub fn error(&self) -> Option<i64> {
        enumeration(&self.node, fields::ERROR)
    }

    /// Identifiers copied from the spectrum
    pub fn ids(&self) -> Vec<&str> {
        strings(&self.node, fields::IDS)
    }

    /// Hits in document order
    pub fn hits(&self) -> Vec<Hit> {
        items(&self.node, fields::HITS)
            .into_iter()
            .map(|node| Hit::new(Arc::clone(node)))
            .collect()
    }

    /// Whether the hit set holds no hits
    pub fn is_empty(&self) -> bool {
        items(&self.node, fields::HITS).is_empty()
    }
}

impl PartialEq for HitSet {
    fn eq(&self, other: &Self) -> bool {
        (self.response, self.key) == (other.response, other.key)
    }
}

impl Eq for HitSet {}

/// One candidate peptide match
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    node: Arc<Node>,
}

impl Hit {
    /// Wrap a hit node
    pub fn new(node: Arc<Node>) -> Self {
        Self { node }
    }

    /// Underlying node
    pub fn node(&self) -> &Arc<Node> {
        &self.node
    }

    /// Matched peptide sequence
    pub fn pepstring(&self) -> Option<&str> {
        self.node.str(fields::PEPSTRING)
    }

    /// Expectation value
    pub fn evalue(&self) -> Option<f64> {
        self.node.f64(fields::EVALUE)
    }

    /// p-value
    pub fn pvalue(&self) -> Option<f64> {
        self.node.f64(fields::PVALUE)
    }

    /// Charge state of the match
    pub fn charge(&self) -> Option<i64> {
        self.node.i64(fields::CHARGE)
    }

    /// Experimental mass, scaled
    pub fn mass(&self) -> Option<i64> {
        self.node.i64(fields::MASS)
    }

    /// Theoretical mass, scaled
    pub fn theomass(&self) -> Option<i64> {
        self.node.i64(fields::THEOMASS)
    }

    /// Residue preceding the peptide
    pub fn pepstart(&self) -> Option<&str> {
        self.node.str(fields::PEPSTART)
    }

    /// Residue following the peptide
    pub fn pepstop(&self) -> Option<&str> {
        self.node.str(fields::PEPSTOP)
    }

    /// Protein hits this peptide maps to
    pub fn pep_hits(&self) -> Vec<PepHit> {
        items(&self.node, fields::PEPHITS)
            .into_iter()
            .map(|node| PepHit::new(Arc::clone(node)))
            .collect()
    }

    /// Modifications found on the peptide
    pub fn mods(&self) -> Vec<ModHit> {
        items(&self.node, fields::MODS)
            .into_iter()
            .map(|node| ModHit::new(Arc::clone(node)))
            .collect()
    }

    /// Matched fragment ions
    pub fn mz_hits(&self) -> Vec<MzHit> {
        items(&self.node, fields::MZHITS)
            .into_iter()
            .map(|node| MzHit::new(Arc::clone(node)))
            .collect()
    }
}

/// Link between a matched peptide and one protein
#[derive(Debug, Clone, PartialEq)]
pub struct PepHit {
    node: Arc<Node>,
}

impl PepHit {
    /// Wrap a peptide-protein hit node
    pub fn new(node: Arc<Node>) -> Self {
        Self { node }
    }

    /// Underlying node
    pub fn node(&self) -> &Arc<Node> {
        &self.node
    }

    /// Protein accession
    pub fn accession(&self) -> Option<&str> {
        self.node.str(fields::ACCESSION)
    }

    /// Protein description line
    pub fn defline(&self) -> Option<&str> {
        self.node.str(fields::DEFLINE)
    }

    /// Start of the peptide in the protein (0-based)
    pub fn start(&self) -> Option<i64> {
        self.node.i64(fields::START)
    }

    /// End of the peptide in the protein (0-based, inclusive)
    pub fn stop(&self) -> Option<i64> {
        self.node.i64(fields::STOP)
    }

    /// GenBank identifier
    pub fn gi(&self) -> Option<i64> {
        self.node.i64(fields::GI)
    }

    /// Protein length
    pub fn protlength(&self) -> Option<i64> {
        self.node.i64(fields::PROTLENGTH)
    }

    /// Ordinal of the protein in the BLAST database
    pub fn oid(&self) -> Option<i64> {
        self.node.i64(fields::OID)
    }
}

/// A modification found on a hit
#[derive(Debug, Clone, PartialEq)]
pub struct ModHit {
    node: Arc<Node>,
}

impl ModHit {
    /// Wrap a modification hit node
    pub fn new(node: Arc<Node>) -> Self {
        Self { node }
    }

    /// Position on the peptide (0-based)
    pub fn site(&self) -> Option<i64> {
        self.node.i64(fields::SITE)
    }

    /// Modification number, resolvable through a modification registry
    pub fn modtype(&self) -> Option<i64> {
        enumeration(&self.node, fields::MODTYPE)
    }
}

/// A matched fragment ion
#[derive(Debug, Clone, PartialEq)]
pub struct MzHit {
    node: Arc<Node>,
}

impl MzHit {
    /// Wrap an m/z hit node
    pub fn new(node: Arc<Node>) -> Self {
        Self { node }
    }

    /// Ion series code
    pub fn ion(&self) -> Option<i64> {
        enumeration(&self.node, fields::ION)
    }

    /// Ion charge
    pub fn charge(&self) -> Option<i64> {
        self.node.i64(fields::CHARGE)
    }

    /// Position in the ion series
    pub fn number(&self) -> Option<i64> {
        self.node.i64(fields::NUMBER)
    }

    /// Ion m/z, scaled
    pub fn mz(&self) -> Option<i64> {
        self.node.i64(fields::MZ)
    }
}
