//! # Modification definitions
//!
//! OMSSA ships its modification table as `mods.xml`, and users add their own
//! in `usermods.xml`. Both are a flat `MSModSpecSet` of `MSModSpec` records:
//!
//! ```text
//! MSModSpecSet
//! └── MSModSpec*
//!     ├── MSModSpec_mod       <MSMod value="oxym">1</MSMod>
//!     ├── MSModSpec_type      <MSModType value="modaa">0</MSModType>
//!     ├── MSModSpec_name
//!     ├── MSModSpec_monomass  (optional)
//!     ├── MSModSpec_averagemass, MSModSpec_n15mass (optional)
//!     ├── MSModSpec_residues  <MSModSpec_residues_E>M</MSModSpec_residues_E>*
//!     └── MSModSpec_unimod, MSModSpec_psi-ms (optional)
//! ```
//!
//! The loader reads those records into a [`ModificationRegistry`] keyed by
//! modification number. Files are loaded in order and later entries replace
//! earlier ones with the same number. The registry is independent of the
//! decoded search result; [`ModHit::modtype`](crate::omx::model::ModHit::modtype)
//! numbers are looked up here.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::omx::coerce::{to_float, to_integer};
use crate::omx::events::VALUE_ATTRIBUTE;
use crate::omx::{DecodeError, OmxEvent, XmlEventSource};

pub use error::ModificationFileError;

mod error;


/// Root element of a modification file
pub const MOD_SPEC_SET: &str = "MSModSpecSet";

/// Kind of modification, as written in `MSModSpec_type`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModType {
    /// Numeric code (0 = `modaa`, 1 = `modn`, ...)
    pub code: Option<i64>,
    /// Symbolic label from the `value` attribute
    pub label: Option<String>,
}

/// One modification definition
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModificationDescriptor {
    /// Modification number, as referenced by search results
    pub number: i64,
    /// Symbolic label of the number (e.g. `oxym`)
    pub label: Option<String>,
    /// Human-readable name
    pub name: String,
    /// Monoisotopic mass shift
    pub mono_mass: Option<f64>,
    /// Average mass shift
    pub average_mass: Option<f64>,
    /// N15 mass shift
    pub n15_mass: Option<f64>,
    /// Residues the modification applies to
    pub residues: Vec<String>,
    /// Modification type
    pub mod_type: ModType,
    /// Unimod accession
    pub unimod: Option<i64>,
    /// PSI-MS name
    pub psi_ms_name: Option<String>,
}

/// Outcome of loading several modification files
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Files that loaded, with their entry counts
    pub loaded: Vec<(PathBuf, usize)>,
    /// Files that failed, in load order
    pub failed: Vec<ModificationFileError>,
}

impl LoadReport {
    /// Whether every file loaded
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Modification number → descriptor
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModificationRegistry {
    mods: BTreeMap<i64, ModificationDescriptor>,
}

impl ModificationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the base file and then the user file, skipping any that is `None`
    ///
    /// A file that fails to load is logged and recorded in the report; the
    /// other file is still loaded.
    pub fn load(base: Option<&Path>, user: Option<&Path>) -> (Self, LoadReport) {
        let mut registry = Self::new();
        let mut report = LoadReport::default();

        for path in [base, user].into_iter().flatten() {
            match registry.load_file(path) {
                Ok(count) => report.loaded.push((path.to_path_buf(), count)),
                Err(e) => {
                    log::warn!("{e}");
                    report.failed.push(e);
                }
            }
        }

        (registry, report)
    }

    /// Load one file into this registry, returning how many entries it held
    ///
    /// Nothing is inserted unless the whole file parses.
    pub fn load_file(&mut self, path: &Path) -> Result<usize, ModificationFileError> {
        let wrap = |source| ModificationFileError {
            path: path.to_path_buf(),
            source,
        };
        let events = XmlEventSource::from_path(path).map_err(wrap)?;
        let specs = parse_mod_specs(events).map_err(wrap)?;

        let count = specs.len();
        self.extend(specs);
        log::info!("loaded {} modifications from {}", count, path.display());
        Ok(count)
    }

    /// Parse a modification document from a BufRead source and add its entries
    pub fn load_reader<R: BufRead>(&mut self, reader: R) -> Result<usize, DecodeError> {
        let specs = parse_mod_specs(XmlEventSource::new(reader))?;
        let count = specs.len();
        self.extend(specs);
        Ok(count)
    }

    /// Add descriptors, replacing any with the same number
    pub fn extend(&mut self, descriptors: impl IntoIterator<Item = ModificationDescriptor>) {
        for descriptor in descriptors {
            if let Some(previous) = self.mods.insert(descriptor.number, descriptor) {
                log::debug!(
                    "modification {} ({}) replaced",
                    previous.number,
                    previous.name
                );
            }
        }
    }

    /// Descriptor for modification `number`
    pub fn get(&self, number: i64) -> Option<&ModificationDescriptor> {
        self.mods.get(&number)
    }

    /// First descriptor whose name is `name`
    pub fn by_name(&self, name: &str) -> Option<&ModificationDescriptor> {
        self.mods.values().find(|m| m.name == name)
    }

    /// Descriptors in number order
    pub fn iter(&self) -> impl Iterator<Item = &ModificationDescriptor> {
        self.mods.values()
    }

    /// Number of modifications
    pub fn len(&self) -> usize {
        self.mods.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }
}

/// Parse an `MSModSpecSet` event stream into descriptors, in document order
pub fn parse_mod_specs<I>(events: I) -> Result<Vec<ModificationDescriptor>, DecodeError>
where
    I: IntoIterator<Item = Result<OmxEvent, DecodeError>>,
{
    let mut specs = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut current: Option<SpecBuilder> = None;
    let mut text = String::new();

    for event in events {
        match event? {
            OmxEvent::Open { name, attribute } => {
                if path.is_empty() && name != MOD_SPEC_SET {
                    return Err(DecodeError::malformed(format!(
                        "unexpected root element <{name}>, expected <{MOD_SPEC_SET}>"
                    )));
                }
                if name == "MSModSpec" {
                    current = Some(SpecBuilder::default());
                }
                text.clear();
                let label = attribute.filter(|(key, _)| key == VALUE_ATTRIBUTE);
                if let (Some(spec), Some((_, label))) = (current.as_mut(), label) {
                    match name.as_str() {
                        "MSMod" => spec.descriptor.label = Some(label),
                        "MSModType" => spec.descriptor.mod_type.label = Some(label),
                        _ => {}
                    }
                }
                path.push(name);
            }
            OmxEvent::Text(chunk) => text.push_str(&chunk),
            OmxEvent::Close(name) => {
                match path.pop() {
                    Some(open) if open == name => {}
                    Some(open) => {
                        return Err(DecodeError::malformed(format!(
                            "closing </{name}> does not match open <{open}>"
                        )))
                    }
                    None => {
                        return Err(DecodeError::malformed(format!(
                            "closing </{name}> without an open element"
                        )))
                    }
                }
                let content = text.trim();
                if let (Some(spec), false) = (current.as_mut(), content.is_empty()) {
                    spec.text(&name, content)?;
                }
                text.clear();
                if name == "MSModSpec" {
                    if let Some(spec) = current.take() {
                        specs.push(spec.finish(specs.len())?);
                    }
                }
            }
        }
    }

    if !path.is_empty() {
        return Err(DecodeError::malformed(format!(
            "unexpected end of modification file inside <{}>",
            path.join(" > ")
        )));
    }
    Ok(specs)
}

#[derive(Debug, Default)]
struct SpecBuilder {
    number: Option<i64>,
    descriptor: ModificationDescriptor,
}

impl SpecBuilder {
    fn text(&mut self, tag: &str, text: &str) -> Result<(), DecodeError> {
        let integer = |text: &str| to_integer(text).map_err(|e| DecodeError::invalid_value(tag, e));
        let float = |text: &str| to_float(text).map_err(|e| DecodeError::invalid_value(tag, e));

        let d = &mut self.descriptor;
        match tag {
            "MSMod" => self.number = Some(integer(text)?),
            "MSModType" => d.mod_type.code = Some(integer(text)?),
            "MSModSpec_name" => d.name.push_str(text),
            "MSModSpec_monomass" => d.mono_mass = Some(float(text)?),
            "MSModSpec_averagemass" => d.average_mass = Some(float(text)?),
            "MSModSpec_n15mass" => d.n15_mass = Some(float(text)?),
            "MSModSpec_residues_E" => d.residues.push(text.to_string()),
            "MSModSpec_unimod" => d.unimod = Some(integer(text)?),
            "MSModSpec_psi-ms" => d.psi_ms_name = Some(text.to_string()),
            _ => {}
        }
        Ok(())
    }

    fn finish(self, position: usize) -> Result<ModificationDescriptor, DecodeError> {
        let number = self.number.ok_or_else(|| {
            DecodeError::malformed(format!("MSModSpec #{position} has no MSModSpec_mod number"))
        })?;
        Ok(ModificationDescriptor {
            number,
            ..self.descriptor
        })
    }
}
