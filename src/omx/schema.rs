//! OMSSA search-result (`.omx`) vocabulary
//!
//! OMX is NCBI serial XML: every member of a record is wrapped in an element
//! named `<Type>_<member>`, sequences put one `<Type>_<member>_E` (or one
//! typed element) per item inside the member wrapper, and enumerations are
//! written as `<Enum value="label">code</Enum>`.
//!
//! The registry below maps that vocabulary onto composites with these
//! conventions:
//!
//! - a record member lands in a slot named after the part of the tag after the
//!   last `_` (`MSHits_evalue` → `evalue`);
//! - a sequence wrapper holds its items in [`fields::ITEMS`];
//! - a wrapper around a single record or enumeration holds it in
//!   [`fields::VALUE`].
//!
//! Elements not listed here (bioseqs, library search settings, score sets
//! and the like) are skipped by the decoder.

use std::sync::OnceLock;

use super::coerce::ScalarKind::{self, Boolean, Float, Integer, String as Text};
use super::registry::{Arity, SchemaRegistry, SchemaRegistryBuilder};

/// Root element of an OMX document
pub const ROOT: &str = "MSSearch";

/// Slot names used by the OMSSA registry
pub mod fields {
    /// Items inside a sequence wrapper
    pub const ITEMS: &str = "items";
    /// Record or enumeration inside a single-value wrapper
    pub const VALUE: &str = "value";

    /// `MSSearch_request`
    pub const REQUEST: &str = "request";
    /// `MSSearch_response`
    pub const RESPONSE: &str = "response";

    /// `MSRequest_spectra`
    pub const SPECTRA: &str = "spectra";
    /// `MSRequest_settings`
    pub const SETTINGS: &str = "settings";
    /// `MSRequest_rid`, `MSResponse_rid`
    pub const RID: &str = "rid";

    /// `MSSpectrum_number`, `MSHitSet_number`, `MSMZHit_number`
    pub const NUMBER: &str = "number";
    /// `MSSpectrum_charge`, `MSHits_charge`, `MSMZHit_charge`
    pub const CHARGE: &str = "charge";
    /// `MSSpectrum_precursormz`
    pub const PRECURSOR_MZ: &str = "precursormz";
    /// `MSSpectrum_mz`, `MSMZHit_mz`
    pub const MZ: &str = "mz";
    /// `MSSpectrum_abundance`
    pub const ABUNDANCE: &str = "abundance";
    /// `MSSpectrum_iscale`
    pub const ISCALE: &str = "iscale";
    /// `MSSpectrum_ids`, `MSHitSet_ids`
    pub const IDS: &str = "ids";
    /// `MSSpectrum_rtstart`
    pub const RT_START: &str = "rtstart";
    /// `MSSpectrum_rtstop`
    pub const RT_STOP: &str = "rtstop";

    /// `MSResponse_hitsets`
    pub const HITSETS: &str = "hitsets";
    /// `MSResponse_scale`
    pub const SCALE: &str = "scale";
    /// `MSResponse_version`
    pub const VERSION: &str = "version";
    /// `MSResponse_dbversion`
    pub const DB_VERSION: &str = "dbversion";
    /// `MSResponse_error`, `MSHitSet_error`
    pub const ERROR: &str = "error";

    /// `MSHitSet_hits`
    pub const HITS: &str = "hits";
    /// `MSHitSet_settingid`
    pub const SETTING_ID: &str = "settingid";

    /// `MSHits_pepstring`
    pub const PEPSTRING: &str = "pepstring";
    /// `MSHits_evalue`
    pub const EVALUE: &str = "evalue";
    /// `MSHits_pvalue`
    pub const PVALUE: &str = "pvalue";
    /// `MSHits_mass`
    pub const MASS: &str = "mass";
    /// `MSHits_theomass`
    pub const THEOMASS: &str = "theomass";
    /// `MSHits_pepstart`
    pub const PEPSTART: &str = "pepstart";
    /// `MSHits_pepstop`
    pub const PEPSTOP: &str = "pepstop";
    /// `MSHits_pephits`
    pub const PEPHITS: &str = "pephits";
    /// `MSHits_mods`
    pub const MODS: &str = "mods";
    /// `MSHits_mzhits`
    pub const MZHITS: &str = "mzhits";

    /// `MSPepHit_accession`
    pub const ACCESSION: &str = "accession";
    /// `MSPepHit_defline`
    pub const DEFLINE: &str = "defline";
    /// `MSPepHit_start`
    pub const START: &str = "start";
    /// `MSPepHit_stop`
    pub const STOP: &str = "stop";
    /// `MSPepHit_gi`
    pub const GI: &str = "gi";
    /// `MSPepHit_protlength`, `MSHits_protlength`
    pub const PROTLENGTH: &str = "protlength";
    /// `MSPepHit_oid`, `MSHits_oid`
    pub const OID: &str = "oid";

    /// `MSModHit_site`
    pub const SITE: &str = "site";
    /// `MSModHit_modtype`
    pub const MODTYPE: &str = "modtype";
    /// `MSMZHit_ion`
    pub const ION: &str = "ion";
}

use fields::{ITEMS, VALUE};

/// The shared OMSSA registry, built on first use
pub fn omssa_registry() -> &'static SchemaRegistry {
    static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();
    REGISTRY.get_or_init(build_omssa_registry)
}

/// Sequence wrapper: `tag` holds repeated scalar `tag_E` items
fn scalar_list(b: SchemaRegistryBuilder, tag: &str, kind: ScalarKind) -> SchemaRegistryBuilder {
    let item = format!("{tag}_E");
    b.sequence(tag, &item, ITEMS, Arity::List).scalar(&item, kind)
}

/// Single-value wrapper: `tag` holds one `inner` element
fn wrapper(b: SchemaRegistryBuilder, tag: &str, inner: &str) -> SchemaRegistryBuilder {
    b.composite(tag, |c| c.slot(inner, VALUE, Arity::Single))
}

/// Enumeration wrapper: `tag` holds one `<enum value="label">code</enum>`
fn enumeration(b: SchemaRegistryBuilder, tag: &str, enum_tag: &str) -> SchemaRegistryBuilder {
    wrapper(b, tag, enum_tag).scalar(enum_tag, Integer)
}

/// Build a fresh OMSSA registry
pub fn build_omssa_registry() -> SchemaRegistry {
    let mut b = SchemaRegistry::builder(ROOT)
        .composite(ROOT, |c| c.members(&["MSSearch_request", "MSSearch_response"]))
        .sequence("MSSearch_request", "MSRequest", ITEMS, Arity::List)
        .sequence("MSSearch_response", "MSResponse", ITEMS, Arity::List);

    // Request side
    b = b
        .composite("MSRequest", |c| {
            c.members(&["MSRequest_spectra", "MSRequest_settings", "MSRequest_rid"])
        })
        .scalar("MSRequest_rid", Text);
    b = wrapper(b, "MSRequest_spectra", "MSSpectrumset");
    b = wrapper(b, "MSRequest_settings", "MSSearchSettings");
    b = b.sequence("MSSpectrumset", "MSSpectrum", ITEMS, Arity::Keyed);

    b = b
        .composite("MSSpectrum", |c| {
            c.members(&[
                "MSSpectrum_number",
                "MSSpectrum_charge",
                "MSSpectrum_precursormz",
                "MSSpectrum_mz",
                "MSSpectrum_abundance",
                "MSSpectrum_iscale",
                "MSSpectrum_ids",
                "MSSpectrum_rtstart",
                "MSSpectrum_rtstop",
            ])
        })
        .scalar("MSSpectrum_number", Integer)
        .scalar("MSSpectrum_precursormz", Integer)
        .scalars(
            &["MSSpectrum_iscale", "MSSpectrum_rtstart", "MSSpectrum_rtstop"],
            Float,
        );
    b = scalar_list(b, "MSSpectrum_charge", Integer);
    b = scalar_list(b, "MSSpectrum_mz", Integer);
    b = scalar_list(b, "MSSpectrum_abundance", Integer);
    b = scalar_list(b, "MSSpectrum_ids", Text);

    b = b
        .composite("MSSearchSettings", |c| {
            c.members(&[
                "MSSearchSettings_precursorsearchtype",
                "MSSearchSettings_productsearchtype",
                "MSSearchSettings_ionstosearch",
                "MSSearchSettings_peptol",
                "MSSearchSettings_msmstol",
                "MSSearchSettings_cutoff",
                "MSSearchSettings_fixed",
                "MSSearchSettings_variable",
                "MSSearchSettings_enzyme",
                "MSSearchSettings_missedcleave",
                "MSSearchSettings_hitlistlen",
                "MSSearchSettings_db",
                "MSSearchSettings_minspectra",
                "MSSearchSettings_scale",
                "MSSearchSettings_maxmods",
                "MSSearchSettings_taxids",
                "MSSearchSettings_settingid",
                "MSSearchSettings_nmethionine",
                "MSSearchSettings_reversesearch",
                "MSSearchSettings_pepppm",
            ])
        })
        .scalars(
            &[
                "MSSearchSettings_peptol",
                "MSSearchSettings_msmstol",
                "MSSearchSettings_cutoff",
            ],
            Float,
        )
        .scalars(
            &[
                "MSSearchSettings_missedcleave",
                "MSSearchSettings_hitlistlen",
                "MSSearchSettings_minspectra",
                "MSSearchSettings_scale",
                "MSSearchSettings_maxmods",
                "MSSearchSettings_settingid",
            ],
            Integer,
        )
        .scalar("MSSearchSettings_db", Text)
        .scalars(
            &[
                "MSSearchSettings_nmethionine",
                "MSSearchSettings_reversesearch",
                "MSSearchSettings_pepppm",
            ],
            Boolean,
        )
        .sequence("MSSearchSettings_ionstosearch", "MSIonType", ITEMS, Arity::List)
        .sequence("MSSearchSettings_fixed", "MSMod", ITEMS, Arity::List)
        .sequence("MSSearchSettings_variable", "MSMod", ITEMS, Arity::List)
        .sequence("MSSearchSettings_enzyme", "MSEnzymes", ITEMS, Arity::List)
        .scalars(&["MSIonType", "MSMod", "MSEnzymes"], Integer);
    b = enumeration(b, "MSSearchSettings_precursorsearchtype", "MSSearchType");
    b = enumeration(b, "MSSearchSettings_productsearchtype", "MSSearchType");
    b = scalar_list(b, "MSSearchSettings_taxids", Integer);

    // Response side
    b = b
        .composite("MSResponse", |c| {
            c.members(&[
                "MSResponse_hitsets",
                "MSResponse_scale",
                "MSResponse_rid",
                "MSResponse_error",
                "MSResponse_version",
                "MSResponse_email",
                "MSResponse_dbversion",
            ])
        })
        .sequence("MSResponse_hitsets", "MSHitSet", ITEMS, Arity::Keyed)
        .scalars(&["MSResponse_scale", "MSResponse_dbversion"], Integer)
        .scalars(
            &["MSResponse_rid", "MSResponse_version", "MSResponse_email"],
            Text,
        );
    b = enumeration(b, "MSResponse_error", "MSResponseError");

    b = b
        .composite("MSHitSet", |c| {
            c.members(&[
                "MSHitSet_number",
                "MSHitSet_error",
                "MSHitSet_hits",
                "MSHitSet_ids",
                "MSHitSet_settingid",
            ])
        })
        .scalars(&["MSHitSet_number", "MSHitSet_settingid"], Integer)
        .sequence("MSHitSet_hits", "MSHits", ITEMS, Arity::List);
    b = enumeration(b, "MSHitSet_error", "MSHitError");
    b = scalar_list(b, "MSHitSet_ids", Text);

    b = b
        .composite("MSHits", |c| {
            c.members(&[
                "MSHits_evalue",
                "MSHits_pvalue",
                "MSHits_charge",
                "MSHits_pephits",
                "MSHits_mzhits",
                "MSHits_pepstring",
                "MSHits_mass",
                "MSHits_mods",
                "MSHits_pepstart",
                "MSHits_pepstop",
                "MSHits_protlength",
                "MSHits_theomass",
                "MSHits_oid",
            ])
        })
        .scalars(&["MSHits_evalue", "MSHits_pvalue"], Float)
        .scalars(
            &[
                "MSHits_charge",
                "MSHits_mass",
                "MSHits_protlength",
                "MSHits_theomass",
                "MSHits_oid",
            ],
            Integer,
        )
        .scalars(
            &["MSHits_pepstring", "MSHits_pepstart", "MSHits_pepstop"],
            Text,
        )
        .sequence("MSHits_pephits", "MSPepHit", ITEMS, Arity::List)
        .sequence("MSHits_mzhits", "MSMZHit", ITEMS, Arity::List)
        .sequence("MSHits_mods", "MSModHit", ITEMS, Arity::List);

    b = b
        .composite("MSPepHit", |c| {
            c.members(&[
                "MSPepHit_start",
                "MSPepHit_stop",
                "MSPepHit_gi",
                "MSPepHit_accession",
                "MSPepHit_defline",
                "MSPepHit_protlength",
                "MSPepHit_oid",
                "MSPepHit_reversed",
                "MSPepHit_pepstart",
                "MSPepHit_pepstop",
            ])
        })
        .scalars(
            &[
                "MSPepHit_start",
                "MSPepHit_stop",
                "MSPepHit_gi",
                "MSPepHit_protlength",
                "MSPepHit_oid",
            ],
            Integer,
        )
        .scalars(
            &[
                "MSPepHit_accession",
                "MSPepHit_defline",
                "MSPepHit_pepstart",
                "MSPepHit_pepstop",
            ],
            Text,
        )
        .scalar("MSPepHit_reversed", Boolean);

    b = b
        .composite("MSModHit", |c| c.members(&["MSModHit_site", "MSModHit_modtype"]))
        .scalar("MSModHit_site", Integer);
    b = wrapper(b, "MSModHit_modtype", "MSMod");

    b = b
        .composite("MSMZHit", |c| {
            c.members(&[
                "MSMZHit_ion",
                "MSMZHit_charge",
                "MSMZHit_number",
                "MSMZHit_mz",
                "MSMZHit_index",
            ])
        })
        .scalars(
            &[
                "MSMZHit_charge",
                "MSMZHit_number",
                "MSMZHit_mz",
                "MSMZHit_index",
            ],
            Integer,
        );
    b = wrapper(b, "MSMZHit_ion", "MSIonType");

    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::omx::registry::ElementDescriptor;

    #[test]
    fn test_registry_is_shared() {
        let a = omssa_registry() as *const SchemaRegistry;
        let b = omssa_registry() as *const SchemaRegistry;
        assert_eq!(a, b);
        assert_eq!(omssa_registry().root(), ROOT);
    }

    #[test]
    fn test_collections() {
        let registry = build_omssa_registry();

        let Some(ElementDescriptor::Composite(set)) = registry.get("MSSpectrumset") else {
            panic!("MSSpectrumset should be a composite");
        };
        assert_eq!(set.slot_for("MSSpectrum").unwrap().arity, Arity::Keyed);

        let Some(ElementDescriptor::Composite(hitsets)) = registry.get("MSResponse_hitsets")
        else {
            panic!("MSResponse_hitsets should be a composite");
        };
        assert_eq!(hitsets.slot_for("MSHitSet").unwrap().arity, Arity::Keyed);

        let Some(ElementDescriptor::Composite(hits)) = registry.get("MSHits") else {
            panic!("MSHits should be a composite");
        };
        assert_eq!(
            hits.slot_for("MSHits_pepstring").unwrap().field,
            fields::PEPSTRING
        );
        assert_eq!(
            registry.get("MSHits_evalue"),
            Some(&ElementDescriptor::Scalar(Float))
        );
        assert!(registry.get("MSBioseq").is_none());
    }
}
