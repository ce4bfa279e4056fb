// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Data contract for parsed Meteor packages.
//!
//! The bundle parser runs upstream (it walks the compiled Meteor package
//! bundles and records every export statement it finds); this module models
//! the structure it emits. Deserialization is deliberately tolerant: unknown
//! export type tags become [`ModuleExport::Unsupported`] instead of failing
//! the whole package, and optional sections default to empty.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

/// Module file path → export entries, in the order the parser recorded them.
pub type ModuleList = BTreeMap<String, Vec<ModuleExport>>;

/// Source package name → keys merged into the package scope.
pub type PackageScopeExports = BTreeMap<String, Vec<String>>;

/// Where a package came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageOrigin {
    /// A Meteor package from the Atmosphere registry (or the core set)
    #[default]
    Atmosphere,
    /// A third-party npm package bundled under `node_modules/`
    Npm,
}

/// One export statement recorded by the bundle parser.
///
/// The `type` tag in the emitted JSON selects the variant. `global-binding`
/// entries describe module-internal bindings and are never serialized into
/// stub output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ModuleExport {
    /// Named export read off the module's runtime namespace
    Export {
        /// Externally visible binding name
        name: String,
    },

    /// Default export of the module
    ExportDefault,

    /// Export forwarded from another module
    ReExport {
        /// Exported name, where `*` denotes a wildcard re-export
        name: String,
        /// Alias the name is exposed under, if any
        #[serde(rename = "as", default, skip_serializing_if = "Option::is_none")]
        alias: Option<String>,
        /// Source module specifier, relative or absolute
        from: String,
    },

    /// Module-internal binding that must not leak into stub output
    GlobalBinding {
        /// Binding name, when the parser could determine one
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },

    /// Entry with a type tag this version does not understand
    #[serde(other)]
    Unsupported,
}

impl ModuleExport {
    /// The externally visible name this entry claims, used for conflict
    /// detection. Wildcard re-exports without an alias claim nothing (their
    /// names are not statically known), global bindings are internal, and
    /// entries whose name is blank claim nothing (they render no line).
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Export { name } => non_blank(name),
            Self::ExportDefault => Some("default"),
            Self::ReExport { name, alias, .. } => match alias.as_deref().and_then(non_blank) {
                Some(alias) => Some(alias),
                None if self.is_wildcard_re_export() => None,
                None => non_blank(name),
            },
            Self::GlobalBinding { .. } | Self::Unsupported => None,
        }
    }

    /// Whether this entry is a wildcard re-export (`export * from '…'`),
    /// aliased or not.
    pub fn is_wildcard_re_export(&self) -> bool {
        matches!(self, Self::ReExport { name, .. } if name.trim() == "*")
    }
}

/// Trimmed name, or `None` when nothing is left. The parser's loose input
/// occasionally carries blank names.
fn non_blank(name: &str) -> Option<&str> {
    let name = name.trim();
    (!name.is_empty()).then_some(name)
}

/// A Meteor package as emitted by the bundle parser.
///
/// Field names follow the parser's camelCase JSON. `name` and `packageId`
/// are required; everything else defaults so that sparse payloads (and the
/// synthesized entries for nested npm packages) stay valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedPackage {
    /// Package name, e.g. `ostrio:cookies` or a plain npm name
    pub name: String,

    /// Import identity, e.g. `meteor/ostrio:cookies`
    pub package_id: String,

    /// Eagerly loaded main module path; empty string means none
    #[serde(default)]
    pub main_module_path: Option<String>,

    /// Every module file in the package with its recorded exports
    #[serde(default)]
    pub modules: ModuleList,

    /// Keys each source package merged into the package scope
    #[serde(default)]
    pub package_scope_exports: PackageScopeExports,

    /// Third-party packages bundled inside this one, by npm name
    #[serde(default)]
    pub node_modules: BTreeMap<String, ParsedPackage>,

    /// Package origin; the parser tags bundled npm packages with `npm`
    #[serde(rename = "type", default)]
    pub origin: PackageOrigin,
}

impl ParsedPackage {
    /// Read a parsed package from a JSON file.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse a parsed-package payload from a JSON string.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// The eager main module path, with the parser's empty-string
    /// placeholder normalized away.
    pub fn eager_main_module_path(&self) -> Option<&str> {
        self.main_module_path.as_deref().filter(|path| !path.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export_tags() {
        let entries: Vec<ModuleExport> = serde_json::from_str(
            r#"[
                { "type": "export", "name": "Cookies" },
                { "type": "export-default" },
                { "type": "re-export", "name": "*", "from": "./cookies" },
                { "type": "re-export", "name": "parse", "as": "parseCookie", "from": "./helpers" },
                { "type": "global-binding", "name": "Meteor" }
            ]"#,
        )
        .unwrap();

        assert_eq!(entries[0], ModuleExport::Export { name: "Cookies".into() });
        assert_eq!(entries[1], ModuleExport::ExportDefault);
        assert!(entries[2].is_wildcard_re_export());
        assert_eq!(
            entries[3],
            ModuleExport::ReExport {
                name: "parse".into(),
                alias: Some("parseCookie".into()),
                from: "./helpers".into(),
            }
        );
        assert_eq!(entries[4], ModuleExport::GlobalBinding { name: Some("Meteor".into()) });
    }

    #[test]
    fn test_unknown_tag_becomes_unsupported() {
        let entry: ModuleExport =
            serde_json::from_str(r#"{ "type": "export-star-from-the-future" }"#).unwrap();
        assert_eq!(entry, ModuleExport::Unsupported);
    }

    #[test]
    fn test_reservation_keys() {
        let named = ModuleExport::Export { name: "Cookies".into() };
        assert_eq!(named.key(), Some("Cookies"));
        assert_eq!(ModuleExport::ExportDefault.key(), Some("default"));

        let wildcard = ModuleExport::ReExport {
            name: "*".into(),
            alias: None,
            from: "./cookies".into(),
        };
        assert_eq!(wildcard.key(), None);

        let aliased_wildcard = ModuleExport::ReExport {
            name: "*".into(),
            alias: Some("ns".into()),
            from: "./cookies".into(),
        };
        assert_eq!(aliased_wildcard.key(), Some("ns"));

        let re_export = ModuleExport::ReExport {
            name: "parse".into(),
            alias: None,
            from: "./helpers".into(),
        };
        assert_eq!(re_export.key(), Some("parse"));

        assert_eq!(ModuleExport::GlobalBinding { name: None }.key(), None);
        assert_eq!(ModuleExport::Unsupported.key(), None);
    }

    #[test]
    fn test_reservation_keys_for_loose_names() {
        let padded = ModuleExport::Export { name: "  Cookies  ".into() };
        assert_eq!(padded.key(), Some("Cookies"));

        let blank = ModuleExport::Export { name: "   ".into() };
        assert_eq!(blank.key(), None);

        // A blank alias falls back to the name.
        let blank_alias = ModuleExport::ReExport {
            name: "parse".into(),
            alias: Some("  ".into()),
            from: "./helpers".into(),
        };
        assert_eq!(blank_alias.key(), Some("parse"));
    }

    #[test]
    fn test_parse_package_defaults() {
        let package = ParsedPackage::parse(
            r#"{
                "name": "empty:package",
                "packageId": "meteor/empty:package",
                "mainModulePath": "",
                "modules": { "index.ts": [] }
            }"#,
        )
        .unwrap();

        assert_eq!(package.name, "empty:package");
        assert_eq!(package.package_id, "meteor/empty:package");
        assert_eq!(package.eager_main_module_path(), None);
        assert!(package.package_scope_exports.is_empty());
        assert!(package.node_modules.is_empty());
        assert_eq!(package.origin, PackageOrigin::Atmosphere);
        assert_eq!(package.modules.get("index.ts"), Some(&Vec::new()));
    }

    #[test]
    fn test_parse_npm_origin() {
        let package = ParsedPackage::parse(
            r#"{
                "name": "react",
                "packageId": "react",
                "type": "npm",
                "mainModulePath": "index.js",
                "modules": { "index.js": [] }
            }"#,
        )
        .unwrap();
        assert_eq!(package.origin, PackageOrigin::Npm);
        assert_eq!(package.eager_main_module_path(), Some("index.js"));
    }
}
