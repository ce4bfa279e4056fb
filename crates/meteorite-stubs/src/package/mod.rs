// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Conflict-free module view over a parsed Meteor package.
//!
//! [`MeteorPackage`] wraps the parser's output and answers the two questions
//! the bundler integration asks: which module file does an import path refer
//! to ([`MeteorPackage::resolve`]), and what ES module source re-exposes that
//! module's exports ([`MeteorPackage::serialize`]). A package is immutable
//! after construction and all operations take `&self`, so concurrent callers
//! need no locking.

pub(crate) mod paths;
mod submodule;

pub use paths::is_same_module_path;
pub use submodule::PackageSubmodule;

use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::error::{Result, StubError};
use crate::parser::{ModuleList, PackageOrigin, PackageScopeExports, ParsedPackage};
use crate::serialize::{self, StubKeys};

/// Marker for import paths that point at bundled third-party packages.
const NODE_MODULES_PREFIX: &str = "/node_modules/";

/// Caller-supplied settings that travel with a package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageMeta {
    /// Package ids whose duplicate export keys are tolerated without a
    /// warning (some packages re-export the same name on purpose)
    pub ignore_duplicate_exports_in_packages: Vec<String>,
    /// Main module path for lazily loaded packages, which omit it from
    /// their parsed form
    pub lazy_main_module_path: Option<String>,
    /// Environment label shown in diagnostics, e.g. `client` or `server`
    pub vite_env: Option<String>,
}

impl PackageMeta {
    /// The diagnostic environment label, `common` when none was set.
    pub fn env(&self) -> &str {
        self.vite_env.as_deref().unwrap_or("common")
    }
}

/// One key a source package merges into the package scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageExport {
    /// Name of the package the key comes from
    pub package_name: String,
    /// The exported key itself
    pub key: String,
}

/// A parsed Meteor package with resolution and serialization on top.
#[derive(Debug, Clone)]
pub struct MeteorPackage {
    parsed: ParsedPackage,
    meta: PackageMeta,
    package_scope_exports: Vec<PackageExport>,
}

impl MeteorPackage {
    /// Wrap a parsed package, flattening its package-scope export map into
    /// ordered `(package, key)` pairs.
    pub fn new(parsed: ParsedPackage, meta: PackageMeta) -> Self {
        let package_scope_exports = parsed
            .package_scope_exports
            .iter()
            .flat_map(|(package_name, keys)| {
                keys.iter().map(|key| PackageExport {
                    package_name: package_name.clone(),
                    key: key.clone(),
                })
            })
            .collect();

        Self { parsed, meta, package_scope_exports }
    }

    /// Parse a package from the bundle parser's JSON output.
    pub fn parse_str(content: &str, meta: PackageMeta) -> Result<Self> {
        Ok(Self::new(ParsedPackage::parse(content)?, meta))
    }

    /// Read a package from a JSON file emitted by the bundle parser.
    pub fn read<P: AsRef<Path>>(path: P, meta: PackageMeta) -> Result<Self> {
        Ok(Self::new(ParsedPackage::read(path)?, meta))
    }

    /// Package name, e.g. `ostrio:cookies`.
    pub fn name(&self) -> &str {
        &self.parsed.name
    }

    /// Import identity, e.g. `meteor/ostrio:cookies`.
    pub fn package_id(&self) -> &str {
        &self.parsed.package_id
    }

    /// Where the package came from.
    pub fn origin(&self) -> PackageOrigin {
        self.parsed.origin
    }

    /// Module files and their recorded exports.
    pub fn modules(&self) -> &ModuleList {
        &self.parsed.modules
    }

    /// Settings this package was constructed with.
    pub fn meta(&self) -> &PackageMeta {
        &self.meta
    }

    /// Package-scope exports as ordered `(package, key)` pairs.
    pub fn package_scope_exports(&self) -> &[PackageExport] {
        &self.package_scope_exports
    }

    pub(crate) fn env(&self) -> &str {
        self.meta.env()
    }

    /// The effective main module path: the eager one when present, the lazy
    /// override otherwise. Packages without a main module return `None`.
    pub fn main_module_path(&self) -> Option<&str> {
        self.parsed
            .eager_main_module_path()
            .or_else(|| self.meta.lazy_main_module_path.as_deref().filter(|path| !path.is_empty()))
    }

    /// Resolve the package's main module, if it declares one.
    ///
    /// Fails with [`StubError::ModuleNotFound`] when a main module path is
    /// declared but matches no module file.
    pub fn main_module(&self) -> Result<Option<PackageSubmodule>> {
        let Some(main_path) = self.main_module_path() else {
            return Ok(None);
        };

        // npm packages list their entry file key verbatim, so skip the
        // path-equality walk entirely.
        if self.parsed.origin == PackageOrigin::Npm {
            if let Some(exports) = self.parsed.modules.get(main_path) {
                return Ok(Some(PackageSubmodule {
                    module_path: main_path.to_string(),
                    exports: exports.clone(),
                    package: self.clone(),
                    is_main_module: true,
                }));
            }
        }

        self.resolve_module(main_path)
    }

    /// Resolve an import path to a module of this package, or the main
    /// module when no path is given.
    ///
    /// Returns `Ok(None)` only for packages without a main module when none
    /// was requested explicitly; a path that matches nothing is an error,
    /// [`StubError::NpmPackageNotFound`] when it pointed under
    /// `node_modules/` and [`StubError::ModuleNotFound`] otherwise.
    pub fn resolve(&self, import_path: Option<&str>) -> Result<Option<PackageSubmodule>> {
        match import_path {
            Some(path) => self.resolve_module(path),
            None => self.main_module(),
        }
    }

    /// Serialize a module of this package (or its main module) into ES
    /// module source proxying the legacy runtime exports.
    pub fn serialize(&self, import_path: Option<&str>, keys: &StubKeys) -> Result<serialize::SerializedModule> {
        serialize::serialize_module(self, import_path, keys)
    }

    /// Diagnostic snapshot of the package, including a sample of the main
    /// module's serialized output.
    pub fn snapshot(&self, keys: &StubKeys) -> Result<PackageSnapshot> {
        let serialized = self.serialize(None, keys)?;
        Ok(PackageSnapshot {
            name: self.parsed.name.clone(),
            modules: self.parsed.modules.clone(),
            package_scope_exports: self.package_scope_exports.clone(),
            package_id: self.parsed.package_id.clone(),
            main_module_path: self.parsed.main_module_path.clone(),
            serialized: SnapshotSerialized { main_module: serialized.source },
        })
    }

    fn resolve_module(&self, import_path: &str) -> Result<Option<PackageSubmodule>> {
        let module_path = paths::strip_package_prefix(import_path, &self.parsed.package_id);
        if module_path.is_empty() {
            return self.main_module();
        }

        let matched = self
            .parsed
            .modules
            .iter()
            .find(|(key, _)| paths::is_same_module_path(&module_path, key, false));
        if let Some((key, exports)) = matched {
            let is_main = self
                .main_module_path()
                .is_some_and(|main| paths::is_same_module_path(main, key, false));
            return Ok(Some(PackageSubmodule {
                module_path: key.clone(),
                exports: exports.clone(),
                package: self.clone(),
                is_main_module: is_main,
            }));
        }

        // No direct hit. Anything still under node_modules/ refers to a
        // bundled third-party package; everything else is simply missing.
        let Some(remaining) = module_path.strip_prefix(NODE_MODULES_PREFIX) else {
            return Err(StubError::module_not_found(
                &self.parsed.package_id,
                &module_path,
                self.env(),
            ));
        };
        self.resolve_nested(&module_path, remaining)
    }

    /// Descend into a bundled npm package. `remaining` is the import path
    /// with the `/node_modules/` marker stripped, e.g. `react/index.js` or
    /// `@scope/pkg/lib/index.js`.
    fn resolve_nested(&self, module_path: &str, remaining: &str) -> Result<Option<PackageSubmodule>> {
        let matched = self
            .parsed
            .node_modules
            .iter()
            .find(|(name, _)| remaining == name.as_str() || remaining.starts_with(&format!("{name}/")));
        let Some((name, nested)) = matched else {
            return Err(StubError::npm_package_not_found(
                &self.parsed.package_id,
                module_path,
                self.env(),
            ));
        };

        debug!("Resolving '{}' through nested npm package '{}'", module_path, name);

        // Fresh instance per lookup; nested packages never contribute
        // package-scope exports.
        let mut parsed = nested.clone();
        parsed.package_scope_exports = PackageScopeExports::new();
        let nested_package = MeteorPackage::new(parsed, PackageMeta::default());

        let child_path = remaining
            .strip_prefix(name.as_str())
            .unwrap_or_default()
            .trim_start_matches('/');
        nested_package.resolve(Some(child_path).filter(|path| !path.is_empty()))
    }
}

/// JSON-friendly snapshot of a package for fixtures and debugging.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSnapshot {
    /// Package name
    pub name: String,
    /// Module files and their recorded exports
    pub modules: ModuleList,
    /// Flattened package-scope export pairs
    pub package_scope_exports: Vec<PackageExport>,
    /// Import identity
    pub package_id: String,
    /// Main module path exactly as parsed
    pub main_module_path: Option<String>,
    /// Sample serialized output
    pub serialized: SnapshotSerialized,
}

/// Serialized samples included in a [`PackageSnapshot`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSerialized {
    /// Stub source for the package's main module
    pub main_module: String,
}
