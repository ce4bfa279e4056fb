// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Conflict-aware collection of rendered export lines.
//!
//! A store lives for exactly one serialization pass. Every line that claims
//! an externally visible name must reserve it first; the first claimant
//! wins and later claimants get a [`ConflictingExportKeys`] error so the
//! caller can decide whether the collision is tolerable. Lines are grouped
//! into four buckets whose concatenation order is fixed, which is what
//! gives package-scope exports priority over module exports without any
//! reordering of the caller's input.

use std::collections::BTreeMap;
use thiserror::Error;

/// Raised when an export line tries to reserve a name that is already
/// taken within the same serialization pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Duplicate export key '{key}' in {package_id}: '{incoming}' collides with '{existing}'")]
pub struct ConflictingExportKeys {
    /// The contested export name
    pub key: String,
    /// Package that owns the rejected entry
    pub package_id: String,
    /// Rendered line that holds the reservation
    pub existing: String,
    /// Rendered line that was rejected
    pub incoming: String,
}

/// Which output section a rendered line belongs to.
///
/// Serialization order is fixed: package imports, module top, package
/// exports, module bottom. Re-exports go to the top of the module section
/// so they precede any binding that might depend on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Package-scope accessor bindings (`const m0 = g.Package['…']`)
    PackageImport,
    /// Module-scope lines that must come first (re-exports)
    ModuleTop,
    /// Package-scope export lines
    PackageExport,
    /// Remaining module-scope export lines
    ModuleBottom,
}

/// Ordered, conflict-checked buckets of rendered export lines.
#[derive(Debug, Default)]
pub struct SerializationStore {
    reserved: BTreeMap<String, String>,
    package_imports: Vec<String>,
    module_top: Vec<String>,
    package_exports: Vec<String>,
    module_bottom: Vec<String>,
}

impl SerializationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line that claims no export name, e.g. a wildcard re-export
    /// or a package-scope accessor binding.
    pub fn push(&mut self, placement: Placement, line: impl Into<String>) {
        self.bucket(placement).push(line.into());
    }

    /// Reserve `key` for the package that owns the entry and append the
    /// line on success. The first claimant of a key wins; later claims fail
    /// without modifying the store.
    pub fn add(
        &mut self,
        key: &str,
        owner_id: &str,
        placement: Placement,
        line: impl Into<String>,
    ) -> Result<(), ConflictingExportKeys> {
        let line = line.into();
        if let Some(existing) = self.reserved.get(key) {
            return Err(ConflictingExportKeys {
                key: key.to_string(),
                package_id: owner_id.to_string(),
                existing: existing.clone(),
                incoming: line,
            });
        }
        self.reserved.insert(key.to_string(), line.clone());
        self.bucket(placement).push(line);
        Ok(())
    }

    /// Whether a name is already reserved.
    pub fn is_reserved(&self, key: &str) -> bool {
        self.reserved.contains_key(key)
    }

    /// Every reserved export name, in sorted order.
    pub fn exported_keys(&self) -> Vec<String> {
        self.reserved.keys().cloned().collect()
    }

    /// Whether no lines were collected at all.
    pub fn is_empty(&self) -> bool {
        self.package_imports.is_empty()
            && self.module_top.is_empty()
            && self.package_exports.is_empty()
            && self.module_bottom.is_empty()
    }

    /// Concatenate all buckets in their fixed order.
    pub fn serialize(&self) -> String {
        self.package_imports
            .iter()
            .chain(self.module_top.iter())
            .chain(self.package_exports.iter())
            .chain(self.module_bottom.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn bucket(&mut self, placement: Placement) -> &mut Vec<String> {
        match placement {
            Placement::PackageImport => &mut self.package_imports,
            Placement::ModuleTop => &mut self.module_top,
            Placement::PackageExport => &mut self.package_exports,
            Placement::ModuleBottom => &mut self.module_bottom,
        }
    }
}
