// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Serialization of resolved modules into ES module stub source.
//!
//! The output of a pass is the grouped export body only; see [`template`]
//! for the full stub file that binds the runtime accessors around it.
//!
//! Ordering rules live in [`SerializationStore`]; this module decides what
//! each export entry renders to. Package-scope exports are added before any
//! module export so a module cannot silently shadow a key the package scope
//! already claimed, and duplicate keys are tolerated (first claimant wins)
//! but always reported back to the caller.

mod store;
pub mod template;

pub use store::{ConflictingExportKeys, Placement, SerializationStore};

use tracing::{debug, instrument, warn};

use std::collections::BTreeMap;

use crate::error::{Result, StubError};
use crate::package::paths;
use crate::package::{MeteorPackage, PackageSubmodule};
use crate::parser::ModuleExport;

/// Identifier names injected into generated stub source.
///
/// The defaults match the historical constants (`m2` for the submodule
/// accessor, `m` for package-scope accessors, `g` for the global object);
/// override them if they collide with a package's own export names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubKeys {
    /// Accessor bound to the required submodule namespace
    pub meteor_stub: String,
    /// Prefix for package-scope accessor bindings, suffixed with an index
    pub package_scope: String,
    /// Name bound to the runtime global object
    pub template_global: String,
}

impl Default for StubKeys {
    fn default() -> Self {
        Self {
            meteor_stub: "m2".to_string(),
            package_scope: "m".to_string(),
            template_global: "g".to_string(),
        }
    }
}

/// Outcome of serializing one module.
#[derive(Debug, Clone)]
pub struct SerializedModule {
    /// Grouped export lines, empty for modules without exports
    pub source: String,
    /// Every export name the output claims, sorted
    pub exported_keys: Vec<String>,
    /// Duplicate-key collisions that were tolerated during the pass
    pub suppressed: Vec<SuppressedConflict>,
}

/// A duplicate export key that was dropped instead of raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuppressedConflict {
    /// The contested export name; the first claimant kept it
    pub key: String,
    /// Package that owned the losing entry
    pub package_id: String,
    /// Whether the owning package was on the caller's ignore list
    pub allow_listed: bool,
}

/// Serialize one module of `package` into its stub export body.
#[instrument(skip(package, keys), fields(package_id = %package.package_id()))]
pub(crate) fn serialize_module(
    package: &MeteorPackage,
    import_path: Option<&str>,
    keys: &StubKeys,
) -> Result<SerializedModule> {
    let submodule = package.resolve(import_path)?;
    serialize_resolved(package, submodule.as_ref(), import_path, keys)
}

/// Serialize an already-resolved submodule, so callers that need the
/// submodule for other purposes do not resolve it twice.
pub(crate) fn serialize_resolved(
    package: &MeteorPackage,
    submodule: Option<&PackageSubmodule>,
    import_path: Option<&str>,
    keys: &StubKeys,
) -> Result<SerializedModule> {
    let mut store = SerializationStore::new();
    let mut suppressed = Vec::new();

    // Package-scope exports go in first: the store's reservation order gives
    // them priority over module exports for the same key. They belong to the
    // main-module boundary only, so a nested package's main module does not
    // count.
    let at_main_boundary = submodule.map_or(import_path.is_none(), |module| {
        module.is_main_module && module.package.package_id() == package.package_id()
    });
    if at_main_boundary {
        add_package_scope_exports(package, keys, &mut store, &mut suppressed);
    }

    if let Some(submodule) = submodule {
        // Inside a node_modules sub-path the bundler cannot chase relative
        // wildcard targets, so those are flattened into named lines instead.
        let flatten_wildcards = import_path.is_some_and(|path| path.contains("node_modules"));
        add_module_exports(package, submodule, flatten_wildcards, keys, &mut store, &mut suppressed)?;
    }

    Ok(SerializedModule {
        source: store.serialize(),
        exported_keys: store.exported_keys(),
        suppressed,
    })
}

fn add_package_scope_exports(
    package: &MeteorPackage,
    keys: &StubKeys,
    store: &mut SerializationStore,
    suppressed: &mut Vec<SuppressedConflict>,
) {
    let mut scope_indices: BTreeMap<&str, usize> = BTreeMap::new();
    for export in package.package_scope_exports() {
        let index = match scope_indices.get(export.package_name.as_str()) {
            Some(&index) => index,
            None => {
                // First key from this source package; bind its accessor.
                let index = scope_indices.len();
                scope_indices.insert(export.package_name.as_str(), index);
                store.push(
                    Placement::PackageImport,
                    render_package_scope_import(&export.package_name, index, keys),
                );
                index
            }
        };

        let line = render_package_scope_export(&export.key, index, keys);
        let result = store.add(&export.key, package.package_id(), Placement::PackageExport, line);
        record_conflict(result, package, suppressed);
    }
}

fn add_module_exports(
    package: &MeteorPackage,
    submodule: &PackageSubmodule,
    flatten_wildcards: bool,
    keys: &StubKeys,
    store: &mut SerializationStore,
    suppressed: &mut Vec<SuppressedConflict>,
) -> Result<()> {
    for entry in &submodule.exports {
        if matches!(entry, ModuleExport::Unsupported) {
            return Err(StubError::unsupported_export(
                submodule.package.package_id(),
                &submodule.module_path,
                package.env(),
            ));
        }
        if submodule.is_covered_by_wildcard(entry) {
            continue;
        }
        if flatten_wildcards && entry.is_wildcard_re_export() {
            // Aliased wildcards keep their `export * as ns` line; only the
            // bare form gets flattened.
            if let ModuleExport::ReExport { alias: None, from, .. } = entry {
                flatten_wildcard(package, submodule, from, keys, store, suppressed);
                continue;
            }
        }
        add_entry(entry, package, &submodule.package, keys, store, suppressed);
    }
    Ok(())
}

/// Replace a wildcard re-export with the named exports of its target,
/// resolved within the same package. Failures are logged and skipped so a
/// broken target never aborts the surrounding module.
fn flatten_wildcard(
    package: &MeteorPackage,
    submodule: &PackageSubmodule,
    from: &str,
    keys: &StubKeys,
    store: &mut SerializationStore,
    suppressed: &mut Vec<SuppressedConflict>,
) {
    let target = paths::trim_relative_prefix(from);
    match submodule.package.resolve(Some(target)) {
        Ok(Some(child)) => {
            debug!("Flattening 'export * from {from}' into {}", child.module_path);
            for entry in &child.exports {
                if matches!(entry, ModuleExport::Unsupported) {
                    warn!(
                        "Skipping unsupported export entry while flattening '{}' in {}",
                        from,
                        child.package.package_id()
                    );
                    continue;
                }
                if child.is_covered_by_wildcard(entry) {
                    continue;
                }
                add_entry(entry, package, &child.package, keys, store, suppressed);
            }
        }
        Ok(None) => warn!(
            "Could not flatten wildcard re-export from '{}' in {}: package has no main module",
            from,
            submodule.package.package_id()
        ),
        Err(error) => warn!(
            "Could not flatten wildcard re-export from '{}' in {}: {}",
            from,
            submodule.package.package_id(),
            error
        ),
    }
}

fn add_entry(
    entry: &ModuleExport,
    package: &MeteorPackage,
    owner: &MeteorPackage,
    keys: &StubKeys,
    store: &mut SerializationStore,
    suppressed: &mut Vec<SuppressedConflict>,
) {
    let Some(rendered) = render_export(entry, owner.package_id(), keys) else {
        return;
    };
    match rendered.key {
        Some(key) => {
            let result = store.add(&key, owner.package_id(), rendered.placement, rendered.line);
            record_conflict(result, package, suppressed);
        }
        None => store.push(rendered.placement, rendered.line),
    }
}

/// Apply the duplicate-key policy: allow-listed packages are suppressed
/// silently, everything else is demoted to a warning. Either way the first
/// claimant keeps the key and the collision is reported to the caller.
fn record_conflict(
    result: std::result::Result<(), ConflictingExportKeys>,
    package: &MeteorPackage,
    suppressed: &mut Vec<SuppressedConflict>,
) {
    let Err(conflict) = result else {
        return;
    };
    let allow_listed = package
        .meta()
        .ignore_duplicate_exports_in_packages
        .contains(&conflict.package_id);
    if !allow_listed {
        warn!("{} ({}); keeping '{}'", conflict, package.env(), conflict.existing);
    }
    suppressed.push(SuppressedConflict {
        key: conflict.key,
        package_id: conflict.package_id,
        allow_listed,
    });
}

struct RenderedExport {
    key: Option<String>,
    placement: Placement,
    line: String,
}

/// Render one export entry, or `None` when it contributes no line (global
/// bindings, nameless entries). The reserved name is always
/// [`ModuleExport::key`], so reservation and rendering cannot drift apart.
fn render_export(entry: &ModuleExport, package_id: &str, keys: &StubKeys) -> Option<RenderedExport> {
    let key = entry.key().map(str::to_string);
    match entry {
        ModuleExport::Export { .. } => {
            let Some(name) = key else {
                debug!("Skipping nameless export entry in {package_id}");
                return None;
            };
            Some(RenderedExport {
                line: format!("export const {name} = {stub}.{name};", stub = keys.meteor_stub),
                key: Some(name),
                placement: Placement::ModuleBottom,
            })
        }
        ModuleExport::ExportDefault => Some(RenderedExport {
            key,
            placement: Placement::ModuleBottom,
            line: format!("export default {stub}.default ?? {stub};", stub = keys.meteor_stub),
        }),
        ModuleExport::ReExport { name, from, .. } => {
            let name = name.trim();
            if name.is_empty() {
                debug!("Skipping nameless re-export entry in {package_id}");
                return None;
            }
            let from = paths::rewrite_export_from(from, package_id);
            let line = if entry.is_wildcard_re_export() {
                match &key {
                    None => format!("export * from '{from}';"),
                    Some(alias) => format!("export * as {alias} from '{from}';"),
                }
            } else {
                match &key {
                    Some(alias) if alias != name => {
                        format!("export {{ {name} as {alias} }} from '{from}';")
                    }
                    _ => format!("export {{ {name} }} from '{from}';"),
                }
            };
            Some(RenderedExport { key, placement: Placement::ModuleTop, line })
        }
        ModuleExport::GlobalBinding { .. } | ModuleExport::Unsupported => None,
    }
}

fn render_package_scope_import(package_name: &str, index: usize, keys: &StubKeys) -> String {
    format!(
        "const {scope}{index} = {global}.Package['{package_name}'];",
        scope = keys.package_scope,
        global = keys.template_global
    )
}

fn render_package_scope_export(key: &str, index: usize, keys: &StubKeys) -> String {
    format!("export const {key} = {scope}{index}.{key};", scope = keys.package_scope)
}
