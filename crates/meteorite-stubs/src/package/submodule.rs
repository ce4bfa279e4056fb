// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! A single module file resolved within a Meteor package.

use crate::package::paths;
use crate::package::MeteorPackage;
use crate::parser::ModuleExport;

/// One module file of a package together with its recorded exports.
///
/// Submodules are constructed on demand by resolution and own everything
/// they refer to, including a fresh handle on the owning package, so they
/// can outlive the resolution call that produced them.
#[derive(Debug, Clone)]
pub struct PackageSubmodule {
    /// Path of the module file within the package
    pub module_path: String,
    /// Export entries in the order the parser recorded them
    pub exports: Vec<ModuleExport>,
    /// The package this module belongs to
    pub package: MeteorPackage,
    /// Whether this module is the package's designated main module
    pub is_main_module: bool,
}

impl PackageSubmodule {
    /// Fully qualified import path for this module,
    /// e.g. `meteor/ostrio:cookies/cookies.js`.
    pub fn full_import_path(&self) -> String {
        if self.module_path.is_empty() {
            return self.package.package_id().to_string();
        }
        format!("{}/{}", self.package.package_id(), self.module_path.trim_start_matches('/'))
    }

    /// Whether a non-wildcard re-export entry is already covered by a
    /// wildcard re-export on this submodule pointing at the same source
    /// module. Covered entries emit no line of their own: the wildcard
    /// already exposes the name. Aliased entries are never covered, since a
    /// wildcard cannot expose an alias.
    pub fn is_covered_by_wildcard(&self, entry: &ModuleExport) -> bool {
        if entry.is_wildcard_re_export() {
            return false;
        }
        let ModuleExport::ReExport { alias: None, from, .. } = entry else {
            return false;
        };

        self.exports.iter().any(|sibling| match sibling {
            ModuleExport::ReExport { alias: None, from: sibling_from, .. } => {
                sibling.is_wildcard_re_export()
                    && paths::is_same_module_path(
                        paths::trim_relative_prefix(from),
                        paths::trim_relative_prefix(sibling_from),
                        false,
                    )
            }
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::PackageMeta;
    use crate::parser::ParsedPackage;

    fn module(exports: Vec<ModuleExport>) -> PackageSubmodule {
        let parsed = ParsedPackage {
            name: "test:modules".into(),
            package_id: "meteor/test:modules".into(),
            main_module_path: Some("index.ts".into()),
            modules: [("index.ts".into(), exports.clone())].into(),
            package_scope_exports: Default::default(),
            node_modules: Default::default(),
            origin: Default::default(),
        };
        PackageSubmodule {
            module_path: "index.ts".into(),
            exports,
            package: MeteorPackage::new(parsed, PackageMeta::default()),
            is_main_module: true,
        }
    }

    fn wildcard(from: &str) -> ModuleExport {
        ModuleExport::ReExport { name: "*".into(), alias: None, from: from.into() }
    }

    fn named(name: &str, from: &str) -> ModuleExport {
        ModuleExport::ReExport { name: name.into(), alias: None, from: from.into() }
    }

    #[test]
    fn test_covered_by_sibling_wildcard() {
        let entry = named("ReExportFromRelative", "./relative");
        let submodule = module(vec![wildcard("./relative"), entry.clone()]);
        assert!(submodule.is_covered_by_wildcard(&entry));
    }

    #[test]
    fn test_extension_difference_still_covers() {
        let entry = named("helper", "./relative");
        let submodule = module(vec![wildcard("./relative.js"), entry.clone()]);
        assert!(submodule.is_covered_by_wildcard(&entry));
    }

    #[test]
    fn test_not_covered_without_wildcard() {
        let entry = named("ReExportFromRelative", "./relative");
        let submodule = module(vec![entry.clone()]);
        assert!(!submodule.is_covered_by_wildcard(&entry));
    }

    #[test]
    fn test_different_target_does_not_cover() {
        let entry = named("helper", "./helpers");
        let submodule = module(vec![wildcard("./relative"), entry.clone()]);
        assert!(!submodule.is_covered_by_wildcard(&entry));
    }

    #[test]
    fn test_aliased_entry_is_never_covered() {
        let entry = ModuleExport::ReExport {
            name: "helper".into(),
            alias: Some("renamedHelper".into()),
            from: "./relative".into(),
        };
        let submodule = module(vec![wildcard("./relative"), entry.clone()]);
        assert!(!submodule.is_covered_by_wildcard(&entry));
    }

    #[test]
    fn test_wildcard_itself_is_not_covered() {
        let entry = wildcard("./relative");
        let submodule = module(vec![entry.clone(), named("helper", "./relative")]);
        assert!(!submodule.is_covered_by_wildcard(&entry));
    }

    #[test]
    fn test_full_import_path() {
        let submodule = module(vec![]);
        assert_eq!(submodule.full_import_path(), "meteor/test:modules/index.ts");
    }
}
