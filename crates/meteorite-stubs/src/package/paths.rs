// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module path comparison and rewriting helpers.
//!
//! Import paths arrive in several spellings for the same file: with or
//! without a leading slash, with or without a file extension, prefixed with
//! `/node_modules/<packageId>/` or already package-relative. The helpers
//! here normalize those differences without touching the file system.

use std::path::Path;

/// Compare two module paths for equality.
///
/// Leading slashes are ignored on both sides. The directory portion must
/// match exactly and so must the file stem; the extension is only compared
/// when `compare_extensions` is set, so `/client/index.ts` and
/// `client/index` refer to the same module for lookups.
pub fn is_same_module_path(file_path_a: &str, file_path_b: &str, compare_extensions: bool) -> bool {
    let a = Path::new(file_path_a.trim_start_matches('/'));
    let b = Path::new(file_path_b.trim_start_matches('/'));

    if a.parent() != b.parent() {
        return false;
    }
    if compare_extensions && a.extension() != b.extension() {
        return false;
    }
    a.file_stem() == b.file_stem()
}

/// Strip this package's `/node_modules/<packageId>/` marker from an import
/// path, leaving the package-relative module path. Paths without the marker
/// pass through unchanged.
pub(crate) fn strip_package_prefix(import_path: &str, package_id: &str) -> String {
    import_path.replacen(&format!("/node_modules/{package_id}/"), "", 1)
}

/// Rewrite a re-export source specifier for stub output. Relative paths are
/// qualified with the owning package id so the bundler can route them back
/// through stub resolution; absolute and bare specifiers pass through.
pub(crate) fn rewrite_export_from(from: &str, package_id: &str) -> String {
    if from.starts_with('.') {
        format!("{package_id}/{}", from.trim_start_matches(['.', '/']))
    } else {
        from.to_string()
    }
}

/// Strip the `./` shorthand so relative specifiers can be compared with
/// module map keys.
pub(crate) fn trim_relative_prefix(from: &str) -> &str {
    from.strip_prefix("./").unwrap_or(from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_path_ignoring_extensions() {
        assert!(is_same_module_path("/a/b/c.ts", "a/b/c", false));
        assert!(is_same_module_path("index.ts", "/index.js", false));
        assert!(is_same_module_path("client/index.ts", "client/index.mjs", false));
    }

    #[test]
    fn test_same_path_comparing_extensions() {
        assert!(!is_same_module_path("/a/b/c.ts", "/a/b/c.js", true));
        assert!(is_same_module_path("/a/b/c.ts", "a/b/c.ts", true));
        assert!(!is_same_module_path("/a/b/c.ts", "a/b/c", true));
    }

    #[test]
    fn test_directory_must_match() {
        assert!(!is_same_module_path("lib/index.js", "index.js", false));
        assert!(!is_same_module_path("client/cookies.js", "server/cookies.js", false));
    }

    #[test]
    fn test_stem_must_match() {
        assert!(!is_same_module_path("client/index.js", "client/cookies.js", false));
    }

    #[test]
    fn test_strip_package_prefix() {
        assert_eq!(
            strip_package_prefix(
                "/node_modules/meteor/ostrio:cookies/cookies.js",
                "meteor/ostrio:cookies"
            ),
            "cookies.js"
        );
        assert_eq!(
            strip_package_prefix("/node_modules/react/index.js", "meteor/ostrio:cookies"),
            "/node_modules/react/index.js"
        );
        assert_eq!(strip_package_prefix("cookies.js", "meteor/ostrio:cookies"), "cookies.js");
    }

    #[test]
    fn test_rewrite_export_from() {
        assert_eq!(
            rewrite_export_from("./cookies", "meteor/ostrio:cookies"),
            "meteor/ostrio:cookies/cookies"
        );
        assert_eq!(
            rewrite_export_from("../shared/util.js", "meteor/ostrio:cookies"),
            "meteor/ostrio:cookies/shared/util.js"
        );
        assert_eq!(rewrite_export_from("react", "meteor/ostrio:cookies"), "react");
        assert_eq!(rewrite_export_from("/abs/path.js", "meteor/ostrio:cookies"), "/abs/path.js");
    }

    #[test]
    fn test_trim_relative_prefix() {
        assert_eq!(trim_relative_prefix("./cjs/react.js"), "cjs/react.js");
        assert_eq!(trim_relative_prefix("cjs/react.js"), "cjs/react.js");
    }
}
