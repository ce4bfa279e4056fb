// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for package resolution and stub serialization.
//!
//! Duplicate export keys have their own error type,
//! [`crate::serialize::ConflictingExportKeys`]: the serialization store
//! raises it and the serializer's conflict policy always resolves it in
//! place, so it never propagates through [`Result`].

use thiserror::Error;

/// Result type for stub generation operations
pub type Result<T> = std::result::Result<T, StubError>;

/// Errors that can occur while resolving or serializing a Meteor package
#[derive(Debug, Error)]
pub enum StubError {
    /// Import path did not match any module file in the package
    #[error("Could not locate module for path: {module_path} in {package_id} ({env})")]
    ModuleNotFound {
        /// Identity of the package that was searched
        package_id: String,
        /// The import path after prefix stripping
        module_path: String,
        /// Diagnostic environment label
        env: String,
    },

    /// Import path pointed under `node_modules/` but no declared nested
    /// package matched it
    #[error("Unable to locate npm package for import path: {import_path} in {package_id} ({env})")]
    NpmPackageNotFound {
        /// Identity of the package whose nested packages were searched
        package_id: String,
        /// The requested import path
        import_path: String,
        /// Diagnostic environment label
        env: String,
    },

    /// Export entry carried a type tag the serializer does not understand
    #[error("Tried to serialize an unsupported export shape in {package_id} ({env})")]
    UnsupportedExportShape {
        /// Identity of the package that owns the entry
        package_id: String,
        /// Module the entry came from
        module_path: String,
        /// Diagnostic environment label
        env: String,
    },

    /// File system error
    #[error("File system error: {0}")]
    Fs(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl StubError {
    /// Create a module not found error
    pub fn module_not_found(
        package_id: impl Into<String>,
        module_path: impl Into<String>,
        env: impl Into<String>,
    ) -> Self {
        Self::ModuleNotFound {
            package_id: package_id.into(),
            module_path: module_path.into(),
            env: env.into(),
        }
    }

    /// Create an npm package not found error
    pub fn npm_package_not_found(
        package_id: impl Into<String>,
        import_path: impl Into<String>,
        env: impl Into<String>,
    ) -> Self {
        Self::NpmPackageNotFound {
            package_id: package_id.into(),
            import_path: import_path.into(),
            env: env.into(),
        }
    }

    /// Create an unsupported export shape error
    pub fn unsupported_export(
        package_id: impl Into<String>,
        module_path: impl Into<String>,
        env: impl Into<String>,
    ) -> Self {
        Self::UnsupportedExportShape {
            package_id: package_id.into(),
            module_path: module_path.into(),
            env: env.into(),
        }
    }
}
