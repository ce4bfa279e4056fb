// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # meteorite-stubs
//!
//! Reconstructs an ES-module view of a legacy Meteor package tree and emits
//! synthetic module source that proxies every export back to the Meteor
//! runtime at the correct access path.
//!
//! The bundle parser (external to this crate) turns a package's build
//! artifact into a [`ParsedPackage`]. This crate provides the rest:
//!
//! - Import-path resolution over the package's module tree, including
//!   descent into nested third-party packages bundled under `node_modules/`
//! - Conflict-aware serialization of a module's exports (plus any
//!   package-scope exports) into grouped ES export statements
//! - The full stub-file template that binds the runtime accessors the
//!   generated exports read from
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use meteorite_stubs::{MeteorPackage, PackageMeta, StubKeys};
//!
//! fn main() -> meteorite_stubs::Result<()> {
//!     let package = MeteorPackage::read("parsed/ostrio_cookies.json", PackageMeta::default())?;
//!     let serialized = package.serialize(Some("cookies.js"), &StubKeys::default())?;
//!     println!("{}", serialized.source);
//!     Ok(())
//! }
//! ```
//!
//! All types are immutable after construction and every operation takes
//! `&self`, so a single [`MeteorPackage`] can serve concurrent bundler
//! requests without locking.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod package;
pub mod parser;
pub mod serialize;

// Re-exports
pub use error::{Result, StubError};
pub use package::{
    is_same_module_path, MeteorPackage, PackageExport, PackageMeta, PackageSnapshot,
    PackageSubmodule,
};
pub use parser::{ModuleExport, ModuleList, PackageOrigin, PackageScopeExports, ParsedPackage};
pub use serialize::template::{render_stub, RenderedStub};
pub use serialize::{
    ConflictingExportKeys, SerializationStore, SerializedModule, StubKeys, SuppressedConflict,
};

/// Version of the meteorite stub generator
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
