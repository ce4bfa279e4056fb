// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Command implementations for meteorite.

pub mod check;
pub mod inspect;
pub mod stub;

use anyhow::{Context, Result};
use meteorite_stubs::{MeteorPackage, PackageMeta, StubKeys};

use crate::cli::{KeyArgs, PackageArgs};

/// Load a parsed package from disk with the meta options the CLI carries.
pub fn load_package(args: &PackageArgs) -> Result<MeteorPackage> {
    let meta = PackageMeta {
        ignore_duplicate_exports_in_packages: args.ignore_duplicate_exports.clone(),
        lazy_main_module_path: args.lazy_main_module_path.clone(),
        vite_env: args.vite_env.clone(),
    };
    MeteorPackage::read(&args.file, meta)
        .with_context(|| format!("Failed to load parsed package from {}", args.file))
}

/// Stub identifier names, with CLI overrides applied over the defaults.
pub fn stub_keys(args: &KeyArgs) -> StubKeys {
    let mut keys = StubKeys::default();
    if let Some(stub_key) = &args.stub_key {
        keys.meteor_stub = stub_key.clone();
    }
    if let Some(scope_key) = &args.scope_key {
        keys.package_scope = scope_key.clone();
    }
    if let Some(global_key) = &args.global_key {
        keys.template_global = global_key.clone();
    }
    keys
}
