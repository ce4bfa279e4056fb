// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Full stub file composition.
//!
//! The serialized export body only references accessor bindings; this
//! module emits the prelude that creates them. The stub binds the runtime
//! global, then installs a one-file module through `meteorInstall` whose
//! only job is to `require` the target module inside the legacy module
//! system, capturing its namespace in the submodule accessor. Package-scope
//! accessors read straight off the global `Package` object and need no
//! install step.

use crate::error::Result;
use crate::package::MeteorPackage;
use crate::serialize::{serialize_resolved, SerializedModule, StubKeys};

/// A complete stub file together with the serialization outcome it wraps.
#[derive(Debug, Clone)]
pub struct RenderedStub {
    /// Full ES module source, ready to hand to the bundler
    pub source: String,
    /// The export body and conflict report the stub was built from
    pub serialized: SerializedModule,
}

/// Serialize a module of `package` and wrap it in the full stub prelude.
///
/// `request_id` is echoed into a comment so bundler request logs can be
/// matched to generated sources.
pub fn render_stub(
    package: &MeteorPackage,
    import_path: Option<&str>,
    keys: &StubKeys,
    request_id: Option<&str>,
) -> Result<RenderedStub> {
    let submodule = package.resolve(import_path)?;
    let serialized = serialize_resolved(package, submodule.as_ref(), import_path, keys)?;

    // Requests for the package's own main module require the bare package
    // id; sub-paths (and nested npm modules) require their full path.
    let target = match &submodule {
        Some(module)
            if module.is_main_module && module.package.package_id() == package.package_id() =>
        {
            package.package_id().to_string()
        }
        Some(module) => module.full_import_path(),
        None => package.package_id().to_string(),
    };
    let stub_file = stub_file_name(&target);

    let mut source = format!("// meteorite stub: {target}\n");
    if let Some(request_id) = request_id {
        source.push_str(&format!("// requestId: {request_id}\n"));
    }
    let global = &keys.template_global;
    let stub = &keys.meteor_stub;
    source.push_str(&format!(
        "const {global} = typeof window !== 'undefined' ? window : global;\n\
         let {stub};\n\
         const require = {global}.Package.modules.meteorInstall({{\n\
         \x20 '{stub_file}': function (require, exports, module) {{\n\
         \x20   {stub} = require('{target}');\n\
         \x20 }},\n\
         }}, {{\n\
         \x20 \"extensions\": [\".js\"]\n\
         }})('/{stub_file}');\n"
    ));
    if !serialized.source.is_empty() {
        source.push('\n');
        source.push_str(&serialized.source);
        source.push('\n');
    }

    Ok(RenderedStub { source, serialized })
}

/// File name the stub installs itself under. One file per target keeps
/// repeated installs from clobbering each other.
fn stub_file_name(target: &str) -> String {
    let sanitized: String = target
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("__meteorite_{sanitized}.js")
}
