// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Stub command implementation.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::cli::{Cli, StubArgs};
use crate::commands::{load_package, stub_keys};
use meteorite_stubs::render_stub;

/// Run the stub command.
pub fn run(args: &StubArgs, cli: &Cli) -> Result<()> {
    let package = load_package(&args.package)?;
    let keys = stub_keys(&args.keys);
    let import_path = args.import_path.as_deref();

    let (source, suppressed) = if args.body_only {
        let serialized = package.serialize(import_path, &keys)?;
        (serialized.source, serialized.suppressed)
    } else {
        let stub = render_stub(&package, import_path, &keys, args.request_id.as_deref())?;
        (stub.source, stub.serialized.suppressed)
    };

    if !cli.quiet {
        for conflict in &suppressed {
            if conflict.allow_listed {
                continue;
            }
            eprintln!(
                "{}: duplicate export key '{}' in {} (first claimant kept)",
                "warning".yellow().bold(),
                conflict.key,
                conflict.package_id
            );
        }
    }

    match &args.output {
        Some(path) => {
            std::fs::write(path, &source)
                .with_context(|| format!("Failed to write stub to {path}"))?;
            if !cli.quiet {
                eprintln!("{} wrote stub for {} to {}", "ok".green().bold(), package.package_id().cyan(), path);
            }
        }
        None => print!("{source}"),
    }

    Ok(())
}
