// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Check command implementation.
//!
//! Serializes every module of a package and reports the export-key
//! conflicts that serialization tolerated. Allow-listed conflicts are
//! informational; any other conflict fails the check.

use anyhow::{bail, Result};
use owo_colors::OwoColorize;
use serde_json::json;

use crate::cli::{CheckArgs, Cli};
use crate::commands::{load_package, stub_keys};

/// Run the check command.
pub fn run(args: &CheckArgs, cli: &Cli) -> Result<()> {
    let package = load_package(&args.package)?;
    let keys = stub_keys(&args.keys);

    let mut reports = Vec::new();
    let mut failures = 0usize;
    for module_path in package.modules().keys() {
        let serialized = package.serialize(Some(module_path), &keys)?;
        failures += serialized
            .suppressed
            .iter()
            .filter(|conflict| !conflict.allow_listed)
            .count();
        reports.push((module_path.clone(), serialized));
    }

    if args.json {
        let modules: Vec<_> = reports
            .iter()
            .map(|(module_path, serialized)| {
                json!({
                    "modulePath": module_path,
                    "exportedKeys": serialized.exported_keys,
                    "suppressedConflicts": serialized
                        .suppressed
                        .iter()
                        .map(|conflict| json!({
                            "key": conflict.key,
                            "packageId": conflict.package_id,
                            "allowListed": conflict.allow_listed,
                        }))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        let report = json!({
            "packageId": package.package_id(),
            "modules": modules,
            "conflicts": failures,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !cli.quiet {
        println!("{} {}", package.package_id().cyan().bold(), format!("({} modules)", reports.len()).dimmed());
        for (module_path, serialized) in &reports {
            if serialized.suppressed.is_empty() {
                if cli.verbose {
                    println!("  {} {}", "ok".green(), module_path);
                }
                continue;
            }
            println!("  {} {}", "!!".yellow().bold(), module_path);
            for conflict in &serialized.suppressed {
                let tag = if conflict.allow_listed { "ignored".dimmed().to_string() } else { "conflict".red().to_string() };
                println!("     {} duplicate key '{}' from {}", tag, conflict.key, conflict.package_id);
            }
        }
    }

    if failures > 0 {
        bail!(
            "{failures} conflicting export key(s) in {} are not allow-listed",
            package.package_id()
        );
    }
    Ok(())
}
