// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Inspect command implementation.

use anyhow::Result;

use crate::cli::{Cli, InspectArgs};
use crate::commands::{load_package, stub_keys};

/// Run the inspect command.
pub fn run(args: &InspectArgs, _cli: &Cli) -> Result<()> {
    let package = load_package(&args.package)?;
    let snapshot = package.snapshot(&stub_keys(&args.keys))?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
