// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! CLI argument parsing for meteorite.

use clap::{Args, Parser, Subcommand};

/// meteorite - ES module stub generation for legacy Meteor packages
#[derive(Parser, Debug)]
#[command(name = "meteorite")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an ES module stub for a parsed package
    #[command(alias = "s")]
    Stub(StubArgs),

    /// Print a JSON diagnostic snapshot of a parsed package
    #[command(alias = "i")]
    Inspect(InspectArgs),

    /// Serialize every module of a package and report export conflicts
    #[command(alias = "c")]
    Check(CheckArgs),
}

/// Options shared by every command that loads a parsed package.
#[derive(Args, Debug, Default)]
pub struct PackageArgs {
    /// Path to the parsed-package JSON file emitted by the bundle parser
    pub file: String,

    /// Package ids whose duplicate export keys are tolerated silently
    #[arg(long = "ignore-duplicate-exports", value_name = "PACKAGE_ID")]
    pub ignore_duplicate_exports: Vec<String>,

    /// Main module path for lazily loaded packages
    #[arg(long, value_name = "PATH")]
    pub lazy_main_module_path: Option<String>,

    /// Environment label shown in diagnostics (e.g. client, server)
    #[arg(long, env = "METEORITE_VITE_ENV")]
    pub vite_env: Option<String>,
}

/// Overrides for the identifier names used in generated stub source.
#[derive(Args, Debug, Default)]
pub struct KeyArgs {
    /// Accessor name bound to the required submodule namespace
    #[arg(long, value_name = "IDENT")]
    pub stub_key: Option<String>,

    /// Prefix for package-scope accessor bindings
    #[arg(long, value_name = "IDENT")]
    pub scope_key: Option<String>,

    /// Name bound to the runtime global object
    #[arg(long, value_name = "IDENT")]
    pub global_key: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct StubArgs {
    #[command(flatten)]
    pub package: PackageArgs,

    #[command(flatten)]
    pub keys: KeyArgs,

    /// Import path to resolve; omit for the package's main module
    #[arg(long, value_name = "PATH")]
    pub import_path: Option<String>,

    /// Request id echoed into the stub header comment
    #[arg(long, value_name = "ID")]
    pub request_id: Option<String>,

    /// Write the stub to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Emit only the serialized export body, without the stub prelude
    #[arg(long)]
    pub body_only: bool,
}

#[derive(Args, Debug, Default)]
pub struct InspectArgs {
    #[command(flatten)]
    pub package: PackageArgs,

    #[command(flatten)]
    pub keys: KeyArgs,
}

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    #[command(flatten)]
    pub package: PackageArgs,

    #[command(flatten)]
    pub keys: KeyArgs,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,
}
