//! # java-ebuilder CLI
//!
//! Binary entry point for the `java-ebuilder` command-line tool. It parses
//! the arguments with `clap` and dispatches to one of the subcommands; the
//! scanning and resolution logic lives in the library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
