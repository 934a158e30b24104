//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// java-ebuilder - Map Maven artifacts to Gentoo packages
#[derive(Parser, Debug)]
#[command(name = "java-ebuilder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Path to the Maven cache file.
    ///
    /// Defaults to `~/.java-ebuilder/cache`.
    #[arg(long, global = true, value_name = "FILE", env = "JAVA_EBUILDER_CACHE")]
    cache_file: Option<PathBuf>,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan portage trees and rewrite the cache file
    RefreshCache(commands::refresh_cache::RefreshCacheArgs),

    /// Resolve Maven coordinates to Portage dependency atoms
    Resolve(commands::resolve::ResolveArgs),

    /// Print every cached item
    Dump,

    /// Merge keywords and print the strongest per arch
    Keywords(commands::keywords::KeywordsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::new()
            .parse_filters(&self.log_level)
            .format_timestamp(None)
            .init();

        let cache_file = self
            .cache_file
            .unwrap_or_else(java_ebuilder::defaults::default_cache_file);

        match self.command {
            Commands::RefreshCache(args) => commands::refresh_cache::execute(args, &cache_file),
            Commands::Resolve(args) => commands::resolve::execute(args, &cache_file),
            Commands::Dump => commands::dump::execute(&cache_file),
            Commands::Keywords(args) => commands::keywords::execute(args),
        }
    }
}
