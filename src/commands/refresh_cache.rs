//! # Refresh Cache Command Implementation
//!
//! Scans one or more Portage trees for Java ebuilds and rewrites the cache
//! file from scratch.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use log::info;

use java_ebuilder::defaults::DEFAULT_PORTAGE_TREE;
use java_ebuilder::{write_cache, ScanSession};

/// Scan portage trees and rewrite the cache file
#[derive(Args, Debug)]
pub struct RefreshCacheArgs {
    /// Portage tree to scan; may be given several times.
    #[arg(
        short = 't',
        long = "portage-tree",
        value_name = "DIR",
        default_value = DEFAULT_PORTAGE_TREE
    )]
    pub portage_trees: Vec<PathBuf>,
}

/// Execute the `refresh-cache` command.
pub fn execute(args: RefreshCacheArgs, cache_file: &Path) -> Result<()> {
    let mut session =
        ScanSession::scan(args.portage_trees.as_slice()).context("Failed to scan portage tree")?;

    write_cache(&mut session.items, cache_file)
        .with_context(|| format!("Failed to write cache to {}", cache_file.display()))?;
    info!(
        "Wrote {} items to {}",
        session.items.len(),
        cache_file.display()
    );

    Ok(())
}
