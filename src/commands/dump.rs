//! # Dump Command Implementation
//!
//! Prints the cache contents, one cache line per item.

use std::path::Path;

use anyhow::Result;

/// Execute the `dump` command.
pub fn execute(cache_file: &Path) -> Result<()> {
    let cache = super::load_cache(cache_file)?;
    for item in cache.items() {
        println!("{item}");
    }
    Ok(())
}
