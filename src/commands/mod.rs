//! # CLI Command Implementations
//!
//! Each subcommand of `java-ebuilder` lives in its own module, with an `Args`
//! struct derived using `clap` where it takes arguments and an `execute`
//! function calling into the `java_ebuilder` library.

pub mod dump;
pub mod keywords;
pub mod refresh_cache;
pub mod resolve;

use std::path::Path;

use anyhow::{bail, Context, Result};
use java_ebuilder::MavenCache;

/// Load the cache file, pointing at `refresh-cache` when it does not exist.
pub(crate) fn load_cache(cache_file: &Path) -> Result<MavenCache> {
    if !cache_file.exists() {
        bail!(
            "cache file {} does not exist, run `java-ebuilder refresh-cache` first",
            cache_file.display()
        );
    }
    MavenCache::load(cache_file)
        .with_context(|| format!("Failed to load cache from {}", cache_file.display()))
}
