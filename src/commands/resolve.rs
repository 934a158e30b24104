//! # Resolve Command Implementation
//!
//! Looks up Maven coordinates in the cache and prints the Portage dependency
//! for each, or a placeholder when nothing suitable is packaged.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use java_ebuilder::Error;

/// Resolve Maven coordinates to Portage dependency atoms
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Coordinates in `groupId:artifactId:version` form.
    #[arg(required = true, value_name = "GROUP:ARTIFACT:VERSION")]
    pub coordinates: Vec<String>,
}

/// Execute the `resolve` command.
pub fn execute(args: ResolveArgs, cache_file: &Path) -> Result<()> {
    let cache = super::load_cache(cache_file)?;

    for coordinate in &args.coordinates {
        let parts: Vec<&str> = coordinate.split(':').collect();
        let [group_id, artifact_id, version] = parts.as_slice() else {
            return Err(Error::InvalidCoordinate(coordinate.clone()).into());
        };
        let resolution = cache
            .resolve(group_id, artifact_id, version)
            .with_context(|| format!("Failed to resolve {coordinate}"))?;
        println!("{coordinate} -> {resolution}");
    }

    Ok(())
}
