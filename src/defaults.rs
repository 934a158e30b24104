//! Default locations used by the command line tool.

use std::path::PathBuf;

/// Portage tree scanned when none is given.
pub const DEFAULT_PORTAGE_TREE: &str = "/usr/portage";

/// Returns the default cache file, `~/.java-ebuilder/cache`.
///
/// Falls back to `.java-ebuilder/cache` in the current directory when the
/// home directory cannot be determined. Overridden by `--cache-file` or the
/// `JAVA_EBUILDER_CACHE` environment variable.
pub fn default_cache_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".java-ebuilder")
        .join("cache")
}
