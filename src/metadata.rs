use std::fs;
use std::path::{Path, PathBuf};

use portage_atom::Slot;

use crate::error::{Error, Result};

/// The subset of a md5-cache entry the scanner cares about.
///
/// Represents `metadata/md5-cache/<category>/<package>-<version>`. The cache
/// holds the values as evaluated by the package manager, so its `SLOT` is
/// authoritative over whatever the scanner can reconstruct from the ebuild.
///
/// See [PMS 14.2](https://projects.gentoo.org/pms/9/pms.html#mddict-cache-file-format).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedMetadata {
    /// Package slot, if the entry declares one.
    pub slot: Option<Slot>,
}

impl CachedMetadata {
    /// Parse a md5-cache file's contents.
    ///
    /// Lines are `KEY=VALUE` pairs in arbitrary order; keys other than `SLOT`
    /// are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use java_ebuilder::CachedMetadata;
    ///
    /// let entry = CachedMetadata::parse("EAPI=8\nSLOT=2/2.1\nKEYWORDS=~amd64\n").unwrap();
    /// assert_eq!(entry.slot.unwrap().slot, "2");
    /// ```
    pub fn parse(input: &str) -> Result<CachedMetadata> {
        let mut slot = None;

        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(("SLOT", value)) = line.split_once('=') {
                slot = parse_slot(value);
            }
        }

        Ok(CachedMetadata { slot })
    }

    /// Read the entry at `path`.
    pub fn read(path: &Path) -> Result<CachedMetadata> {
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&String::from_utf8_lossy(&bytes))
    }
}

/// Location of the md5-cache entry for an ebuild in the tree at `root`.
pub fn md5_cache_path(root: &Path, category: &str, pvr: &str) -> PathBuf {
    root.join("metadata").join("md5-cache").join(category).join(pvr)
}

/// Parse a SLOT value into a `Slot`; an empty value counts as no slot.
fn parse_slot(s: &str) -> Option<Slot> {
    let s = s.trim_matches('"');
    if s.is_empty() {
        return None;
    }
    match s.split_once('/') {
        Some((slot, subslot)) => Some(Slot::with_subslot(slot, subslot)),
        None => Some(Slot::new(s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_CACHE: &str = "\
DEFINED_PHASES=compile install preinst prepare setup test
DEPEND=>=virtual/jdk-1.8:* dev-java/hamcrest-core:1.3
DESCRIPTION=Simple unit testing framework for Java
EAPI=8
HOMEPAGE=https://junit.org/junit4/
IUSE=doc source test
KEYWORDS=amd64 ~arm arm64 ppc64 x86
LICENSE=EPL-1.0
SLOT=4
_eclasses_=java-pkg-2\t1234\tjava-pkg-simple\t5678
_md5_=4539d849d3cea8ac84debad9b3154143
";

    #[test]
    fn parse_example() {
        let entry = CachedMetadata::parse(EXAMPLE_CACHE).unwrap();
        let slot = entry.slot.unwrap();
        assert_eq!(slot.slot, "4");
        assert_eq!(slot.subslot, None);
    }

    #[test]
    fn slot_with_subslot() {
        let entry = CachedMetadata::parse("SLOT=0/2.1\n").unwrap();
        let slot = entry.slot.unwrap();
        assert_eq!(slot.slot, "0");
        assert_eq!(slot.subslot, Some("2.1".to_string()));
    }

    #[test]
    fn missing_slot() {
        let entry = CachedMetadata::parse("EAPI=7\nDESCRIPTION=Test\n").unwrap();
        assert_eq!(entry.slot, None);
    }

    #[test]
    fn empty_slot_is_absent() {
        let entry = CachedMetadata::parse("SLOT=\n").unwrap();
        assert_eq!(entry.slot, None);
    }

    #[test]
    fn read_tolerates_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foo-1.0");
        fs::write(&path, b"DESCRIPTION=J\xf6rg's library\nSLOT=2\n").unwrap();
        let entry = CachedMetadata::read(&path).unwrap();
        assert_eq!(entry.slot.unwrap().slot, "2");
    }

    #[test]
    fn empty_lines_ignored() {
        let entry = CachedMetadata::parse("\nDESCRIPTION=Test\n\nSLOT=1\n\n").unwrap();
        assert_eq!(entry.slot.unwrap().slot, "1");
    }

    #[test]
    fn cache_path_layout() {
        let path = md5_cache_path(Path::new("/repo"), "dev-java", "junit-4.13.2-r1");
        assert_eq!(
            path,
            Path::new("/repo/metadata/md5-cache/dev-java/junit-4.13.2-r1")
        );
    }
}
