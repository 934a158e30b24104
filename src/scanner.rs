//! Repository tree scanning.
//!
//! A Portage tree is laid out as `<category>/<package>/<package>-<version>.ebuild`.
//! Every ebuild inheriting a Java eclass contributes one or more
//! [`CacheItem`]s to the [`ScanSession`].

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Instant;

use log::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::ebuild::EbuildFacts;
use crate::error::{Error, Result};
use crate::item::CacheItem;
use crate::metadata::{md5_cache_path, CachedMetadata};

const EBUILD_SUFFIX: &str = ".ebuild";

/// The result of walking one or more repository trees.
#[derive(Debug, Clone, Default)]
pub struct ScanSession {
    /// Items found, in walk order.
    pub items: Vec<CacheItem>,
    /// Number of category directories visited.
    pub categories: usize,
    /// Number of package directories visited.
    pub packages: usize,
    /// Number of ebuild files read.
    pub ebuilds: usize,
    /// How many Java ebuilds inherit each Java eclass.
    pub eclass_counts: BTreeMap<String, usize>,
}

impl ScanSession {
    /// Scan every tree in order.
    ///
    /// Any I/O failure aborts the whole scan; a partial session is never
    /// returned.
    pub fn scan<P: AsRef<Path>>(trees: &[P]) -> Result<ScanSession> {
        let start = Instant::now();
        let mut session = ScanSession::default();

        for tree in trees {
            info!("Parsing portage tree @ {}", tree.as_ref().display());
            session.scan_tree(tree.as_ref())?;
        }

        info!(
            "Parsed {} categories {} packages {} ebuilds in {}ms and found {} java ebuilds",
            session.categories,
            session.packages,
            session.ebuilds,
            start.elapsed().as_millis(),
            session.items.len()
        );
        info!("Used java eclasses: {}", session.eclass_summary());

        Ok(session)
    }

    /// Scan a single tree, adding to this session.
    pub fn scan_tree(&mut self, root: &Path) -> Result<()> {
        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(3)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e));

        for entry in walker {
            let entry = entry?;
            let is_dir = entry.file_type().is_dir();

            match entry.depth() {
                1 if is_dir => self.categories += 1,
                2 if is_dir => self.packages += 1,
                3 if entry.file_type().is_file() => {
                    if entry.file_name().to_string_lossy().ends_with(EBUILD_SUFFIX) {
                        self.scan_ebuild(root, entry.path())?;
                        self.ebuilds += 1;
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn scan_ebuild(&mut self, root: &Path, path: &Path) -> Result<()> {
        let (Some(category), Some(pkg), Some(file_name)) = (
            component(path.parent().and_then(Path::parent)),
            component(path.parent()),
            component(Some(path)),
        ) else {
            debug!("skipping {}: not valid UTF-8", path.display());
            return Ok(());
        };

        let Some(version) = file_name
            .strip_suffix(EBUILD_SUFFIX)
            .and_then(|f| f.strip_prefix(pkg))
            .and_then(|f| f.strip_prefix('-'))
            .filter(|v| !v.is_empty())
        else {
            debug!("skipping {}: file name does not match package", path.display());
            return Ok(());
        };

        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        let input = String::from_utf8_lossy(&bytes);
        let Some(facts) = EbuildFacts::parse(&input) else {
            return Ok(());
        };

        let metadata_path = md5_cache_path(root, category, &format!("{pkg}-{version}"));
        let cached_slot = if metadata_path.is_file() {
            CachedMetadata::read(&metadata_path)?.slot.map(|s| s.slot)
        } else {
            None
        };

        let items = facts
            .into_items(category, pkg, version, cached_slot)
            .map_err(|e| Error::Ebuild {
                path: path.to_path_buf(),
                source: Box::new(e),
            })?;
        if let Some(first) = items.first() {
            for eclass in &first.java_eclasses {
                *self.eclass_counts.entry(eclass.clone()).or_default() += 1;
            }
        }
        self.items.extend(items);

        Ok(())
    }

    /// `eclass = count` pairs, sorted by eclass name.
    pub fn eclass_summary(&self) -> String {
        self.eclass_counts
            .iter()
            .map(|(eclass, count)| format!("{eclass} = {count}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn component(path: Option<&Path>) -> Option<&str> {
    path?.file_name()?.to_str()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}
