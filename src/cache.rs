use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::item::CacheItem;
use crate::version::MavenVersion;

/// Format version written to the first line of the cache file.
pub const CACHE_VERSION: &str = "1.1";

/// Older format version that can still be read.
pub const LEGACY_CACHE_VERSION: &str = "1.0";

const CACHE_HEADER: &str =
    "#category:pkg:version:slot:useFlag:groupId:artifactId:mavenVersion:javaEclasses";

/// Category whose packages are virtuals and never pinned to a version.
const VIRTUALS_CATEGORY: &str = "java-virtuals";

/// Outcome of resolving a Maven dependency against the cache.
///
/// Lookups that find nothing are expected: the catalog of packaged libraries
/// is always incomplete. Their `Display` form is a placeholder meant to be
/// embedded in generated ebuilds so that a reviewer notices and fixes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A Portage dependency atom such as `>=dev-java/junit-4.13.2:4`.
    Found(String),
    /// No package provides anything for the group id.
    GroupNotFound,
    /// The group is known but the artifact id is not.
    ArtifactNotFound,
    /// Every packaged version is older than the requested one.
    NoSuitableVersion,
}

impl Resolution {
    /// The dependency atom, if one was found.
    pub fn atom(&self) -> Option<&str> {
        match self {
            Resolution::Found(atom) => Some(atom),
            _ => None,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Resolution::Found(atom) => f.write_str(atom),
            Resolution::GroupNotFound => f.write_str("!!!groupId-not-found!!!"),
            Resolution::ArtifactNotFound => f.write_str("!!!artifactId-not-found!!!"),
            Resolution::NoSuitableVersion => f.write_str("!!!suitable-mavenVersion-not-found!!!"),
        }
    }
}

/// Index of cached packages by Maven group and artifact id.
///
/// Every item is kept for inventory purposes; only those with a Maven
/// artifact are reachable through [`MavenCache::resolve`].
///
/// # Examples
///
/// ```
/// use java_ebuilder::{CacheItem, MavenCache, Resolution};
///
/// let items = vec![
///     CacheItem::parse_line("dev-java:junit:4.13.2:4::junit:junit:4.13.2:java-pkg-2").unwrap(),
///     CacheItem::parse_line("dev-java:junit:4.11-r1:4::junit:junit:4.11:java-pkg-2").unwrap(),
/// ];
/// let cache = MavenCache::from_items(items);
///
/// let found = cache.resolve("junit", "junit", "4.12").unwrap();
/// assert_eq!(found, Resolution::Found(">=dev-java/junit-4.13.2:4".to_string()));
/// assert_eq!(
///     cache.resolve("junit", "junit", "5.0").unwrap().to_string(),
///     "!!!suitable-mavenVersion-not-found!!!"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MavenCache {
    items: Vec<CacheItem>,
    // group id -> artifact id -> item positions, ascending by Maven version
    index: HashMap<String, HashMap<String, Vec<usize>>>,
}

impl MavenCache {
    /// Build the index over `items`.
    ///
    /// Items are bucketed first and every bucket is sorted once at the end.
    pub fn from_items(items: Vec<CacheItem>) -> MavenCache {
        let mut index: HashMap<String, HashMap<String, Vec<usize>>> = HashMap::new();

        for (pos, item) in items.iter().enumerate() {
            if let Some(maven) = &item.maven {
                index
                    .entry(maven.group_id.clone())
                    .or_default()
                    .entry(maven.artifact_id.clone())
                    .or_default()
                    .push(pos);
            }
        }

        for bucket in index.values_mut().flat_map(HashMap::values_mut) {
            bucket.sort_by(|&a, &b| maven_version(&items[a]).cmp(&maven_version(&items[b])));
        }

        MavenCache { items, index }
    }

    /// Load the cache file at `path`.
    pub fn load(path: &Path) -> Result<MavenCache> {
        debug!("reading maven cache from {}", path.display());
        let file = fs::File::open(path).map_err(|e| Error::io(path, e))?;
        Self::read(file).map_err(|e| match e {
            Error::Io { source, .. } => Error::io(path, source),
            e => e,
        })
    }

    /// Read a cache from any reader.
    ///
    /// The first line must carry the format version. A legacy version is
    /// accepted with a warning; anything else is refused.
    pub fn read<R: Read>(reader: R) -> Result<MavenCache> {
        let mut lines = BufReader::new(reader).lines();

        let version = lines
            .next()
            .transpose()
            .map_err(|e| Error::io("<cache>", e))?
            .unwrap_or_default();
        match version.trim() {
            CACHE_VERSION => {}
            LEGACY_CACHE_VERSION => {
                warn!("cache format {LEGACY_CACHE_VERSION} is not up-to-date, consider refreshing the cache")
            }
            other => return Err(Error::UnsupportedCacheVersion(other.to_string())),
        }

        let mut items = Vec::new();
        for (n, line) in lines.enumerate() {
            let line = line.map_err(|e| Error::io("<cache>", e))?;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let item = CacheItem::parse_line(&line).map_err(|e| match e {
                Error::InvalidCacheLine { content, .. } => Error::InvalidCacheLine {
                    line: n + 2,
                    content,
                },
                e => e,
            })?;
            items.push(item);
        }

        Ok(Self::from_items(items))
    }

    /// Find the Portage dependency for a Maven artifact.
    ///
    /// The first packaged version at or above `version` is picked, i.e. the
    /// smallest one that satisfies the requirement. A version that does not
    /// parse is an error.
    pub fn resolve(&self, group_id: &str, artifact_id: &str, version: &str) -> Result<Resolution> {
        let Some(artifacts) = self.index.get(group_id) else {
            return Ok(Resolution::GroupNotFound);
        };
        let Some(bucket) = artifacts.get(artifact_id) else {
            return Ok(Resolution::ArtifactNotFound);
        };

        let wanted: MavenVersion = version.parse()?;
        let found = bucket
            .iter()
            .map(|&pos| &self.items[pos])
            .find(|item| maven_version(item).is_some_and(|v| v >= &wanted));

        Ok(match found {
            Some(item) => Resolution::Found(dependency_atom(item)),
            None => Resolution::NoSuitableVersion,
        })
    }

    /// All cached items, in the order they were loaded.
    pub fn items(&self) -> &[CacheItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn maven_version(item: &CacheItem) -> Option<&MavenVersion> {
    item.maven.as_ref().map(|m| &m.version)
}

/// Format `>=category/pkg-version[use]:slot`, unversioned for virtuals.
fn dependency_atom(item: &CacheItem) -> String {
    let mut atom = String::with_capacity(50);
    let pinned = item.category != VIRTUALS_CATEGORY;

    if pinned {
        atom.push_str(">=");
    }
    atom.push_str(&item.category);
    atom.push('/');
    atom.push_str(&item.pkg);
    if pinned {
        atom.push('-');
        atom.push_str(&item.bare_version());
    }
    if let Some(flag) = &item.use_flag {
        atom.push('[');
        atom.push_str(flag);
        atom.push(']');
    }
    atom.push(':');
    atom.push_str(&item.slot);
    atom
}

/// Write items in cache file format, sorted by category, package and version.
pub fn write_items<W: Write>(items: &mut [CacheItem], mut writer: W) -> std::io::Result<()> {
    items.sort_by(|a, b| {
        (&a.category, &a.pkg, &a.version).cmp(&(&b.category, &b.pkg, &b.version))
    });

    writeln!(writer, "{CACHE_VERSION}")?;
    writeln!(writer, "{CACHE_HEADER}")?;
    for item in items.iter() {
        writeln!(writer, "{item}")?;
    }
    writer.flush()
}

/// Write the cache file at `path`, creating parent directories as needed.
pub fn write_cache(items: &mut [CacheItem], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let file = fs::File::create(path).map_err(|e| Error::io(path, e))?;
    write_items(items, BufWriter::new(file)).map_err(|e| Error::io(path, e))
}
