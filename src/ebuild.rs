//! Extraction of Java packaging facts from ebuild text.
//!
//! Ebuilds are bash, but the handful of declarations needed here are written
//! in a regular enough shape that a line scanner recovers them reliably:
//! `inherit`, `SLOT=`, `JAVA_PKG_OPT_USE=`, `MAVEN_ID=` and `MAVEN_PROVIDES=`.

use std::collections::HashMap;

use crate::error::Result;
use crate::item::{CacheItem, MavenArtifact};
use crate::slot::{expand_slot, substitute};

/// Eclass providing optional Java support.
pub const ECLASS_JAVA_PKG_OPT: &str = "java-pkg-opt-2";

/// Ant tasks eclass, the only Java eclass without the `java-` prefix.
pub const ECLASS_ANT_TASKS: &str = "ant-tasks";

/// USE flag assumed for optional-Java packages that do not name one.
const DEFAULT_JAVA_USE_FLAG: &str = "java";

/// Whether an inherited eclass counts as a Java build module.
pub fn is_java_eclass(eclass: &str) -> bool {
    eclass.starts_with("java-") || eclass == ECLASS_ANT_TASKS
}

/// Declarations collected from a single ebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EbuildFacts {
    /// Java eclasses of the last `inherit` line; `None` without one.
    pub java_eclasses: Option<Vec<String>>,
    /// Raw `SLOT` value, subslot stripped.
    pub slot: Option<String>,
    /// Raw `JAVA_PKG_OPT_USE` value.
    pub use_flag: Option<String>,
    /// Raw `MAVEN_ID` value.
    pub maven_id: Option<String>,
    /// Every coordinate listed in `MAVEN_PROVIDES`.
    pub maven_provides: Vec<String>,
    /// Every `NAME=value` assignment seen, quotes stripped.
    pub variables: HashMap<String, String>,
}

impl EbuildFacts {
    /// Scan ebuild text.
    ///
    /// Returns `None` as soon as an `inherit` line without any Java eclass is
    /// met, or when the ebuild inherits nothing at all.
    ///
    /// # Examples
    ///
    /// ```
    /// use java_ebuilder::EbuildFacts;
    ///
    /// let facts = EbuildFacts::parse("\
    /// EAPI=8
    /// MAVEN_ID=\"org.foo:bar:2.3\"
    /// inherit java-pkg-2 java-pkg-simple
    /// SLOT=\"0\"
    /// ").unwrap();
    /// assert_eq!(facts.maven_id.as_deref(), Some("org.foo:bar:2.3"));
    ///
    /// assert!(EbuildFacts::parse("inherit cmake\nSLOT=0\n").is_none());
    /// ```
    pub fn parse(input: &str) -> Option<EbuildFacts> {
        let mut facts = EbuildFacts::default();
        let mut in_provides = false;

        for line in input.lines() {
            let line = strip_comment(line.trim());
            if line.is_empty() {
                continue;
            }

            if in_provides {
                if !line.starts_with('"') {
                    facts.push_provides(line);
                }
                if line.contains('"') {
                    in_provides = false;
                }
                continue;
            }

            if let Some((name, value)) = parse_assignment(line) {
                facts.variables.insert(name.to_string(), value.to_string());
            }

            if let Some(eclasses) = line.strip_prefix("inherit ") {
                let java: Vec<String> = eclasses
                    .split_whitespace()
                    .filter(|e| is_java_eclass(e))
                    .map(str::to_string)
                    .collect();
                if java.is_empty() {
                    return None;
                }
                facts.java_eclasses = Some(java);
            } else if let Some(value) = line.strip_prefix("SLOT=") {
                let value = value.replace('"', "");
                let slot = value.split_once('/').map_or(value.as_str(), |(s, _)| s);
                facts.slot = Some(slot.to_string());
            } else if let Some(value) = line.strip_prefix("JAVA_PKG_OPT_USE=") {
                facts.use_flag = Some(value.replace('"', ""));
            } else if let Some(value) = line.strip_prefix("MAVEN_ID=") {
                facts.maven_id = Some(value.replace('"', ""));
            } else if let Some(value) = line.strip_prefix("MAVEN_PROVIDES=") {
                let quotes = value.matches('"').count();
                if quotes > 1 || !value.ends_with('"') {
                    facts.push_provides(value);
                }
                // A lone opening quote continues on the following lines.
                in_provides = quotes == 1;
            }
        }

        if facts.java_eclasses.is_none() {
            return None;
        }
        Some(facts)
    }

    fn push_provides(&mut self, value: &str) {
        self.maven_provides.extend(
            value
                .replace('"', "")
                .split_whitespace()
                .map(str::to_string),
        );
    }

    /// Turn the collected facts into cache items.
    ///
    /// `version` is the full Portage version (with revision) and `slot` the
    /// slot to record, or `None` to expand the one declared in the ebuild.
    /// One item is produced for `MAVEN_ID` (or a bare item without it) and one
    /// for each `MAVEN_PROVIDES` coordinate. Values that cannot be stored in
    /// a cache line are an error.
    pub fn into_items(
        self,
        category: &str,
        pkg: &str,
        version: &str,
        slot: Option<String>,
    ) -> Result<Vec<CacheItem>> {
        let java_eclasses = self.java_eclasses.unwrap_or_default();
        let pv = bare_pv(version);

        let slot = slot.unwrap_or_else(|| {
            let raw = self.slot.as_deref().unwrap_or("0");
            expand_slot(raw, pv, &self.variables)
        });

        let use_flag = self.use_flag.or_else(|| {
            java_eclasses
                .iter()
                .any(|e| e == ECLASS_JAVA_PKG_OPT)
                .then(|| DEFAULT_JAVA_USE_FLAG.to_string())
        });

        let placeholders = |s: &str| substitute(&substitute(s, "PN", pkg), "PV", pv);

        let primary = match &self.maven_id {
            Some(id) => Some(primary_artifact(&placeholders(id), pkg, version)?),
            None => None,
        };

        let mut artifacts = vec![primary];
        for provided in &self.maven_provides {
            artifacts.push(Some(MavenArtifact::parse(&placeholders(provided))?));
        }

        artifacts
            .into_iter()
            .map(|maven| {
                let item = CacheItem {
                    category: category.to_string(),
                    pkg: pkg.to_string(),
                    version: version.to_string(),
                    slot: slot.clone(),
                    use_flag: use_flag.clone(),
                    maven,
                    java_eclasses: java_eclasses.clone(),
                };
                item.validate()?;
                Ok(item)
            })
            .collect()
    }
}

/// `PV`: the version up to the first `-`.
pub fn bare_pv(version: &str) -> &str {
    version.split_once('-').map_or(version, |(pv, _)| pv)
}

/// Resolve a `MAVEN_ID`, filling the parts it leaves out from the package.
fn primary_artifact(id: &str, pkg: &str, version: &str) -> Result<MavenArtifact> {
    // Anything after the version, such as a packaging type, is dropped.
    let mut parts = id.split(':').map(|p| Some(p).filter(|p| !p.is_empty()));
    let group = parts.next().flatten().unwrap_or(pkg);
    let artifact = parts.next().flatten().unwrap_or(pkg);
    let maven_version = parts.next().flatten().unwrap_or(version);
    MavenArtifact::new(group, artifact, maven_version)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => line[..pos].trim_end(),
        None => line,
    }
}

/// Split a `NAME=value` line, stripping one pair of surrounding quotes.
fn parse_assignment(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once('=')?;
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    let value = value.strip_prefix('"').unwrap_or(value);
    let value = value.strip_suffix('"').unwrap_or(value);
    Some((name, value))
}
