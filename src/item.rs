use std::fmt;

use crate::error::{Error, Result};
use crate::version::MavenVersion;

/// A Maven artifact coordinate with its parsed version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenArtifact {
    /// Maven group id.
    pub group_id: String,
    /// Maven artifact id.
    pub artifact_id: String,
    /// Parsed Maven version; `Display` gives back the raw string.
    pub version: MavenVersion,
}

impl MavenArtifact {
    /// Create an artifact, parsing its version.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: &str,
    ) -> Result<Self> {
        Ok(MavenArtifact {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.parse()?,
        })
    }

    /// Parse a `groupId:artifactId:version` coordinate.
    ///
    /// # Examples
    ///
    /// ```
    /// use java_ebuilder::MavenArtifact;
    ///
    /// let artifact = MavenArtifact::parse("junit:junit:4.13.2").unwrap();
    /// assert_eq!(artifact.group_id, "junit");
    /// assert_eq!(artifact.version.minor(), 13);
    /// ```
    pub fn parse(coordinate: &str) -> Result<Self> {
        let mut parts = coordinate.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(group), Some(artifact), Some(version), None)
                if !group.is_empty() && !artifact.is_empty() && !version.is_empty() =>
            {
                MavenArtifact::new(group, artifact, version)
            }
            _ => Err(Error::InvalidCoordinate(coordinate.to_string())),
        }
    }
}

impl fmt::Display for MavenArtifact {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// One cached Portage package version, optionally mapped to a Maven artifact.
///
/// Items without a Maven artifact are part of the inventory but can never
/// satisfy a dependency lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheItem {
    /// Portage category (e.g. `dev-java`).
    pub category: String,
    /// Portage package name.
    pub pkg: String,
    /// Portage version including any `-rN` revision.
    pub version: String,
    /// Package slot, subslot stripped.
    pub slot: String,
    /// USE flag gating Java support for optional-Java packages.
    pub use_flag: Option<String>,
    /// The Maven artifact this package provides.
    pub maven: Option<MavenArtifact>,
    /// Java eclasses inherited by the ebuild.
    pub java_eclasses: Vec<String>,
}

impl CacheItem {
    /// Parse one data line of the cache file.
    ///
    /// The fields are `category:pkg:version:slot:useFlag:groupId:artifactId:mavenVersion:javaEclasses`.
    /// Only the first four are mandatory; missing or empty trailing fields are
    /// absent. The Maven group, artifact and version come as a unit.
    ///
    /// # Examples
    ///
    /// ```
    /// use java_ebuilder::CacheItem;
    ///
    /// let item = CacheItem::parse_line("dev-java:junit:4.13.2:4::junit:junit:4.13.2:java-pkg-2").unwrap();
    /// assert_eq!(item.slot, "4");
    /// assert_eq!(item.maven.unwrap().artifact_id, "junit");
    ///
    /// let old = CacheItem::parse_line("dev-java:ant-core:1.10.9:0").unwrap();
    /// assert!(old.maven.is_none());
    /// ```
    pub fn parse_line(line: &str) -> Result<CacheItem> {
        let invalid = || Error::InvalidCacheLine {
            line: 0,
            content: line.to_string(),
        };

        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() < 4 || fields.len() > 9 {
            return Err(invalid());
        }

        let field = |i: usize| fields.get(i).copied().filter(|f| !f.is_empty());

        let maven = match (field(5), field(6), field(7)) {
            (Some(group), Some(artifact), Some(version)) => {
                Some(MavenArtifact::new(group, artifact, version)?)
            }
            (None, None, None) => None,
            _ => return Err(invalid()),
        };

        let java_eclasses = field(8)
            .map(|eclasses| eclasses.split(',').map(str::to_string).collect())
            .unwrap_or_default();

        Ok(CacheItem {
            category: fields[0].to_string(),
            pkg: fields[1].to_string(),
            version: fields[2].to_string(),
            slot: fields[3].to_string(),
            use_flag: field(4).map(str::to_string),
            maven,
            java_eclasses,
        })
    }

    /// Check that every field can be written to a cache line and read back.
    pub fn validate(&self) -> Result<()> {
        let mut fields = vec![
            ("category", self.category.as_str()),
            ("pkg", self.pkg.as_str()),
            ("version", self.version.as_str()),
            ("slot", self.slot.as_str()),
        ];
        if let Some(flag) = &self.use_flag {
            fields.push(("useFlag", flag.as_str()));
        }
        if let Some(maven) = &self.maven {
            fields.push(("groupId", maven.group_id.as_str()));
            fields.push(("artifactId", maven.artifact_id.as_str()));
            fields.push(("mavenVersion", maven.version.as_str()));
        }
        fields.extend(self.java_eclasses.iter().map(|e| ("javaEclasses", e.as_str())));

        match fields.into_iter().find(|(_, value)| value.contains([':', '\n'])) {
            Some((field, value)) => Err(Error::InvalidCacheField {
                field,
                value: value.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// The Portage version with every `-rN` revision removed.
    pub fn bare_version(&self) -> String {
        strip_revision(&self.version)
    }
}

/// Serializes to the cache line format read by [`CacheItem::parse_line`].
impl fmt::Display for CacheItem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}:{}:",
            self.category,
            self.pkg,
            self.version,
            self.slot,
            self.use_flag.as_deref().unwrap_or_default()
        )?;
        match &self.maven {
            Some(m) => write!(f, "{}:{}:{}:", m.group_id, m.artifact_id, m.version)?,
            None => write!(f, ":::")?,
        }
        write!(f, "{}", self.java_eclasses.join(","))
    }
}

/// Remove `-r<digits>` revision markers from a Portage version.
fn strip_revision(version: &str) -> String {
    let mut out = String::with_capacity(version.len());
    let mut rest = version;

    while let Some(pos) = rest.find("-r") {
        let after = &rest[pos + 2..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        out.push_str(&rest[..pos]);
        if digits == 0 {
            out.push_str("-r");
        }
        rest = &after[digits..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_separator_in_field() {
        let mut item = CacheItem::parse_line("dev-java:foo:1.0:0::org.foo:foo:1.0:java-pkg-2").unwrap();
        assert!(item.validate().is_ok());

        item.slot = "${PV:0:1}".to_string();
        let err = item.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidCacheField { field: "slot", ref value } if value == "${PV:0:1}"));

        item.slot = "1".to_string();
        item.maven = Some(MavenArtifact::new("org.foo", "foo", "1.0:jar").unwrap());
        let err = item.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidCacheField { field: "mavenVersion", .. }));
    }

    #[test]
    fn parse_full_line() {
        let item = CacheItem::parse_line(
            "dev-java:commons-io:2.11.0-r1:1:doc:commons-io:commons-io:2.11.0:java-pkg-2,java-pkg-simple",
        )
        .unwrap();
        assert_eq!(item.category, "dev-java");
        assert_eq!(item.pkg, "commons-io");
        assert_eq!(item.version, "2.11.0-r1");
        assert_eq!(item.slot, "1");
        assert_eq!(item.use_flag.as_deref(), Some("doc"));
        let maven = item.maven.unwrap();
        assert_eq!(maven.group_id, "commons-io");
        assert_eq!(maven.version.to_string(), "2.11.0");
        assert_eq!(item.java_eclasses, vec!["java-pkg-2", "java-pkg-simple"]);
    }

    #[test]
    fn parse_minimal_line() {
        let item = CacheItem::parse_line("dev-java:foo:1.0:0").unwrap();
        assert_eq!(item.use_flag, None);
        assert_eq!(item.maven, None);
        assert!(item.java_eclasses.is_empty());
    }

    #[test]
    fn parse_line_without_coordinates() {
        let item = CacheItem::parse_line("dev-java:foo:1.0:0:::::java-pkg-2").unwrap();
        assert_eq!(item.maven, None);
        assert_eq!(item.java_eclasses, vec!["java-pkg-2"]);
    }

    #[test]
    fn parse_legacy_single_eclass() {
        let item =
            CacheItem::parse_line("dev-java:foo:1.0:0::org.foo:foo:1.0:java-pkg-opt-2").unwrap();
        assert_eq!(item.java_eclasses, vec!["java-pkg-opt-2"]);
    }

    #[test]
    fn partial_coordinates_rejected() {
        for line in [
            "dev-java:foo:1.0:0::org.foo",
            "dev-java:foo:1.0:0::org.foo:foo",
            "dev-java:foo:1.0:0::org.foo::1.0",
            "dev-java:foo:1.0:0:::foo:1.0",
        ] {
            assert!(
                matches!(
                    CacheItem::parse_line(line),
                    Err(Error::InvalidCacheLine { .. })
                ),
                "{line}"
            );
        }
    }

    #[test]
    fn short_and_long_lines_rejected() {
        assert!(CacheItem::parse_line("dev-java:foo:1.0").is_err());
        assert!(CacheItem::parse_line("a:b:c:d:e:f:g:1.0:h:i").is_err());
    }

    #[test]
    fn bad_maven_version_rejected() {
        let err = CacheItem::parse_line("dev-java:foo:1.0:0::org.foo:foo:latest").unwrap_err();
        assert!(matches!(err, Error::InvalidVersion(ref v) if v == "latest"));
    }

    #[test]
    fn display_matches_cache_format() {
        let line = "dev-java:commons-io:2.11.0-r1:1:doc:commons-io:commons-io:2.11.0:java-pkg-2,java-pkg-simple";
        assert_eq!(CacheItem::parse_line(line).unwrap().to_string(), line);
        let bare = CacheItem::parse_line("dev-java:foo:1.0:0").unwrap();
        assert_eq!(bare.to_string(), "dev-java:foo:1.0:0:::::");
    }

    #[test]
    fn strip_revision_markers() {
        assert_eq!(strip_revision("1.2.3"), "1.2.3");
        assert_eq!(strip_revision("1.2.3-r1"), "1.2.3");
        assert_eq!(strip_revision("1.2.3_pre1-r12"), "1.2.3_pre1");
        assert_eq!(strip_revision("1.0-rc"), "1.0-rc");
    }

    #[test]
    fn parse_coordinate() {
        let artifact = MavenArtifact::parse("org.ow2.asm:asm:9.2").unwrap();
        assert_eq!(artifact.artifact_id, "asm");
        assert_eq!(artifact.to_string(), "org.ow2.asm:asm:9.2");
    }

    #[test]
    fn parse_coordinate_invalid() {
        for s in ["org.ow2.asm:asm", "a:b:c:d", ":asm:9.2", "org:asm:", ""] {
            assert!(
                matches!(MavenArtifact::parse(s), Err(Error::InvalidCoordinate(_))),
                "{s}"
            );
        }
    }
}
