use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use winnow::ascii::digit1;
use winnow::combinator::{alt, opt, preceded};
use winnow::prelude::*;
use winnow::token::{one_of, rest};

use crate::error::{Error, Result};

/// A Maven version, reduced to the components used for matching.
///
/// Maven projects are inconsistent about version formatting, so the parser
/// accepts a loose grammar: an optional `v`/`r` marker, a major number, an
/// optional `.minor`, an optional incremental number introduced by `.`, `b`
/// or `beta`, and finally an arbitrary qualifier tail after an optional `.`
/// or `-` separator.
///
/// Version ranges such as `[1.0,2.0)` are reduced to their lower bound.
///
/// Ordering compares `(major, minor, incremental, qualifier)`, where the
/// qualifier is compared as a plain lowercase string. This is not semver:
/// `1.0-alpha` sorts after `1.0-9` and after `1.0`.
///
/// # Examples
///
/// ```
/// use java_ebuilder::MavenVersion;
///
/// let v: MavenVersion = "2.3.1-SNAPSHOT".parse().unwrap();
/// assert_eq!(v.major(), 2);
/// assert_eq!(v.minor(), 3);
/// assert_eq!(v.incremental(), 1);
/// assert_eq!(v.qualifier(), "snapshot");
///
/// let floor: MavenVersion = "[1.5,2.0)".parse().unwrap();
/// assert!(floor < v);
/// ```
#[derive(Debug, Clone)]
pub struct MavenVersion {
    major: u64,
    minor: u64,
    incremental: u64,
    qualifier: String,
    raw: String,
}

impl MavenVersion {
    /// Major version number.
    pub fn major(&self) -> u64 {
        self.major
    }

    /// Minor version number, `0` when absent.
    pub fn minor(&self) -> u64 {
        self.minor
    }

    /// Incremental version number, `0` when absent.
    pub fn incremental(&self) -> u64 {
        self.incremental
    }

    /// Lowercased qualifier, empty when absent.
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// The string this version was parsed from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn key(&self) -> (u64, u64, u64, &str) {
        (self.major, self.minor, self.incremental, &self.qualifier)
    }
}

impl FromStr for MavenVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let effective = range_lower_bound(s).unwrap_or(s);

        let (major, minor, incremental, qualifier) = parse_version
            .parse(effective)
            .map_err(|_| Error::InvalidVersion(s.to_string()))?;

        Ok(MavenVersion {
            major,
            minor: minor.unwrap_or(0),
            incremental: incremental.unwrap_or(0),
            qualifier: qualifier.to_lowercase(),
            raw: s.to_string(),
        })
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for MavenVersion {}

impl Hash for MavenVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Extract the lower bound of a `[low,high]`-style range.
///
/// Any combination of `[`/`(` and `]`/`)` is accepted. The split happens on the
/// last comma, so the upper bound never leaks into the lower one.
fn range_lower_bound(s: &str) -> Option<&str> {
    let inner = s
        .strip_prefix(['[', '('])?
        .strip_suffix([']', ')'])?;
    inner.rsplit_once(',').map(|(low, _)| low)
}

// Winnow parsers

fn number(input: &mut &str) -> ModalResult<u64> {
    digit1.try_map(str::parse::<u64>).parse_next(input)
}

type VersionParts<'s> = (u64, Option<u64>, Option<u64>, &'s str);

fn parse_version<'s>(input: &mut &'s str) -> ModalResult<VersionParts<'s>> {
    opt(one_of(['v', 'r'])).parse_next(input)?;
    let major = number.parse_next(input)?;
    let minor = opt(preceded('.', number)).parse_next(input)?;
    let incremental = opt(preceded(alt((".", "beta", "b")), number)).parse_next(input)?;
    opt(one_of(['.', '-'])).parse_next(input)?;
    let qualifier = rest.parse_next(input)?;
    Ok((major, minor, incremental, qualifier))
}
