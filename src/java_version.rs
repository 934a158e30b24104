use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use winnow::ascii::digit1;
use winnow::combinator::{opt, terminated};
use winnow::prelude::*;

use crate::error::{Error, Result};

/// Oldest Java feature release still supported, rendered in legacy form.
const LEGACY_FLOOR: &str = "1.8";

/// A Java platform version such as `1.8`, `11` or `17`.
///
/// Both the bare feature number and the legacy `1.N` form are accepted.
/// Anything up to and including 8 is rendered as `1.8`, which is the oldest
/// JDK the tree can build with.
///
/// # Examples
///
/// ```
/// use java_ebuilder::JavaVersion;
///
/// let old: JavaVersion = "1.6".parse().unwrap();
/// let new: JavaVersion = "11".parse().unwrap();
/// assert_eq!(old.to_string(), "1.8");
/// assert_eq!(new.feature(), 11);
/// assert!(old < new);
/// ```
#[derive(Debug, Clone)]
pub struct JavaVersion {
    feature: u32,
    display: String,
}

impl JavaVersion {
    /// The feature release number (`8` for `1.8`).
    pub fn feature(&self) -> u32 {
        self.feature
    }
}

impl FromStr for JavaVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let feature = parse_java_version
            .parse(s)
            .map_err(|_| Error::InvalidJavaVersion(s.to_string()))?;

        let display = if feature <= 8 {
            LEGACY_FLOOR.to_string()
        } else {
            s.to_string()
        };

        Ok(JavaVersion { feature, display })
    }
}

impl PartialEq for JavaVersion {
    fn eq(&self, other: &Self) -> bool {
        self.feature == other.feature
    }
}

impl Eq for JavaVersion {}

impl PartialOrd for JavaVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for JavaVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.feature.cmp(&other.feature)
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.display)
    }
}

fn parse_java_version(input: &mut &str) -> ModalResult<u32> {
    opt(terminated("1", '.')).parse_next(input)?;
    digit1.try_map(str::parse::<u32>).parse_next(input)
}
