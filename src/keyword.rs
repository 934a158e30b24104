use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Stability level for an architecture keyword.
///
/// See [PMS 7.3.3](https://projects.gentoo.org/pms/9/pms.html#keywords).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    /// The package is stable on this architecture (e.g. `amd64`).
    Stable,
    /// The package is testing/unstable on this architecture (e.g. `~amd64`).
    Testing,
    /// The package is disabled on this architecture (e.g. `-amd64`).
    Disabled,
    /// All architectures are disabled (`-*`).
    DisabledAll,
}

impl Stability {
    /// Precedence when several forms of the same keyword meet in a set.
    fn strength(self) -> u8 {
        match self {
            Stability::Testing => 0,
            Stability::Stable => 1,
            Stability::Disabled | Stability::DisabledAll => 2,
        }
    }
}

/// A single architecture keyword entry, as passed in `KEYWORDS`.
///
/// See [PMS 7.3.3](https://projects.gentoo.org/pms/9/pms.html#keywords).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Keyword {
    /// Architecture name (e.g. `amd64`, `arm64`, `amd64-linux`).
    pub arch: String,
    /// Stability classification.
    pub stability: Stability,
}

impl Keyword {
    /// Parse a space-separated keyword list.
    ///
    /// # Examples
    ///
    /// ```
    /// use java_ebuilder::{Keyword, Stability};
    ///
    /// let kws = Keyword::parse_line("amd64 ~arm64 -x86 -*").unwrap();
    /// assert_eq!(kws.len(), 4);
    /// assert_eq!(kws[1].stability, Stability::Testing);
    /// assert_eq!(kws[3].stability, Stability::DisabledAll);
    /// ```
    pub fn parse_line(input: &str) -> Result<Vec<Keyword>> {
        input
            .split_whitespace()
            .map(|token| token.parse())
            .collect()
    }

    /// The `(os, arch)` pair keywords are ordered by.
    fn sort_key(&self) -> (&str, &str) {
        split_arch(&self.arch)
    }
}

impl FromStr for Keyword {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidKeyword("empty keyword".to_string()));
        }

        if s == "-*" {
            return Ok(Keyword {
                arch: "*".to_string(),
                stability: Stability::DisabledAll,
            });
        }

        let (arch, stability) = if let Some(arch) = s.strip_prefix('~') {
            (arch, Stability::Testing)
        } else if let Some(arch) = s.strip_prefix('-') {
            (arch, Stability::Disabled)
        } else {
            (s, Stability::Stable)
        };

        if arch.is_empty() || arch.starts_with(['~', '-']) {
            return Err(Error::InvalidKeyword(s.to_string()));
        }

        Ok(Keyword {
            arch: arch.to_string(),
            stability,
        })
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.stability {
            Stability::Stable => write!(f, "{}", self.arch),
            Stability::Testing => write!(f, "~{}", self.arch),
            Stability::Disabled => write!(f, "-{}", self.arch),
            Stability::DisabledAll => write!(f, "-*"),
        }
    }
}

/// Split an arch name into `(os, arch)`, the os defaulting to `0`.
fn split_arch(arch: &str) -> (&str, &str) {
    match arch.split_once('-') {
        Some((arch, os)) => (os, arch),
        None => ("0", arch),
    }
}

/// Order two keyword strings the way repoman sorts `KEYWORDS`.
///
/// The stability marker is ignored, so `amd64`, `~amd64` and `-amd64` compare
/// equal. Prefix keywords are grouped by their OS suffix first and by
/// architecture second, keeping plain architectures ahead of e.g. `-linux`
/// ones.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use java_ebuilder::compare_keywords;
///
/// assert_eq!(compare_keywords("~amd64", "-amd64"), Ordering::Equal);
/// assert_eq!(compare_keywords("x86", "amd64-linux"), Ordering::Less);
/// ```
pub fn compare_keywords(a: &str, b: &str) -> Ordering {
    fn strip(s: &str) -> &str {
        s.strip_prefix(['-', '~']).unwrap_or(s)
    }

    split_arch(strip(a)).cmp(&split_arch(strip(b)))
}

/// A sorted set of keywords holding at most one form per architecture.
///
/// Adding `-X` replaces `X` and `~X`, adding `X` replaces `~X`, and `~X` is
/// only kept when neither of the other forms is present.
///
/// # Examples
///
/// ```
/// use java_ebuilder::KeywordSet;
///
/// let mut set: KeywordSet = "~amd64 x86 ~amd64-linux".parse().unwrap();
/// set.extend("amd64 ~x86".parse::<KeywordSet>().unwrap());
/// assert_eq!(set.to_string(), "amd64 x86 ~amd64-linux");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    // (os, arch) -> keyword
    entries: BTreeMap<(String, String), Keyword>,
}

impl KeywordSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a keyword, returning whether the set changed.
    pub fn insert(&mut self, keyword: Keyword) -> bool {
        let (os, arch) = keyword.sort_key();
        let key = (os.to_string(), arch.to_string());

        match self.entries.get(&key) {
            Some(existing) if existing == &keyword => false,
            Some(existing) if existing.stability.strength() > keyword.stability.strength() => {
                false
            }
            _ => {
                self.entries.insert(key, keyword);
                true
            }
        }
    }

    /// Look up the form currently held for an architecture.
    pub fn get(&self, arch: &str) -> Option<&Keyword> {
        let (os, arch) = split_arch(arch);
        self.entries.get(&(os.to_string(), arch.to_string()))
    }

    /// Iterate the keywords in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Extend<Keyword> for KeywordSet {
    fn extend<T: IntoIterator<Item = Keyword>>(&mut self, iter: T) {
        for keyword in iter {
            self.insert(keyword);
        }
    }
}

impl FromIterator<Keyword> for KeywordSet {
    fn from_iter<T: IntoIterator<Item = Keyword>>(iter: T) -> Self {
        let mut set = KeywordSet::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for KeywordSet {
    type Item = Keyword;
    type IntoIter = std::collections::btree_map::IntoValues<(String, String), Keyword>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

impl FromStr for KeywordSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Keyword::parse_line(s)?.into_iter().collect())
    }
}

impl fmt::Display for KeywordSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, keyword) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{keyword}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(s: &str) -> Keyword {
        s.parse().unwrap()
    }

    #[test]
    fn parse_stable() {
        let kw = kw("amd64");
        assert_eq!(kw.arch, "amd64");
        assert_eq!(kw.stability, Stability::Stable);
    }

    #[test]
    fn parse_testing() {
        let kw = kw("~arm64");
        assert_eq!(kw.arch, "arm64");
        assert_eq!(kw.stability, Stability::Testing);
    }

    #[test]
    fn parse_disabled() {
        let kw = kw("-x86");
        assert_eq!(kw.arch, "x86");
        assert_eq!(kw.stability, Stability::Disabled);
    }

    #[test]
    fn parse_disabled_all() {
        let kw = kw("-*");
        assert_eq!(kw.arch, "*");
        assert_eq!(kw.stability, Stability::DisabledAll);
    }

    #[test]
    fn parse_prefix_keyword() {
        let kw = kw("~amd64-linux");
        assert_eq!(kw.arch, "amd64-linux");
        assert_eq!(kw.stability, Stability::Testing);
    }

    #[test]
    fn display_round_trip() {
        for s in ["amd64", "~arm64", "-x86", "-*", "~x64-macos"] {
            assert_eq!(kw(s).to_string(), s);
        }
    }

    #[test]
    fn invalid_keywords() {
        for s in ["", "~", "-", "~-amd64", "-~x86"] {
            assert!(s.parse::<Keyword>().is_err(), "{s:?} should be rejected");
        }
    }

    #[test]
    fn compare_ignores_stability_marker() {
        assert_eq!(compare_keywords("amd64", "~amd64"), Ordering::Equal);
        assert_eq!(compare_keywords("-amd64", "amd64"), Ordering::Equal);
    }

    #[test]
    fn compare_by_suffix_then_arch() {
        assert_eq!(compare_keywords("amd64", "x86"), Ordering::Less);
        assert_eq!(compare_keywords("x86", "amd64-linux"), Ordering::Less);
        assert_eq!(
            compare_keywords("x64-macos", "amd64-linux"),
            Ordering::Greater
        );
        assert_eq!(
            compare_keywords("amd64-linux", "x86-linux"),
            Ordering::Less
        );
    }

    #[test]
    fn set_sorted_like_compare_keywords() {
        let set: KeywordSet = "x64-macos ~x86 amd64-linux arm64 ~amd64"
            .parse()
            .unwrap();
        let rendered: Vec<String> = set.iter().map(|k| k.to_string()).collect();
        let mut sorted = rendered.clone();
        sorted.sort_by(|a, b| compare_keywords(a, b));
        assert_eq!(rendered, sorted);
        assert_eq!(set.to_string(), "~amd64 arm64 ~x86 amd64-linux x64-macos");
    }

    #[test]
    fn disabled_evicts_other_forms() {
        let mut set: KeywordSet = "amd64 ~amd64".parse().unwrap();
        assert!(set.insert(kw("-amd64")));
        assert_eq!(set.len(), 1);
        assert_eq!(set.to_string(), "-amd64");
    }

    #[test]
    fn stable_evicts_testing() {
        let mut set: KeywordSet = "~amd64".parse().unwrap();
        assert!(set.insert(kw("amd64")));
        assert_eq!(set.get("amd64").unwrap().stability, Stability::Stable);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn testing_does_not_replace_stronger_forms() {
        let mut set: KeywordSet = "amd64 -x86".parse().unwrap();
        assert!(!set.insert(kw("~amd64")));
        assert!(!set.insert(kw("~x86")));
        assert_eq!(set.to_string(), "amd64 -x86");
    }

    #[test]
    fn stable_does_not_replace_disabled() {
        let mut set: KeywordSet = "-amd64".parse().unwrap();
        assert!(!set.insert(kw("amd64")));
        assert_eq!(set.to_string(), "-amd64");
    }

    #[test]
    fn duplicate_insert_is_noop() {
        let mut set: KeywordSet = "~arm64".parse().unwrap();
        assert!(!set.insert(kw("~arm64")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn empty_set() {
        let set: KeywordSet = "".parse().unwrap();
        assert!(set.is_empty());
        assert_eq!(set.to_string(), "");
    }
}
