//! Maven to Portage dependency resolution for Gentoo Java packaging.
//!
//! Generating an ebuild from a Maven project means translating every Maven
//! dependency (`groupId:artifactId:version`) into a Portage dependency atom.
//! This crate builds the lookup table for that translation by scanning
//! Portage trees for ebuilds that inherit a Java eclass, stores it in a
//! colon-separated cache file, and answers lookups against it.
//!
//! # Overview
//!
//! - [`ScanSession`] walks `<category>/<package>/<package>-<version>.ebuild`
//!   and extracts [`EbuildFacts`] from each Java ebuild, preferring the slot
//!   recorded in `metadata/md5-cache` ([`CachedMetadata`]).
//! - [`write_cache`] stores the resulting [`CacheItem`]s and
//!   [`MavenCache::load`] reads them back.
//! - [`MavenCache::resolve`] picks the smallest packaged version satisfying a
//!   request, using [`MavenVersion`] ordering.
//!
//! [`JavaVersion`] and [`KeywordSet`] cover the remaining value types an
//! ebuild generator needs.
//!
//! # Examples
//!
//! ```
//! use java_ebuilder::{MavenCache, Resolution};
//!
//! let input = "\
//! 1.1
//! dev-java:junit:4.13.2:4::junit:junit:4.13.2:java-pkg-2
//! ";
//! let cache = MavenCache::read(input.as_bytes()).unwrap();
//! let found = cache.resolve("junit", "junit", "4.12").unwrap();
//! assert_eq!(found.to_string(), ">=dev-java/junit-4.13.2:4");
//! assert_eq!(
//!     cache.resolve("org.hamcrest", "hamcrest", "2.2").unwrap(),
//!     Resolution::GroupNotFound
//! );
//! ```

mod cache;
pub mod defaults;
mod ebuild;
mod error;
mod item;
mod java_version;
mod keyword;
mod metadata;
mod scanner;
mod slot;
mod version;

#[cfg(test)]
mod version_proptest;

// Re-export public types
pub use cache::{
    write_cache, write_items, MavenCache, Resolution, CACHE_VERSION, LEGACY_CACHE_VERSION,
};
pub use ebuild::{bare_pv, is_java_eclass, EbuildFacts};
pub use error::{Error, Result};
pub use item::{CacheItem, MavenArtifact};
pub use java_version::JavaVersion;
pub use keyword::{compare_keywords, Keyword, KeywordSet, Stability};
pub use metadata::{md5_cache_path, CachedMetadata};
pub use scanner::ScanSession;
pub use version::MavenVersion;
