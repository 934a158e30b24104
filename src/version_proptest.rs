//! Property-based tests for Maven version ordering and cache resolution.

#[cfg(test)]
mod proptest_tests {
    use std::cmp::Ordering;

    use crate::cache::{MavenCache, Resolution};
    use crate::item::{CacheItem, MavenArtifact};
    use crate::version::MavenVersion;
    use proptest::prelude::*;

    fn version_string() -> impl Strategy<Value = String> {
        (
            0u64..20,
            proptest::option::of(0u64..20),
            proptest::option::of(0u64..20),
            proptest::option::of("(alpha|beta|rc|SNAPSHOT|final)[0-9]?"),
        )
            .prop_map(|(major, minor, incremental, qualifier)| {
                let mut s = major.to_string();
                if let Some(minor) = minor {
                    s.push_str(&format!(".{minor}"));
                    if let Some(incremental) = incremental {
                        s.push_str(&format!(".{incremental}"));
                    }
                }
                if let Some(qualifier) = qualifier {
                    s.push_str(&format!("-{qualifier}"));
                }
                s
            })
    }

    fn parse(s: &str) -> MavenVersion {
        s.parse().unwrap()
    }

    proptest! {
        /// Property: generated versions always parse and keep their text
        #[test]
        fn version_parses_and_displays_raw(s in version_string()) {
            let v = parse(&s);
            prop_assert_eq!(v.to_string(), s);
        }

        /// Property: re-parsing the rendered version orders equal to the original
        #[test]
        fn reparse_is_idempotent(s in version_string()) {
            let v = parse(&s);
            prop_assert_eq!(parse(&v.to_string()).cmp(&v), Ordering::Equal);
        }

        /// Property: ordering is antisymmetric
        #[test]
        fn ordering_antisymmetric(a in version_string(), b in version_string()) {
            let (va, vb) = (parse(&a), parse(&b));
            prop_assert_eq!(va.cmp(&vb), vb.cmp(&va).reverse());
        }

        /// Property: ordering is transitive
        #[test]
        fn ordering_transitive(
            a in version_string(),
            b in version_string(),
            c in version_string(),
        ) {
            let mut v = [parse(&a), parse(&b), parse(&c)];
            v.sort();
            prop_assert!(v[0] <= v[1] && v[1] <= v[2]);
            prop_assert!(v[0] <= v[2]);
        }

        /// Property: equality agrees with ordering
        #[test]
        fn equality_matches_ordering(a in version_string(), b in version_string()) {
            let (va, vb) = (parse(&a), parse(&b));
            prop_assert_eq!(va == vb, va.cmp(&vb) == Ordering::Equal);
        }

        /// Property: a resolved package is never older than the request, and
        /// nothing is found only when every package is older
        #[test]
        fn resolve_never_goes_below_request(
            packaged in proptest::collection::vec(version_string(), 1..8),
            wanted in version_string(),
        ) {
            let items: Vec<CacheItem> = packaged
                .iter()
                .enumerate()
                .map(|(i, v)| CacheItem {
                    category: "dev-java".to_string(),
                    pkg: "foo".to_string(),
                    version: format!("{i}"),
                    slot: v.clone(),
                    use_flag: None,
                    maven: Some(MavenArtifact::new("org.foo", "foo", v).unwrap()),
                    java_eclasses: Vec::new(),
                })
                .collect();
            let cache = MavenCache::from_items(items);
            let wanted_version = parse(&wanted);

            match cache.resolve("org.foo", "foo", &wanted).unwrap() {
                Resolution::Found(atom) => {
                    // The slot carries the Maven version in this setup.
                    let slot = atom.rsplit_once(':').map(|(_, s)| s).unwrap();
                    prop_assert!(parse(slot) >= wanted_version);
                    let smaller_fit = packaged
                        .iter()
                        .map(|p| parse(p))
                        .filter(|p| *p >= wanted_version)
                        .any(|p| p < parse(slot));
                    prop_assert!(!smaller_fit);
                }
                Resolution::NoSuitableVersion => {
                    prop_assert!(packaged.iter().all(|p| parse(p) < wanted_version));
                }
                other => prop_assert!(false, "unexpected resolution {:?}", other),
            }
        }
    }
}
