//! Expansion of the `SLOT` value captured from an ebuild.
//!
//! Ebuilds frequently compute their slot from the package version instead of
//! spelling it out. Without a shell only a handful of shapes can be resolved:
//! plain variable references, the `${PV:start:len}` substring expansion, and
//! the `get_version_component_range` / `ver_cut` helpers with an `A-B` range.

use std::collections::HashMap;

use winnow::ascii::digit1;
use winnow::combinator::{alt, delimited, separated_pair};
use winnow::prelude::*;

/// Replace `$NAME` and `${NAME}` references to `name` with `value`.
pub(crate) fn substitute(input: &str, name: &str, value: &str) -> String {
    input
        .replace(&format!("${{{name}}}"), value)
        .replace(&format!("${name}"), value)
}

/// Expand a raw slot using the package version and the ebuild variables.
///
/// `pv` is the package version without revision. Unresolvable expressions
/// are returned as they are.
pub(crate) fn expand_slot(slot: &str, pv: &str, variables: &HashMap<String, String>) -> String {
    let mut result = substitute(slot, "PV", pv);

    if result.contains('$') {
        // Longer names first so that `$PN` is not eaten by a `$P` variable.
        let mut names: Vec<&String> = variables.keys().collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        for name in names {
            result = substitute(&result, name, &variables[name]);
        }
    }

    if result.contains('$') {
        if let Ok((start, len)) = pv_substring.parse(result.as_str()) {
            result = substring(pv, start, len);
        } else if let Ok((start, end)) = component_range.parse(result.as_str()) {
            result = version_components(pv, start, end);
        }
    }

    result
}

/// Bash `${PV:start:len}` semantics, clamped to the string.
fn substring(pv: &str, start: usize, len: usize) -> String {
    pv.chars().skip(start).take(len).collect()
}

/// Join the 1-indexed dot-separated components `start..=end`, padding with `0`.
fn version_components(pv: &str, start: usize, end: usize) -> String {
    let parts: Vec<&str> = pv.split('.').collect();
    (start..=end)
        .map(|i| parts.get(i - 1).copied().unwrap_or("0"))
        .collect::<Vec<_>>()
        .join(".")
}

// Winnow parsers

fn index(input: &mut &str) -> ModalResult<usize> {
    digit1.try_map(str::parse::<usize>).parse_next(input)
}

/// `${PV:start:len}`
fn pv_substring(input: &mut &str) -> ModalResult<(usize, usize)> {
    delimited("${PV:", separated_pair(index, ':', index), '}').parse_next(input)
}

/// `$(get_version_component_range A-B)` or `$(ver_cut A-B)`, with `1 <= A <= B`.
fn component_range(input: &mut &str) -> ModalResult<(usize, usize)> {
    delimited(
        ("$(", alt(("get_version_component_range ", "ver_cut "))),
        separated_pair(index, '-', index),
        ')',
    )
    .verify(|range: &(usize, usize)| range.0 >= 1 && range.0 <= range.1)
    .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn plain_slot_unchanged() {
        assert_eq!(expand_slot("2", "2.5.1", &HashMap::new()), "2");
    }

    #[test]
    fn pv_reference() {
        assert_eq!(expand_slot("$PV", "2.5.1", &HashMap::new()), "2.5.1");
        assert_eq!(expand_slot("${PV}", "2.5.1", &HashMap::new()), "2.5.1");
    }

    #[test]
    fn variable_reference() {
        let v = vars(&[("MY_SLOT", "3"), ("MY", "x")]);
        assert_eq!(expand_slot("$MY_SLOT", "1.0", &v), "3");
        assert_eq!(expand_slot("${MY_SLOT}", "1.0", &v), "3");
    }

    #[test]
    fn pv_substring_expansion() {
        assert_eq!(expand_slot("${PV:0:3}", "2.5.1", &HashMap::new()), "2.5");
        assert_eq!(expand_slot("${PV:2:10}", "2.5", &HashMap::new()), "5");
    }

    #[test]
    fn component_range_expansion() {
        let none = HashMap::new();
        assert_eq!(
            expand_slot("$(get_version_component_range 1-2)", "2.5.1", &none),
            "2.5"
        );
        assert_eq!(expand_slot("$(ver_cut 1-3)", "4.1", &none), "4.1.0");
        assert_eq!(expand_slot("$(ver_cut 2-2)", "4.1.7", &none), "1");
    }

    #[test]
    fn variable_then_component_range() {
        let v = vars(&[("SLOT_RANGE", "1-2")]);
        assert_eq!(expand_slot("$(ver_cut ${SLOT_RANGE})", "9.3.4", &v), "9.3");
    }

    #[test]
    fn unresolvable_left_alone() {
        let none = HashMap::new();
        assert_eq!(expand_slot("$(ver_cut 0-2)", "1.2", &none), "$(ver_cut 0-2)");
        assert_eq!(expand_slot("$(ver_cut 1)", "1.2", &none), "$(ver_cut 1)");
        assert_eq!(expand_slot("${UNKNOWN}", "1.2", &none), "${UNKNOWN}");
    }

    #[test]
    fn substitute_both_forms() {
        assert_eq!(substitute("$PN-${PN}", "PN", "foo"), "foo-foo");
    }
}
