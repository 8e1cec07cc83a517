//! Version string ordering.
//!
//! Unraid and plugin versions are free-form (`6.12.0-rc1`, `2024.01.05`, `6.10`), so they are
//! compared the way the web UI has always compared them: segment by segment, numbers
//! numerically, and pre-release markers ordered `dev < alpha < beta < RC < release < pl`.

use std::cmp::Ordering;

/// Special forms in match order. The first prefix match wins.
const SPECIAL_FORMS: &[(&str, i8)] = &[
    ("dev", 0),
    ("alpha", 1),
    ("a", 1),
    ("beta", 2),
    ("b", 2),
    ("RC", 3),
    ("rc", 3),
    ("#", 4),
    ("pl", 5),
    ("p", 5),
];

fn special_rank(form: &str) -> i8 {
    SPECIAL_FORMS
        .iter()
        .find(|(name, _)| form.starts_with(name))
        .map(|(_, rank)| *rank)
        .unwrap_or(-6)
}

fn is_numeric(part: &str) -> bool {
    part.bytes().next().is_some_and(|b| b.is_ascii_digit())
}

/// Splits a version into canonical segments.
///
/// Every character other than an ASCII letter or digit acts as a separator, and a separator
/// is implied wherever the string switches between digits and non-digits.
fn canonicalize(version: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut last_digit: Option<bool> = None;

    for c in version.chars() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
            last_digit = None;
            continue;
        }

        let digit = c.is_ascii_digit();
        if last_digit.is_some_and(|prev| prev != digit) && !current.is_empty() {
            parts.push(std::mem::take(&mut current));
        }
        current.push(c);
        last_digit = Some(digit);
    }

    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_parts(a: &str, b: &str) -> Ordering {
    match (is_numeric(a), is_numeric(b)) {
        (true, true) => compare_numeric(a, b),
        (false, false) => special_rank(a).cmp(&special_rank(b)),
        (true, false) => special_rank("#").cmp(&special_rank(b)),
        (false, true) => special_rank(a).cmp(&special_rank("#")),
    }
}

/// Compares two version strings.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use ca_utils::version::version_compare;
///
/// assert_eq!(version_compare("6.12.0-rc1", "6.12.0"), Ordering::Less);
/// assert_eq!(version_compare("6.10", "6.9.2"), Ordering::Greater);
/// ```
pub fn version_compare(a: &str, b: &str) -> Ordering {
    let left = canonicalize(a);
    let right = canonicalize(b);

    for (l, r) in left.iter().zip(right.iter()) {
        let ord = compare_parts(l, r);
        if ord != Ordering::Equal {
            return ord;
        }
    }

    match left.len().cmp(&right.len()) {
        Ordering::Equal => Ordering::Equal,
        Ordering::Greater => {
            let rest = &left[right.len()];
            if is_numeric(rest) {
                Ordering::Greater
            } else {
                special_rank(rest).cmp(&special_rank("#"))
            }
        }
        Ordering::Less => {
            let rest = &right[left.len()];
            if is_numeric(rest) {
                Ordering::Less
            } else {
                special_rank("#").cmp(&special_rank(rest))
            }
        }
    }
}

pub fn version_gt(a: &str, b: &str) -> bool {
    version_compare(a, b) == Ordering::Greater
}

pub fn version_lt(a: &str, b: &str) -> bool {
    version_compare(a, b) == Ordering::Less
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize() {
        assert_eq!(canonicalize("6.12.0-rc1"), vec!["6", "12", "0", "rc", "1"]);
        assert_eq!(canonicalize("1.0beta2"), vec!["1", "0", "beta", "2"]);
        assert_eq!(canonicalize("2024.01.05"), vec!["2024", "01", "05"]);
        assert!(canonicalize("").is_empty());
    }

    #[test]
    fn test_numeric_segments() {
        assert_eq!(version_compare("7.0.0", "6.0.0"), Ordering::Greater);
        assert_eq!(version_compare("6.5.0", "7.0.0"), Ordering::Less);
        assert_eq!(version_compare("6.10.0", "6.9.2"), Ordering::Greater);
        assert_eq!(version_compare("7.0.0", "7.0.0"), Ordering::Equal);
        assert_eq!(version_compare("2024.01.05", "2024.1.5"), Ordering::Equal);
    }

    #[test]
    fn test_length_mismatch() {
        assert_eq!(version_compare("6.10", "6.10.0"), Ordering::Less);
        assert_eq!(version_compare("6.0", "6.0.1"), Ordering::Less);
        assert_eq!(version_compare("6.12.0", "6.12.0-rc1"), Ordering::Greater);
        assert_eq!(version_compare("1.0", "1.0pl1"), Ordering::Less);
    }

    #[test]
    fn test_special_forms() {
        assert_eq!(version_compare("1.0dev", "1.0alpha"), Ordering::Less);
        assert_eq!(version_compare("1.0alpha", "1.0beta"), Ordering::Less);
        assert_eq!(version_compare("1.0b1", "1.0beta1"), Ordering::Equal);
        assert_eq!(version_compare("6.10.0-beta4", "6.10.0-rc1"), Ordering::Less);
        assert_eq!(version_compare("1.0RC1", "1.0rc1"), Ordering::Equal);
        assert_eq!(version_compare("1.0-foo", "1.0-dev"), Ordering::Less);
    }

    #[test]
    fn test_symbols_are_separators() {
        assert_eq!(canonicalize("1.0#1"), vec!["1", "0", "1"]);
        assert_eq!(canonicalize("2.1~beta#2"), vec!["2", "1", "beta", "2"]);
        assert_eq!(version_compare("1.0#1", "1.0.1"), Ordering::Equal);
        assert_eq!(version_compare("1.0#beta", "1.0.beta"), Ordering::Equal);
        assert_eq!(version_compare("1#", "1"), Ordering::Equal);
    }

    #[test]
    fn test_predicates() {
        assert!(version_gt("8.0.0", "7.5.0"));
        assert!(!version_gt("7.5.0", "7.5.0"));
        assert!(version_lt("6.1", "6.10.0-beta4"));
    }
}
