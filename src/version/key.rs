//! Ordering keys for loosely formatted version strings
//!
//! A version string is split into digit runs, letter runs, dots and dashes.
//! Digit runs are zero-padded so they compare numerically as strings, letter
//! runs are prefixed with `*` so that every pre-release tag sorts before the
//! terminal `*final` marker, and trailing zeros of each numeric series are
//! dropped so "2.4" and "2.4.0" produce the same key.
//!
//! Examples (oldest first):
//! - "2.4.dev1" < "2.4a1" < "2.4rc1" < "2.4" == "2.4.0" < "2.4-1" < "2.4.1"
//!
//! Pathological schemes can still collapse to imprecise keys; no input is rejected.

use std::fmt;
use std::iter;
use std::sync::LazyLock;

use regex::Regex;

static COMPONENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+|[a-z]+|\.|-").unwrap());

/// Width digit runs are padded to
const NUMERIC_WIDTH: usize = 8;

/// Appended to every key; pre-release tags sort before it, patch levels after it
const FINAL: &str = "*final";

/// Replacement for `-`, a patch-level separator
const FINAL_DASH: &str = "*final-";

const ZERO: &str = "00000000";

/// Comparable key derived from a version string
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionKey(Vec<String>);

impl VersionKey {
    pub fn tokens(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

impl From<&str> for VersionKey {
    fn from(version: &str) -> Self {
        parse_version(version)
    }
}

/// Convert a version string into a chronologically sortable key.
pub fn parse_version(version: &str) -> VersionKey {
    let lowered = version.to_lowercase();
    let mut parts: Vec<String> = Vec::new();

    for part in components(&lowered).chain(iter::once(FINAL.to_string())) {
        if part.starts_with('*') {
            // "-" directly before a pre-release tag carries no meaning
            if part.as_str() < FINAL {
                while parts.last().is_some_and(|p| p == FINAL_DASH) {
                    parts.pop();
                }
            }
            // Trailing zeros of the numeric series that just ended
            while parts.last().is_some_and(|p| p == ZERO) {
                parts.pop();
            }
        }
        parts.push(part);
    }

    VersionKey(parts)
}

/// Returns true if `candidate` is strictly newer than `current`.
pub fn is_newer(candidate: &str, current: &str) -> bool {
    parse_version(candidate) > parse_version(current)
}

/// Tokenize and classify, yielding padded digit runs and `*`-prefixed tags.
///
/// Text between recognised components (e.g. "+" or "_") is kept as a tag.
fn components(input: &str) -> impl Iterator<Item = String> + '_ {
    let mut pieces = Vec::new();
    let mut last = 0;
    for m in COMPONENT_RE.find_iter(input) {
        pieces.push(&input[last..m.start()]);
        pieces.push(m.as_str());
        last = m.end();
    }
    pieces.push(&input[last..]);

    pieces.into_iter().filter_map(classify)
}

fn classify(piece: &str) -> Option<String> {
    let piece = match piece {
        "pre" | "preview" | "rc" => "c",
        "dev" => "@",
        "-" => "final-",
        other => other,
    };

    if piece.is_empty() || piece == "." {
        return None;
    }

    if piece.starts_with(|c: char| c.is_ascii_digit()) {
        Some(format!("{:0>width$}", piece, width = NUMERIC_WIDTH))
    } else {
        Some(format!("*{}", piece))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2.4", "2.4.0")]
    #[case("1", "1.0.0.0")]
    #[case("1.0rc1", "1.0c1")]
    #[case("1.0pre1", "1.0c1")]
    #[case("1.0preview1", "1.0rc1")]
    #[case("1.0-rc1", "1.0rc1")]
    #[case("1.0RC1", "1.0rc1")]
    #[case("01.002", "1.2")]
    fn parse_version_treats_equivalent_spellings_as_equal(#[case] a: &str, #[case] b: &str) {
        assert_eq!(parse_version(a), parse_version(b));
    }

    #[rstest]
    #[case("2.4a1", "2.4")]
    #[case("2.4-1", "2.4.1")]
    #[case("2.4", "2.4-1")]
    #[case("1.9", "1.10")]
    #[case("2.0", "2.0.1")]
    #[case("1.0.dev1", "1.0a1")]
    #[case("1.0a1", "1.0b1")]
    #[case("1.0b2", "1.0rc1")]
    #[case("1.0rc1", "1.0")]
    #[case("1.0", "1.0post1")]
    #[case("0.9", "1.0")]
    #[case("1.0a1", "1.0a2")]
    fn parse_version_orders_older_before_newer(#[case] older: &str, #[case] newer: &str) {
        assert!(
            parse_version(older) < parse_version(newer),
            "expected {} < {}",
            parse_version(older),
            parse_version(newer)
        );
    }

    #[test]
    fn parse_version_produces_padded_tokens() {
        let key = parse_version("2.4a1");
        assert_eq!(
            key.tokens(),
            &["00000002", "00000004", "*a", "00000001", "*final"]
        );
    }

    #[test]
    fn parse_version_keeps_dash_as_patch_marker() {
        let key = parse_version("2.4-1");
        assert_eq!(
            key.tokens(),
            &["00000002", "00000004", "*final-", "00000001", "*final"]
        );
    }

    #[rstest]
    #[case("")]
    #[case("!!!")]
    #[case("..--..")]
    #[case("v1.2_beta+build.5")]
    #[case("１.２")]
    fn parse_version_accepts_malformed_input(#[case] input: &str) {
        let key = parse_version(input);
        assert_eq!(key.tokens().last().map(String::as_str), Some(FINAL));
        // Still totally ordered against a well-formed key
        let _ = key.cmp(&parse_version("1.0"));
    }

    #[test]
    fn is_newer_compares_through_keys() {
        assert!(is_newer("1.0", "0.9"));
        assert!(!is_newer("1.0", "1.0.0"));
        assert!(!is_newer("1.0", "2.0"));
    }
}
