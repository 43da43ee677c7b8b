//! Maven artifact version parsing and ordering
//!
//! A version string is decomposed the way Maven decomposes artifact versions:
//! `major.minor.incremental-buildNumber` or `major.minor.incremental-qualifier`
//! (also `major.minor.incremental.qualifier`). Strings that do not fit the
//! grammar keep all numeric fields absent and carry the whole text as the
//! qualifier. Absent numeric fields read as `0`.

use std::cmp::Ordering;
use std::fmt;

/// Numeric fields of a version, most significant first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionField {
    Major,
    Minor,
    Incremental,
    BuildNumber,
}

impl VersionField {
    /// All fields in order of significance
    pub const ALL: [VersionField; 4] = [
        VersionField::Major,
        VersionField::Minor,
        VersionField::Incremental,
        VersionField::BuildNumber,
    ];

    /// Returns the display name for this field
    pub fn display_name(&self) -> &'static str {
        match self {
            VersionField::Major => "Major",
            VersionField::Minor => "Minor",
            VersionField::Incremental => "Incremental",
            VersionField::BuildNumber => "BuildNumber",
        }
    }
}

impl fmt::Display for VersionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A version decomposed into numeric fields plus an optional qualifier
///
/// Ordering compares the numeric fields lexicographically and falls back to
/// the qualifier only to break ties. Equality agrees with ordering, so `1.0`
/// and `1.0.0` are the same version.
#[derive(Debug, Clone)]
pub struct VersionTuple {
    original: String,
    major: u32,
    minor: u32,
    incremental: u32,
    build_number: u32,
    qualifier: Option<String>,
}

impl VersionTuple {
    /// Parse a version string. Never fails: unparseable text becomes the qualifier.
    pub fn parse(version: &str) -> Self {
        let mut tuple = Self::empty(version);

        let (part1, part2) = match version.split_once('-') {
            Some((head, tail)) => (head, Some(tail)),
            None => (version, None),
        };

        if let Some(part2) = part2 {
            if part2.len() == 1 || !part2.starts_with('0') {
                match parse_int(part2) {
                    Some(build) => tuple.build_number = build,
                    None => tuple.qualifier = Some(part2.to_string()),
                }
            } else {
                tuple.qualifier = Some(part2.to_string());
            }
        }

        if !part1.contains('.') && !part1.starts_with('0') {
            match parse_int(part1) {
                Some(major) => tuple.major = major,
                None => return Self::qualifier_only(version),
            }
            return tuple;
        }

        match parse_dotted(part1) {
            Some(dotted) => {
                tuple.major = dotted.major;
                tuple.minor = dotted.minor;
                tuple.incremental = dotted.incremental;
                if let Some(qualifier) = dotted.qualifier {
                    tuple.qualifier = Some(qualifier.to_string());
                }
                tuple
            }
            None => Self::qualifier_only(version),
        }
    }

    fn empty(version: &str) -> Self {
        Self {
            original: version.to_string(),
            major: 0,
            minor: 0,
            incremental: 0,
            build_number: 0,
            qualifier: None,
        }
    }

    fn qualifier_only(version: &str) -> Self {
        Self {
            qualifier: Some(version.to_string()),
            ..Self::empty(version)
        }
    }

    /// The version text as it was published
    pub fn as_str(&self) -> &str {
        &self.original
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn incremental(&self) -> u32 {
        self.incremental
    }

    pub fn build_number(&self) -> u32 {
        self.build_number
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// Value of a numeric field (absent fields are 0)
    pub fn field(&self, field: VersionField) -> u32 {
        match field {
            VersionField::Major => self.major,
            VersionField::Minor => self.minor,
            VersionField::Incremental => self.incremental,
            VersionField::BuildNumber => self.build_number,
        }
    }

    fn numeric_fields(&self) -> (u32, u32, u32, u32) {
        (self.major, self.minor, self.incremental, self.build_number)
    }
}

struct Dotted<'a> {
    major: u32,
    minor: u32,
    incremental: u32,
    qualifier: Option<&'a str>,
}

/// Parse `major[.minor[.incremental[.qualifier]]]`; `None` if the text does not fit.
fn parse_dotted(part: &str) -> Option<Dotted<'_>> {
    if part.contains("..") || part.starts_with('.') || part.ends_with('.') {
        return None;
    }

    let mut tokens = part.split('.').filter(|t| !t.is_empty());
    let mut numbers = [0u32; 3];
    for slot in numbers.iter_mut() {
        match tokens.next() {
            Some(token) => *slot = parse_integer_token(token)?,
            None => break,
        }
    }

    let qualifier = tokens.next();
    if let Some(q) = qualifier {
        // a fourth numeric component is not part of the grammar
        if q.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }

    Some(Dotted {
        major: numbers[0],
        minor: numbers[1],
        incremental: numbers[2],
        qualifier,
    })
}

fn parse_integer_token(token: &str) -> Option<u32> {
    if token.len() > 1 && token.starts_with('0') {
        return None;
    }
    parse_int(token)
}

/// Numeric fields stop at `i32::MAX`; larger digit runs are not numbers
fn parse_int(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<i32>().ok().and_then(|n| u32::try_from(n).ok())
}

/// Rank of a qualifier for tie-breaking between numerically equal versions
fn qualifier_rank(qualifier: Option<&str>) -> u8 {
    let Some(qualifier) = qualifier else {
        return RELEASE_RANK;
    };
    let lower = qualifier.to_ascii_lowercase();
    let word = lower.trim_end_matches(|c: char| c.is_ascii_digit() || c == '.' || c == '-');
    match word {
        "alpha" | "a" => 0,
        "beta" | "b" => 1,
        "milestone" | "m" => 2,
        "rc" | "cr" => 3,
        "snapshot" => 4,
        "" | "ga" | "final" | "release" => RELEASE_RANK,
        "sp" => 6,
        _ => 7,
    }
}

const RELEASE_RANK: u8 = 5;

fn compare_qualifiers(a: Option<&str>, b: Option<&str>) -> Ordering {
    let (rank_a, rank_b) = (qualifier_rank(a), qualifier_rank(b));
    if rank_a == RELEASE_RANK && rank_b == RELEASE_RANK {
        return Ordering::Equal;
    }
    rank_a.cmp(&rank_b).then_with(|| {
        let a = a.map(str::to_ascii_lowercase).unwrap_or_default();
        let b = b.map(str::to_ascii_lowercase).unwrap_or_default();
        a.cmp(&b)
    })
}

impl Ord for VersionTuple {
    fn cmp(&self, other: &Self) -> Ordering {
        self.numeric_fields()
            .cmp(&other.numeric_fields())
            .then_with(|| compare_qualifiers(self.qualifier(), other.qualifier()))
    }
}

impl PartialOrd for VersionTuple {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for VersionTuple {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VersionTuple {}

impl fmt::Display for VersionTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

impl From<&str> for VersionTuple {
    fn from(version: &str) -> Self {
        Self::parse(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(version: &str) -> VersionTuple {
        VersionTuple::parse(version)
    }

    fn fields(version: &str) -> (u32, u32, u32, u32, Option<String>) {
        let t = v(version);
        (
            t.major(),
            t.minor(),
            t.incremental(),
            t.build_number(),
            t.qualifier().map(str::to_string),
        )
    }

    #[test]
    fn test_parse_full_version() {
        assert_eq!(fields("1.2.3"), (1, 2, 3, 0, None));
    }

    #[test]
    fn test_parse_short_versions() {
        assert_eq!(fields("7"), (7, 0, 0, 0, None));
        assert_eq!(fields("1.2"), (1, 2, 0, 0, None));
    }

    #[test]
    fn test_parse_build_number() {
        assert_eq!(fields("1.2.3-4"), (1, 2, 3, 4, None));
        assert_eq!(fields("2-1"), (2, 0, 0, 1, None));
    }

    #[test]
    fn test_parse_dash_qualifier() {
        assert_eq!(fields("1.2.3-RC1"), (1, 2, 3, 0, Some("RC1".to_string())));
        assert_eq!(
            fields("1.0-SNAPSHOT"),
            (1, 0, 0, 0, Some("SNAPSHOT".to_string()))
        );
    }

    #[test]
    fn test_parse_leading_zero_build_is_qualifier() {
        assert_eq!(fields("1.0-01"), (1, 0, 0, 0, Some("01".to_string())));
    }

    #[test]
    fn test_parse_dot_qualifier() {
        assert_eq!(
            fields("5.3.1.Final"),
            (5, 3, 1, 0, Some("Final".to_string()))
        );
        assert_eq!(
            fields("4.3.2.RELEASE"),
            (4, 3, 2, 0, Some("RELEASE".to_string()))
        );
    }

    #[test]
    fn test_parse_unrecognised_text_is_qualifier() {
        assert_eq!(fields("r09"), (0, 0, 0, 0, Some("r09".to_string())));
        assert_eq!(
            fields("1.2.3.4"),
            (0, 0, 0, 0, Some("1.2.3.4".to_string()))
        );
        assert_eq!(fields("1..2"), (0, 0, 0, 0, Some("1..2".to_string())));
        assert_eq!(fields("01.2"), (0, 0, 0, 0, Some("01.2".to_string())));
        assert_eq!(fields(".1"), (0, 0, 0, 0, Some(".1".to_string())));
    }

    #[test]
    fn test_parse_numbers_past_int_range_are_qualifiers() {
        assert_eq!(fields("2147483647"), (2147483647, 0, 0, 0, None));
        assert_eq!(
            fields("2147483648"),
            (0, 0, 0, 0, Some("2147483648".to_string()))
        );
        assert_eq!(
            fields("3000000000"),
            (0, 0, 0, 0, Some("3000000000".to_string()))
        );
        assert_eq!(
            fields("1.2147483648"),
            (0, 0, 0, 0, Some("1.2147483648".to_string()))
        );
        assert_eq!(
            fields("1.0-2147483648"),
            (1, 0, 0, 0, Some("2147483648".to_string()))
        );
    }

    #[test]
    fn test_parse_keeps_original_text() {
        assert_eq!(v("1.0.Final").as_str(), "1.0.Final");
        assert_eq!(v("1.0.Final").to_string(), "1.0.Final");
    }

    #[test]
    fn test_field_accessor() {
        let t = v("4.5.6-7");
        assert_eq!(t.field(VersionField::Major), 4);
        assert_eq!(t.field(VersionField::Minor), 5);
        assert_eq!(t.field(VersionField::Incremental), 6);
        assert_eq!(t.field(VersionField::BuildNumber), 7);
    }

    #[test]
    fn test_numeric_ordering() {
        assert!(v("1.0.0") < v("1.0.1"));
        assert!(v("1.9.0") < v("1.10.0"));
        assert!(v("1.2.3") < v("1.2.3-1"));
        assert!(v("10.0") > v("9.9.9"));
    }

    #[test]
    fn test_absent_fields_equal_zero() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("1"), v("1.0.0-0"));
    }

    #[test]
    fn test_qualifier_breaks_ties() {
        assert!(v("1.0-alpha1") < v("1.0-beta1"));
        assert!(v("1.0-beta1") < v("1.0-RC1"));
        assert!(v("1.0-RC1") < v("1.0-SNAPSHOT"));
        assert!(v("1.0-SNAPSHOT") < v("1.0"));
        assert!(v("1.0") < v("1.0-sp1"));
        assert!(v("1.0-RC1") < v("1.0-RC2"));
    }

    #[test]
    fn test_release_qualifiers_equal_plain_version() {
        assert_eq!(v("1.0.0.Final"), v("1.0.0"));
        assert_eq!(v("1.0.0.GA"), v("1.0.0.final"));
    }

    #[test]
    fn test_qualifier_never_outranks_numbers() {
        assert!(v("1.0.0-SNAPSHOT") > v("0.9.9"));
        assert!(v("1.0.1-alpha") > v("1.0.0.Final"));
    }

    #[test]
    fn test_sorting() {
        let mut versions = vec![v("2.0.0"), v("1.0.0"), v("1.5.0"), v("1.0.1"), v("1.0.0-RC1")];
        versions.sort();
        let ordered: Vec<&str> = versions.iter().map(VersionTuple::as_str).collect();
        assert_eq!(ordered, vec!["1.0.0-RC1", "1.0.0", "1.0.1", "1.5.0", "2.0.0"]);
    }

    #[test]
    fn test_version_field_display() {
        assert_eq!(VersionField::BuildNumber.to_string(), "BuildNumber");
        assert_eq!(VersionField::ALL[0], VersionField::Major);
    }
}
