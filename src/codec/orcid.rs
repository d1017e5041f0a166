//! ORCID identifier validation.
//!
//! An ORCID iD is sixteen characters in four dash-separated groups; the last
//! character is an ISO 7064 MOD 11-2 check character (`0-9` or `X`).

use serde::{Deserialize, Serialize};

use crate::codec::types::{CodecError, CodecResult};

const URL_PREFIXES: [&str; 3] = ["https://orcid.org/", "http://orcid.org/", "orcid.org/"];

/// A validated ORCID iD in canonical `dddd-dddd-dddd-dddX` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Orcid(String);

impl Orcid {
    /// Parse and validate an ORCID iD, bare or as an `orcid.org` URL.
    pub fn parse(input: &str) -> CodecResult<Self> {
        let trimmed = input.trim();
        let bare = URL_PREFIXES
            .iter()
            .find_map(|prefix| trimmed.strip_prefix(prefix))
            .unwrap_or(trimmed)
            .trim_end_matches('/')
            .to_ascii_uppercase();

        let digits = parse_digits(&bare).ok_or_else(|| CodecError::InvalidOrcidFormat(input.to_string()))?;

        let expected = check_character(&digits[..15]);
        if bare.chars().last() != Some(expected) {
            return Err(CodecError::InvalidOrcidChecksum {
                orcid: bare,
                expected,
            });
        }

        Ok(Self(bare))
    }

    /// The canonical identifier, e.g. `0000-0002-1825-0097`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Split `dddd-dddd-dddd-dddX` into its sixteen digit values (X counts as 10).
fn parse_digits(bare: &str) -> Option<Vec<u32>> {
    let bytes = bare.as_bytes();
    if bytes.len() != 19 {
        return None;
    }

    let mut digits = Vec::with_capacity(16);
    for (i, &b) in bytes.iter().enumerate() {
        match (i, b) {
            (4 | 9 | 14, b'-') => {}
            (4 | 9 | 14, _) => return None,
            (18, b'X') => digits.push(10),
            (_, b'0'..=b'9') => digits.push(u32::from(b - b'0')),
            _ => return None,
        }
    }
    Some(digits)
}

/// ISO 7064 MOD 11-2 check character over the first fifteen digits.
fn check_character(digits: &[u32]) -> char {
    let total = digits.iter().fold(0u32, |total, d| (total + d) * 2);
    match (12 - total % 11) % 11 {
        10 => 'X',
        n => char::from_digit(n, 10).unwrap_or('0'),
    }
}

impl std::fmt::Display for Orcid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Orcid {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Orcid {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Orcid> for String {
    fn from(orcid: Orcid) -> Self {
        orcid.0
    }
}
