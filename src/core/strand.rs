//! The strand indicator carried by an interval record.

use std::str::FromStr;

/// An error related to the parsing of a strand.
#[derive(Debug, PartialEq, Eq)]
pub struct ParseStrandError(String);

impl std::fmt::Display for ParseStrandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse strand error: {} is not a valid strand", self.0)
    }
}

impl std::error::Error for ParseStrandError {}

/// The strand of an interval record.
///
/// Interval records carry an `Option<Strand>`: a column value that is neither
/// `+` nor `-` (including an absent column) is treated as no strand at all,
/// which leaves the interval-relative offsets untransformed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Strand {
    /// The positive strand (`+`).
    Positive,
    /// The negative strand (`-`).
    Negative,
}

impl Strand {
    /// Parses a strand leniently from a table field.
    ///
    /// Anything other than `+` or `-` yields [`None`] rather than an error:
    /// absence of a recognizable strand is part of the data model, not a
    /// malformed row.
    ///
    /// # Examples
    ///
    /// ```
    /// use metmatch::core::Strand;
    ///
    /// assert_eq!(Strand::lenient("+"), Some(Strand::Positive));
    /// assert_eq!(Strand::lenient("-"), Some(Strand::Negative));
    /// assert_eq!(Strand::lenient("."), None);
    /// assert_eq!(Strand::lenient(""), None);
    /// ```
    pub fn lenient(s: &str) -> Option<Strand> {
        match s {
            "+" => Some(Strand::Positive),
            "-" => Some(Strand::Negative),
            _ => None,
        }
    }
}

impl FromStr for Strand {
    type Err = ParseStrandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strand::lenient(s).ok_or_else(|| ParseStrandError(s.to_string()))
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strand::Positive => write!(f, "+"),
            Strand::Negative => write!(f, "-"),
        }
    }
}
