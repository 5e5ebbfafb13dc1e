//! A measured position within a genomic table.
//!
//! Positions are numeric and must be finite. They are parsed leniently from
//! table fields (`"105"` and `"105.0"` both parse to the same position), but a
//! field that fails numeric coercion is a row-drop policy decision for the
//! caller, never a silent fallback.

use std::hash::Hash;
use std::hash::Hasher;
use std::str::FromStr;

/// An error related to a position.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// The value is not a finite number.
    NotFinite(f64),
    /// Could not parse a position from the given value.
    ParseError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NotFinite(value) => write!(f, "position is not finite: {}", value),
            Error::ParseError(value) => {
                write!(f, "could not parse position from the value: {}", value)
            }
        }
    }
}

impl std::error::Error for Error {}

/// A position within a genomic table.
///
/// A position is a finite numeric value. Positions are totally ordered and
/// hashable so that they can key frequency maps and be sorted into match
/// results.
#[derive(Clone, Copy, Debug)]
pub struct Position(f64);

impl Position {
    /// Attempts to create a new [`Position`].
    ///
    /// Non-finite values are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use metmatch::core::position::Error;
    /// use metmatch::core::Position;
    ///
    /// let position = Position::try_new(105.0)?;
    /// assert_eq!(position.get(), 105.0);
    ///
    /// let err = Position::try_new(f64::NAN).unwrap_err();
    /// assert!(matches!(err, Error::NotFinite(_)));
    ///
    /// # Ok::<(), Error>(())
    /// ```
    pub fn try_new(value: f64) -> Result<Self, Error> {
        if !value.is_finite() {
            return Err(Error::NotFinite(value));
        }

        // Canonicalizes negative zero so that equal positions always share a
        // bit pattern.
        if value == 0.0 {
            return Ok(Position(0.0));
        }

        Ok(Position(value))
    }

    /// Gets the inner value of the position.
    ///
    /// # Examples
    ///
    /// ```
    /// use metmatch::core::Position;
    ///
    /// let position = "105".parse::<Position>()?;
    /// assert_eq!(position.get(), 105.0);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn get(&self) -> f64 {
        self.0
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.to_bits());
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<f64>() {
            Ok(value) => Position::try_new(value).map_err(|_| Error::ParseError(s.to_string())),
            Err(_) => Err(Error::ParseError(s.to_string())),
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}
