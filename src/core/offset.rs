//! An interval-relative offset and its strand-dependent transform.
//!
//! A matched position is first expressed relative to its interval's start
//! (`position - start`) and then shifted according to the interval's strand:
//!
//! - `+` → `offset + FORWARD_SHIFT`
//! - `-` → `REVERSE_ANCHOR - offset`
//! - no strand → identity
//!
//! No bounds validation is performed on the result: negative or out-of-range
//! offsets are passed through untouched.

use crate::core::Position;
use crate::core::Strand;

/// The shift applied to offsets on the positive strand.
///
/// This is a fixed parameter of the coordinate convention being modeled (the
/// anchor offset of the read layout), not a tunable input.
pub const FORWARD_SHIFT: f64 = 2.0;

/// The anchor from which offsets on the negative strand are reflected.
///
/// Like [`FORWARD_SHIFT`], this is a fixed parameter of the read-length
/// convention the offsets are expressed in.
pub const REVERSE_ANCHOR: f64 = 28.0;

/// An offset of a position relative to the start of an interval.
#[derive(Clone, Copy, Debug)]
pub struct Offset(f64);

impl Offset {
    /// Computes the offset of a position from an interval start.
    ///
    /// # Examples
    ///
    /// ```
    /// use metmatch::core::Offset;
    /// use metmatch::core::Position;
    ///
    /// let position = "105".parse::<Position>()?;
    /// let start = "100".parse::<Position>()?;
    ///
    /// assert_eq!(Offset::between(position, start).get(), 5.0);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn between(position: Position, start: Position) -> Offset {
        Offset(position.get() - start.get())
    }

    /// Applies the strand-dependent transform to the offset.
    ///
    /// # Examples
    ///
    /// ```
    /// use metmatch::core::Offset;
    /// use metmatch::core::Position;
    /// use metmatch::core::Strand;
    ///
    /// let offset = Offset::between("105".parse::<Position>()?, "100".parse::<Position>()?);
    ///
    /// assert_eq!(offset.transform(Some(Strand::Positive)).get(), 7.0);
    /// assert_eq!(offset.transform(Some(Strand::Negative)).get(), 23.0);
    /// assert_eq!(offset.transform(None).get(), 5.0);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn transform(self, strand: Option<Strand>) -> Offset {
        match strand {
            Some(Strand::Positive) => Offset(self.0 + FORWARD_SHIFT),
            Some(Strand::Negative) => Offset(REVERSE_ANCHOR - self.0),
            None => self,
        }
    }

    /// Gets the inner value of the offset.
    pub fn get(&self) -> f64 {
        self.0
    }
}

impl PartialEq for Offset {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Offset {}

impl PartialOrd for Offset {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Offset {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::fmt::Display for Offset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    fn position(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn test_offset_between_positions() {
        assert_eq!(Offset::between(position("110"), position("100")).get(), 10.0);
        assert_eq!(Offset::between(position("95"), position("100")).get(), -5.0);
    }

    #[test]
    fn test_positive_strand_transform() {
        let offset = Offset::between(position("105"), position("100"));
        assert_eq!(offset.transform(Some(Strand::Positive)).get(), 7.0);
    }

    #[test]
    fn test_negative_strand_transform() {
        let offset = Offset::between(position("105"), position("100"));
        assert_eq!(offset.transform(Some(Strand::Negative)).get(), 23.0);

        // Reflection past the anchor goes negative and is not clamped.
        let offset = Offset::between(position("130"), position("100"));
        assert_eq!(offset.transform(Some(Strand::Negative)).get(), -2.0);
    }

    #[test]
    fn test_missing_strand_is_identity() {
        let offset = Offset::between(position("105"), position("100"));
        assert_eq!(offset.transform(None).get(), 5.0);
    }

    #[test]
    fn test_offset_display() {
        assert_eq!(Offset::between(position("107"), position("100")).to_string(), "7");
        assert_eq!(
            Offset::between(position("107.5"), position("100")).to_string(),
            "7.5"
        );
        assert_eq!(Offset::between(position("95"), position("100")).to_string(), "-5");
    }
}
