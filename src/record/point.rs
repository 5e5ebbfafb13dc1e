//! A point record: a measured position with a category key.

use crate::columns::PointColumns;
use crate::core::position;
use crate::core::Position;

/// An error associated with parsing a point record from a table row.
#[derive(Debug, PartialEq)]
pub enum ParseError {
    /// The row has no field at the configured position column.
    MissingPosition(usize),
    /// The position field failed numeric coercion.
    InvalidPosition(position::Error),
    /// The category key field is absent or empty.
    MissingKey(usize),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MissingPosition(index) => {
                write!(f, "row has no position field at column {}", index)
            }
            ParseError::InvalidPosition(err) => write!(f, "invalid position: {}", err),
            ParseError::MissingKey(index) => {
                write!(f, "row has no category key at column {}", index)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// A point record.
///
/// Point records are immutable once parsed. Rows that fail to parse are
/// excluded from indexing by the caller as a filtering policy, not treated as
/// an error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PointRecord {
    /// The measured position.
    position: Position,
    /// The category key joining this point to interval records.
    key: String,
    /// The auxiliary value carried through to the output, uninterpreted.
    value: String,
}

impl PointRecord {
    /// Attempts to parse a [`PointRecord`] from a table row.
    ///
    /// The position must coerce to a finite number and the category key must
    /// be non-empty. A missing auxiliary value column yields an empty carried
    /// value rather than an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use csv::StringRecord;
    /// use metmatch::columns::PointColumns;
    /// use metmatch::record::PointRecord;
    ///
    /// let columns = PointColumns::try_new(0, 3, 2)?;
    /// let row = StringRecord::from(vec!["105", "", "x", "A"]);
    ///
    /// let point = PointRecord::parse(&row, &columns)?;
    /// assert_eq!(point.position().get(), 105.0);
    /// assert_eq!(point.key(), "A");
    /// assert_eq!(point.value(), "x");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse(record: &csv::StringRecord, columns: &PointColumns) -> Result<Self, ParseError> {
        let field = record
            .get(columns.position())
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .ok_or(ParseError::MissingPosition(columns.position()))?;

        let position = field
            .parse::<Position>()
            .map_err(ParseError::InvalidPosition)?;

        let key = record
            .get(columns.key())
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .ok_or(ParseError::MissingKey(columns.key()))?
            .to_string();

        let value = record
            .get(columns.value())
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        Ok(PointRecord {
            position,
            key,
            value,
        })
    }

    /// The measured position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// The category key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The auxiliary value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes self, returning the parts of the record.
    pub fn into_parts(self) -> (Position, String, String) {
        (self.position, self.key, self.value)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    fn columns() -> PointColumns {
        PointColumns::try_new(0, 3, 2).unwrap()
    }

    #[test]
    fn test_parsing_a_valid_row() -> Result<(), Box<dyn std::error::Error>> {
        let row = csv::StringRecord::from(vec!["105.0", "ignored", "x", "A"]);
        let point = PointRecord::parse(&row, &columns())?;

        assert_eq!(point.position().get(), 105.0);
        assert_eq!(point.key(), "A");
        assert_eq!(point.value(), "x");

        Ok(())
    }

    #[test]
    fn test_short_row_is_a_missing_position() {
        let row = csv::StringRecord::from(vec![""]);
        let err = PointRecord::parse(&row, &columns()).unwrap_err();
        assert_eq!(err.to_string(), "row has no position field at column 0");
    }

    #[test]
    fn test_non_numeric_position_is_invalid() {
        let row = csv::StringRecord::from(vec!["pos", "", "x", "A"]);
        let err = PointRecord::parse(&row, &columns()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid position: could not parse position from the value: pos"
        );
    }

    #[test]
    fn test_empty_key_is_missing() {
        let row = csv::StringRecord::from(vec!["105", "", "x", "  "]);
        let err = PointRecord::parse(&row, &columns()).unwrap_err();
        assert_eq!(err, ParseError::MissingKey(3));
    }

    #[test]
    fn test_missing_value_column_carries_an_empty_value()
    -> Result<(), Box<dyn std::error::Error>> {
        let columns = PointColumns::try_new(0, 1, 5)?;
        let row = csv::StringRecord::from(vec!["105", "A"]);
        let point = PointRecord::parse(&row, &columns)?;

        assert_eq!(point.value(), "");

        Ok(())
    }
}
