//! An interval record: an inclusive range with a category key.

use crate::columns::IntervalColumns;
use crate::core::position;
use crate::core::Position;
use crate::core::Strand;

/// An error associated with parsing an interval record from a table row.
#[derive(Debug, PartialEq)]
pub enum ParseError {
    /// The row has no field at a configured bound column.
    MissingBound(usize),
    /// A bound field failed numeric coercion.
    InvalidBound(position::Error),
    /// The category key field is absent or empty.
    MissingKey(usize),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MissingBound(index) => {
                write!(f, "row has no bound field at column {}", index)
            }
            ParseError::InvalidBound(err) => write!(f, "invalid bound: {}", err),
            ParseError::MissingKey(index) => {
                write!(f, "row has no category key at column {}", index)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// An interval record.
///
/// The bounds are inclusive on both ends and are used exactly as given:
/// `start` is not required to be less than or equal to `end`, and an interval
/// with `start > end` simply matches nothing. The raw input row is retained so
/// that the output schema can be a superset of the input schema.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IntervalRecord {
    /// The inclusive start bound.
    start: Position,
    /// The inclusive end bound.
    end: Position,
    /// The category key joining this interval to point records.
    key: String,
    /// The strand indicator, if the row carried a recognizable one.
    strand: Option<Strand>,
    /// The raw input row this record was parsed from.
    row: csv::StringRecord,
}

impl IntervalRecord {
    /// Attempts to parse an [`IntervalRecord`] from a table row.
    ///
    /// The strand column is parsed leniently: any value other than `+` or `-`
    /// (or an absent column) leaves the record unstranded.
    ///
    /// # Examples
    ///
    /// ```
    /// use csv::StringRecord;
    /// use metmatch::columns::IntervalColumns;
    /// use metmatch::core::Strand;
    /// use metmatch::record::IntervalRecord;
    ///
    /// let columns = IntervalColumns::try_new(4, 5, 7, Some(6))?;
    /// let row = StringRecord::from(vec!["g1", "", "", "", "100", "112", "+", "A"]);
    ///
    /// let interval = IntervalRecord::parse(&row, &columns)?;
    /// assert_eq!(interval.start().get(), 100.0);
    /// assert_eq!(interval.end().get(), 112.0);
    /// assert_eq!(interval.key(), "A");
    /// assert_eq!(interval.strand(), Some(Strand::Positive));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse(
        record: &csv::StringRecord,
        columns: &IntervalColumns,
    ) -> Result<Self, ParseError> {
        let start = parse_bound(record, columns.start())?;
        let end = parse_bound(record, columns.end())?;

        let key = record
            .get(columns.key())
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .ok_or(ParseError::MissingKey(columns.key()))?
            .to_string();

        let strand = columns
            .strand()
            .and_then(|index| record.get(index))
            .map(str::trim)
            .and_then(Strand::lenient);

        Ok(IntervalRecord {
            start,
            end,
            key,
            strand,
            row: record.clone(),
        })
    }

    /// The inclusive start bound.
    pub fn start(&self) -> Position {
        self.start
    }

    /// The inclusive end bound.
    pub fn end(&self) -> Position {
        self.end
    }

    /// The category key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The strand indicator, if any.
    pub fn strand(&self) -> Option<Strand> {
        self.strand
    }

    /// The raw input row this record was parsed from.
    pub fn row(&self) -> &csv::StringRecord {
        &self.row
    }

    /// Indicates whether a position falls within the interval.
    ///
    /// The comparison is the literal `start ≤ position ≤ end`, inclusive on
    /// both ends. If `start > end`, no position satisfies it.
    ///
    /// # Examples
    ///
    /// ```
    /// use csv::StringRecord;
    /// use metmatch::columns::IntervalColumns;
    /// use metmatch::core::Position;
    /// use metmatch::record::IntervalRecord;
    ///
    /// let columns = IntervalColumns::try_new(0, 1, 2, None)?;
    /// let interval = IntervalRecord::parse(
    ///     &StringRecord::from(vec!["100", "112", "A"]),
    ///     &columns,
    /// )?;
    ///
    /// assert!(interval.contains("100".parse::<Position>()?));
    /// assert!(interval.contains("112".parse::<Position>()?));
    /// assert!(!interval.contains("113".parse::<Position>()?));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn contains(&self, position: Position) -> bool {
        self.start.get() <= position.get() && position.get() <= self.end.get()
    }
}

/// Parses an inclusive bound from the given column of a row.
fn parse_bound(record: &csv::StringRecord, index: usize) -> Result<Position, ParseError> {
    record
        .get(index)
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .ok_or(ParseError::MissingBound(index))?
        .parse::<Position>()
        .map_err(ParseError::InvalidBound)
}

#[cfg(test)]
pub mod tests {
    use super::*;

    fn columns() -> IntervalColumns {
        IntervalColumns::try_new(4, 5, 7, Some(6)).unwrap()
    }

    fn row(fields: Vec<&str>) -> csv::StringRecord {
        csv::StringRecord::from(fields)
    }

    #[test]
    fn test_parsing_a_valid_row() -> Result<(), Box<dyn std::error::Error>> {
        let interval = IntervalRecord::parse(
            &row(vec!["g1", "", "label", "", "100", "112", "-", "A"]),
            &columns(),
        )?;

        assert_eq!(interval.start().get(), 100.0);
        assert_eq!(interval.end().get(), 112.0);
        assert_eq!(interval.key(), "A");
        assert_eq!(interval.strand(), Some(Strand::Negative));
        assert_eq!(interval.row().get(2), Some("label"));

        Ok(())
    }

    #[test]
    fn test_unrecognized_strand_leaves_the_record_unstranded()
    -> Result<(), Box<dyn std::error::Error>> {
        let interval = IntervalRecord::parse(
            &row(vec!["g1", "", "", "", "100", "112", ".", "A"]),
            &columns(),
        )?;
        assert_eq!(interval.strand(), None);

        Ok(())
    }

    #[test]
    fn test_missing_bound() {
        let err = IntervalRecord::parse(&row(vec!["g1", "", ""]), &columns()).unwrap_err();
        assert_eq!(err.to_string(), "row has no bound field at column 4");
    }

    #[test]
    fn test_invalid_bound() {
        let err = IntervalRecord::parse(
            &row(vec!["g1", "", "", "", "start", "112", "+", "A"]),
            &columns(),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid bound: could not parse position from the value: start"
        );
    }

    #[test]
    fn test_missing_key() {
        let err = IntervalRecord::parse(
            &row(vec!["g1", "", "", "", "100", "112", "+", ""]),
            &columns(),
        )
        .unwrap_err();
        assert_eq!(err, ParseError::MissingKey(7));
    }

    #[test]
    fn test_containment_is_inclusive_and_literal() -> Result<(), Box<dyn std::error::Error>> {
        let interval = IntervalRecord::parse(
            &row(vec!["g1", "", "", "", "100", "112", "+", "A"]),
            &columns(),
        )?;

        assert!(interval.contains("100".parse()?));
        assert!(interval.contains("105.5".parse()?));
        assert!(interval.contains("112".parse()?));
        assert!(!interval.contains("99.9".parse()?));

        // start > end matches nothing, by construction.
        let inverted = IntervalRecord::parse(
            &row(vec!["g1", "", "", "", "50", "40", "+", "B"]),
            &columns(),
        )?;
        assert!(!inverted.contains("45".parse()?));
        assert!(!inverted.contains("50".parse()?));
        assert!(!inverted.contains("40".parse()?));

        Ok(())
    }
}
