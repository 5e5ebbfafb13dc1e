//! A machine for matching interval records against an index of point records.

use std::collections::HashMap;

use crate::core::Offset;
use crate::core::Position;
use crate::record::IntervalRecord;
use crate::report::MatchReport;

pub mod builder;

pub use builder::Builder;

/// A machine for matching interval records against point records indexed by
/// category key.
///
/// The machine is built once per run (generally via a [`builder::Builder`])
/// and is read-only afterwards. Buckets keep their input order: the matched
/// subset is sorted downstream, never the whole bucket.
#[derive(Clone, Debug, Default)]
pub struct Machine {
    /// The inner lookup table from category key to the `(position, value)`
    /// pairs recorded under that key, in input order.
    index: HashMap<String, Vec<(Position, String)>>,
    /// The number of rows skipped while building the index.
    skipped: usize,
}

impl Machine {
    /// Creates a machine directly from an index and a skip count.
    pub(crate) fn new(index: HashMap<String, Vec<(Position, String)>>, skipped: usize) -> Self {
        Machine { index, skipped }
    }

    /// The number of category keys in the index.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the index holds no keys at all.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The total number of indexed points across all keys.
    pub fn points(&self) -> usize {
        self.index.values().map(Vec::len).sum()
    }

    /// The number of rows skipped while building the index.
    ///
    /// Skips are an aggregate observability count, not per-row errors.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Finds the points matching an interval record.
    ///
    /// The bucket for the interval's category key is filtered with the
    /// literal predicate `start ≤ position ≤ end`. A key absent from the
    /// index yields an empty result, not an error. Matches keep the bucket's
    /// input order.
    ///
    /// # Examples
    ///
    /// ```
    /// use csv::StringRecord;
    /// use metmatch::columns::IntervalColumns;
    /// use metmatch::columns::PointColumns;
    /// use metmatch::matcher::machine;
    /// use metmatch::record::IntervalRecord;
    ///
    /// let data = "105,,x,A\n110,,y,A\n300,,z,B\n";
    /// let reader = csv::ReaderBuilder::new()
    ///     .has_headers(false)
    ///     .flexible(true)
    ///     .from_reader(data.as_bytes());
    ///
    /// let machine = machine::Builder::default()
    ///     .try_build_from(reader, &PointColumns::try_new(0, 3, 2)?)?;
    ///
    /// let columns = IntervalColumns::try_new(0, 1, 2, None)?;
    /// let interval = IntervalRecord::parse(
    ///     &StringRecord::from(vec!["100", "112", "A"]),
    ///     &columns,
    /// )?;
    ///
    /// let matches = machine.query(&interval);
    /// assert_eq!(matches.len(), 2);
    /// assert_eq!(matches[0].1, "x");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn query(&self, interval: &IntervalRecord) -> Vec<(Position, &str)> {
        self.index
            .get(interval.key())
            .map(|bucket| {
                bucket
                    .iter()
                    .filter(|(position, _)| interval.contains(*position))
                    .map(|(position, value)| (*position, value.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Matches an interval record and assembles the normalized result.
    ///
    /// Each matched position is expressed relative to the interval's start
    /// and transformed according to the interval's strand before assembly.
    ///
    /// # Examples
    ///
    /// ```
    /// use csv::StringRecord;
    /// use metmatch::columns::IntervalColumns;
    /// use metmatch::columns::PointColumns;
    /// use metmatch::matcher::machine;
    /// use metmatch::record::IntervalRecord;
    ///
    /// let data = "105,,x,A\n110,,y,A\n";
    /// let reader = csv::ReaderBuilder::new()
    ///     .has_headers(false)
    ///     .flexible(true)
    ///     .from_reader(data.as_bytes());
    ///
    /// let machine = machine::Builder::default()
    ///     .try_build_from(reader, &PointColumns::try_new(0, 3, 2)?)?;
    ///
    /// let columns = IntervalColumns::try_new(0, 1, 2, Some(3))?;
    /// let interval = IntervalRecord::parse(
    ///     &StringRecord::from(vec!["100", "112", "A", "+"]),
    ///     &columns,
    /// )?;
    ///
    /// let report = machine.report(&interval);
    /// assert_eq!(report.rendered_offsets(), "7,12");
    /// assert_eq!(report.rendered_values(), "x,y");
    /// assert_eq!(report.flag(), "y");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn report(&self, interval: &IntervalRecord) -> MatchReport {
        let matches = self
            .query(interval)
            .into_iter()
            .map(|(position, value)| {
                let offset =
                    Offset::between(position, interval.start()).transform(interval.strand());
                (offset, value.to_string())
            })
            .collect();

        MatchReport::assemble(matches)
    }
}
