//! End-to-end single-pass reconciliation runs.
//!
//! Every pipeline here follows the same shape: fully materialize whatever
//! lookup structure it needs, then map each input row independently to its
//! output row, in input order, and terminate. There is no intermediate
//! persisted state, no retries, and no resumption; the pipelines are
//! deterministic, idempotent batch transforms, and rerunning them *is* the
//! retry mechanism.

use std::io::Read;
use std::io::Write;

use crate::columns::IntervalColumns;
use crate::columns::PointColumns;
use crate::columns::RangeColumns;
use crate::columns::UniqueColumns;
use crate::core::Position;
use crate::matcher::machine;
use crate::record::IntervalRecord;
use crate::report::MatchReport;
use crate::unique::CrossUnique;
use crate::unique::TaggedColumn;

/// An error related to running a pipeline.
#[derive(Debug)]
pub enum Error {
    /// An error building the point index.
    Build(machine::builder::Error),
    /// An error reading or writing a table.
    Csv(csv::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Build(err) => write!(f, "build error: {}", err),
            Error::Csv(err) => write!(f, "csv error: {}", err),
        }
    }
}

impl std::error::Error for Error {}

/// Aggregate counts reported by a pipeline run.
///
/// Rows skipped during indexing or matching are recovered locally and
/// surfaced here for observability; they never halt a run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    /// The number of points (or candidate values) indexed.
    indexed: usize,
    /// The number of source rows (or fields) skipped while indexing.
    index_skipped: usize,
    /// The number of driving rows read.
    rows_in: usize,
    /// The number of rows written.
    rows_out: usize,
    /// The number of rows with at least one match (or an accepting probe).
    matched: usize,
    /// The number of driving rows that failed to parse.
    rows_skipped: usize,
}

impl Summary {
    /// The number of points (or candidate values) indexed.
    pub fn indexed(&self) -> usize {
        self.indexed
    }

    /// The number of source rows or fields skipped while indexing.
    pub fn index_skipped(&self) -> usize {
        self.index_skipped
    }

    /// The number of driving rows read.
    pub fn rows_in(&self) -> usize {
        self.rows_in
    }

    /// The number of rows written.
    pub fn rows_out(&self) -> usize {
        self.rows_out
    }

    /// The number of rows with at least one match.
    pub fn matched(&self) -> usize {
        self.matched
    }

    /// The number of driving rows that failed to parse.
    pub fn rows_skipped(&self) -> usize {
        self.rows_skipped
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} indexed ({} skipped); {} rows in, {} rows out, {} matched, {} skipped",
            self.indexed,
            self.index_skipped,
            self.rows_in,
            self.rows_out,
            self.matched,
            self.rows_skipped
        )
    }
}

/// Annotates every interval row with its matched, normalized offsets.
///
/// The point index is built fully before any interval is matched. Each
/// interval row is then mapped independently to its [`MatchReport`] and
/// written back out as the original row plus the three appended match fields,
/// in input order. Interval rows that fail to parse are written through
/// unchanged with empty match fields and an `n` flag, so the output always
/// holds exactly one row per input row.
///
/// # Examples
///
/// ```
/// use metmatch::columns::IntervalColumns;
/// use metmatch::columns::PointColumns;
/// use metmatch::pipeline;
///
/// let points = "105,,x,A\n110,,y,A\n";
/// let intervals = "g1,,,,100,112,+,A\ng2,,,,50,40,+,B\n";
///
/// let reader = |data: &'static str| {
///     csv::ReaderBuilder::new()
///         .has_headers(false)
///         .flexible(true)
///         .from_reader(data.as_bytes())
/// };
///
/// let mut out = Vec::new();
/// let summary = {
///     let mut writer = csv::Writer::from_writer(&mut out);
///     pipeline::annotate(
///         reader(points),
///         reader(intervals),
///         &mut writer,
///         &PointColumns::default(),
///         &IntervalColumns::default(),
///     )?
/// };
///
/// assert_eq!(summary.rows_out(), 2);
/// assert_eq!(summary.matched(), 1);
///
/// let output = String::from_utf8(out)?;
/// assert_eq!(
///     output,
///     "g1,,,,100,112,+,A,\"7,12\",\"x,y\",y\ng2,,,,50,40,+,B,,,n\n"
/// );
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn annotate<P, I, W>(
    points: csv::Reader<P>,
    mut intervals: csv::Reader<I>,
    out: &mut csv::Writer<W>,
    point_columns: &PointColumns,
    interval_columns: &IntervalColumns,
) -> Result<Summary, Error>
where
    P: Read,
    I: Read,
    W: Write,
{
    let machine = machine::Builder::default()
        .try_build_from(points, point_columns)
        .map_err(Error::Build)?;

    let mut summary = Summary {
        indexed: machine.points(),
        index_skipped: machine.skipped(),
        ..Summary::default()
    };

    for result in intervals.records() {
        let record = result.map_err(Error::Csv)?;
        summary.rows_in += 1;

        let report = match IntervalRecord::parse(&record, interval_columns) {
            Ok(interval) => machine.report(&interval),
            Err(_) => {
                summary.rows_skipped += 1;
                MatchReport::empty()
            }
        };

        if report.has_matches() {
            summary.matched += 1;
        }

        out.write_record(&report.append_to(&record)).map_err(Error::Csv)?;
        summary.rows_out += 1;
    }

    out.flush().map_err(|err| Error::Csv(csv::Error::from(err)))?;

    Ok(summary)
}

/// Reports, per range row, the cross-unique values it contains as offsets.
///
/// The candidate pool is the cross-column exactly-once intersection of two
/// value columns of the source table (no category-key join and no strand
/// transform in this variant). Range rows whose bounds fail to parse are
/// dropped; surviving rows are projected to `[label, start, end, offsets]`.
pub fn unique_offsets<S, R, W>(
    mut source: csv::Reader<S>,
    mut ranges: csv::Reader<R>,
    out: &mut csv::Writer<W>,
    unique_columns: &UniqueColumns,
    range_columns: &RangeColumns,
) -> Result<Summary, Error>
where
    S: Read,
    R: Read,
    W: Write,
{
    let (cross, index_skipped) = build_cross_unique(&mut source, unique_columns)?;

    let mut summary = Summary {
        indexed: cross.len(),
        index_skipped,
        ..Summary::default()
    };

    for result in ranges.records() {
        let record = result.map_err(Error::Csv)?;
        summary.rows_in += 1;

        let start = parse_field(&record, range_columns.start());
        let end = parse_field(&record, range_columns.end());

        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                summary.rows_skipped += 1;
                continue;
            }
        };

        let offsets = cross.offsets_within(start, end);
        if !offsets.is_empty() {
            summary.matched += 1;
        }

        let rendered = offsets
            .iter()
            .map(|offset| offset.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let label = record.get(range_columns.label()).unwrap_or_default();
        let (start, end) = (start.to_string(), end.to_string());
        out.write_record([label, start.as_str(), end.as_str(), rendered.as_str()])
            .map_err(Error::Csv)?;
        summary.rows_out += 1;
    }

    out.flush().map_err(|err| Error::Csv(csv::Error::from(err)))?;

    Ok(summary)
}

/// Flags every companion-table row by probing a fixed column against the
/// cross-unique set of the source table.
///
/// The probed value is shifted by [`crate::unique::PROBE_OFFSET`] and must
/// both be a cross-unique member and pass the tag-collision check for the row
/// to flag `y`. Rows whose probed field is missing or uncoercible flag `n`.
/// Every input row is written out with exactly one appended flag field.
pub fn probe<S, T, W>(
    mut source: csv::Reader<S>,
    mut table: csv::Reader<T>,
    out: &mut csv::Writer<W>,
    unique_columns: &UniqueColumns,
    probe_column: usize,
) -> Result<Summary, Error>
where
    S: Read,
    T: Read,
    W: Write,
{
    let (cross, index_skipped) = build_cross_unique(&mut source, unique_columns)?;

    let mut summary = Summary {
        indexed: cross.len(),
        index_skipped,
        ..Summary::default()
    };

    for result in table.records() {
        let record = result.map_err(Error::Csv)?;
        summary.rows_in += 1;

        let accepted = match parse_field(&record, probe_column) {
            Some(value) => cross.probe(value),
            None => {
                summary.rows_skipped += 1;
                false
            }
        };

        if accepted {
            summary.matched += 1;
        }

        let mut row = record.clone();
        row.push_field(if accepted { "y" } else { "n" });
        out.write_record(&row).map_err(Error::Csv)?;
        summary.rows_out += 1;
    }

    out.flush().map_err(|err| Error::Csv(csv::Error::from(err)))?;

    Ok(summary)
}

/// Builds the cross-unique candidate set from two value columns of a table.
///
/// Returns the set together with the number of value fields that were
/// present but failed numeric coercion (absent/empty fields are simply not
/// observations and are not counted).
fn build_cross_unique<R>(
    reader: &mut csv::Reader<R>,
    columns: &UniqueColumns,
) -> Result<(CrossUnique, usize), Error>
where
    R: Read,
{
    let mut left = TaggedColumn::new();
    let mut right = TaggedColumn::new();
    let mut skipped = 0usize;

    for result in reader.records() {
        let record = result.map_err(Error::Csv)?;

        let tag = columns
            .tag()
            .and_then(|index| record.get(index))
            .map(str::trim)
            .filter(|field| !field.is_empty());

        for (index, column) in [
            (columns.left(), &mut left),
            (columns.right(), &mut right),
        ] {
            let field = match record.get(index).map(str::trim) {
                Some(field) if !field.is_empty() => field,
                _ => continue,
            };

            match field.parse::<Position>() {
                Ok(value) => column.push(value, tag),
                Err(_) => skipped += 1,
            }
        }
    }

    Ok((CrossUnique::new(&left, &right), skipped))
}

/// Parses a position from the given column of a row, treating absent, empty,
/// and uncoercible fields alike as no value.
fn parse_field(record: &csv::StringRecord, index: usize) -> Option<Position> {
    record
        .get(index)
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .and_then(|field| field.parse::<Position>().ok())
}

#[cfg(test)]
pub mod tests {
    use super::*;

    fn reader(data: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data.as_bytes())
    }

    fn run_annotate(points: &str, intervals: &str) -> (Summary, String) {
        let mut out = Vec::new();
        let summary = {
            let mut writer = csv::Writer::from_writer(&mut out);
            annotate(
                reader(points),
                reader(intervals),
                &mut writer,
                &PointColumns::default(),
                &IntervalColumns::default(),
            )
            .unwrap()
        };

        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_annotate_appends_match_fields_in_input_order() {
        let (summary, output) = run_annotate(
            "105,,x,A\n110,,y,A\n300,,z,B\n",
            "g1,,,,100,112,+,A\ng2,,,,290,310,,B\n",
        );

        assert_eq!(summary.rows_in(), 2);
        assert_eq!(summary.rows_out(), 2);
        assert_eq!(summary.matched(), 2);
        assert_eq!(summary.indexed(), 3);

        assert_eq!(
            output,
            "g1,,,,100,112,+,A,\"7,12\",\"x,y\",y\ng2,,,,290,310,,B,10,z,y\n"
        );
    }

    #[test]
    fn test_annotate_writes_unparseable_rows_through_unmatched() {
        let (summary, output) = run_annotate("105,,x,A\n", "g1,,,,start,112,+,A\n");

        assert_eq!(summary.rows_out(), 1);
        assert_eq!(summary.rows_skipped(), 1);
        assert_eq!(summary.matched(), 0);
        assert_eq!(output, "g1,,,,start,112,+,A,,,n\n");
    }

    #[test]
    fn test_annotate_is_deterministic() {
        let points = "110,,y,A\n105,,x,A\n107,,w,A\n";
        let intervals = "g1,,,,100,112,-,A\n";

        let (_, first) = run_annotate(points, intervals);
        let (_, second) = run_annotate(points, intervals);

        assert_eq!(first, second);
        // Reflection reverses the offset order; assembly re-sorts ascending.
        assert!(first.contains("\"18,21,23\""));
    }

    #[test]
    fn test_unique_offsets_projects_valid_ranges() {
        let source = ",105,105,,,\n,110,110,,,\n,110,200,,,\n";
        let ranges = "r1,,lab1,,100,112\nr2,,lab2,,bad,112\n";

        let mut out = Vec::new();
        let summary = {
            let mut writer = csv::Writer::from_writer(&mut out);
            unique_offsets(
                reader(source),
                reader(ranges),
                &mut writer,
                &UniqueColumns::default(),
                &RangeColumns::default(),
            )
            .unwrap()
        };

        // 105 is unique in both columns; 110 is duplicated in the left
        // column; 200 is unique on the right only.
        assert_eq!(summary.indexed(), 1);
        assert_eq!(summary.rows_in(), 2);
        assert_eq!(summary.rows_out(), 1);
        assert_eq!(summary.rows_skipped(), 1);

        assert_eq!(String::from_utf8(out).unwrap(), "lab1,100,112,5\n");
    }

    #[test]
    fn test_probe_flags_rows_by_shifted_membership() {
        // 5.0 is exactly-once in both columns with disjoint tags.
        let source = ",5.0,5.0,,,chrX\n";
        // Probing 8 looks up 8 - 3 = 5: accepted. Probing 5 looks up 2:
        // not a member. The last row has no probed value.
        let table = "a,,,,,8\nb,,,,,5\nc,,,,,\n";

        let mut out = Vec::new();
        let summary = {
            let mut writer = csv::Writer::from_writer(&mut out);
            probe(
                reader(source),
                reader(table),
                &mut writer,
                &UniqueColumns::try_new(1, 2, None).unwrap(),
                5,
            )
            .unwrap()
        };

        assert_eq!(summary.matched(), 1);
        assert_eq!(summary.rows_out(), 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a,,,,,8,y\nb,,,,,5,n\nc,,,,,,n\n"
        );
    }

    #[test]
    fn test_probe_respects_the_tag_collision_exclusion() {
        // Both occurrences of 5.0 carry the same tag, so the member is
        // ambiguous and the probe must reject it.
        let source = ",5.0,,,,chrX\n,,5.0,,,chrX\n";
        let table = "a,,,,,8\n";

        let mut out = Vec::new();
        let summary = {
            let mut writer = csv::Writer::from_writer(&mut out);
            probe(
                reader(source),
                reader(table),
                &mut writer,
                &UniqueColumns::default(),
                5,
            )
            .unwrap()
        };

        assert_eq!(summary.matched(), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "a,,,,,8,n\n");
    }

    #[test]
    fn test_all_skipped_input_reports_zero_matches_not_an_error() {
        let (summary, output) = run_annotate("bad,,x,A\n", "g1,,,,100,112,+,A\n");

        assert_eq!(summary.indexed(), 0);
        assert_eq!(summary.index_skipped(), 1);
        assert_eq!(summary.matched(), 0);
        assert_eq!(output, "g1,,,,100,112,+,A,,,n\n");
    }
}
