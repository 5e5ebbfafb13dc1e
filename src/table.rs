//! Straight line-by-line row transforms over delimited tables.
//!
//! Nothing in this module indexes, joins, or transforms coordinates; these
//! are the companion utilities the pipelines are bracketed by: dropping
//! columns, flagging rows on a column's presence, and filtering rows on a
//! numeric cutoff.

use std::io::Read;
use std::io::Write;

/// The result of removing columns from a row set.
#[derive(Clone, Debug, Default)]
pub struct Removal {
    /// The transformed rows.
    rows: Vec<csv::StringRecord>,
    /// Requested 1-based column numbers beyond the observed maximum column
    /// count (or zero, which is not a valid 1-based index).
    out_of_range: Vec<usize>,
}

impl Removal {
    /// The transformed rows.
    pub fn rows(&self) -> &[csv::StringRecord] {
        &self.rows
    }

    /// Consumes self, returning the transformed rows.
    pub fn into_rows(self) -> Vec<csv::StringRecord> {
        self.rows
    }

    /// The requested column numbers that did not exist in the input.
    ///
    /// These are a non-fatal warning, not an error.
    pub fn out_of_range(&self) -> &[usize] {
        &self.out_of_range
    }
}

/// Reads every row from a delimited-text reader into memory.
pub fn read_rows<R>(reader: &mut csv::Reader<R>) -> Result<Vec<csv::StringRecord>, csv::Error>
where
    R: Read,
{
    reader.records().collect()
}

/// Writes a row set to a delimited-text writer.
pub fn write_rows<W>(
    writer: &mut csv::Writer<W>,
    rows: &[csv::StringRecord],
) -> Result<(), csv::Error>
where
    W: Write,
{
    for row in rows {
        writer.write_record(row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Removes the named columns (1-based) from every row.
///
/// Columns are removed from right to left so that earlier removals never
/// shift the indices of later ones. Rows shorter than a removed index lose
/// only the columns they actually have. Requested columns beyond the observed
/// maximum column count are reported via [`Removal::out_of_range`] rather
/// than treated as an error.
///
/// # Examples
///
/// ```
/// use csv::StringRecord;
/// use metmatch::table;
///
/// let rows = vec![
///     StringRecord::from(vec!["a", "b", "c", "d"]),
///     StringRecord::from(vec!["e", "f", "g", "h"]),
/// ];
///
/// let removal = table::remove_columns(&rows, &[2, 4, 9]);
/// assert_eq!(
///     removal.rows()[0].iter().collect::<Vec<_>>(),
///     vec!["a", "c"]
/// );
/// assert_eq!(removal.out_of_range(), &[9]);
/// ```
pub fn remove_columns(rows: &[csv::StringRecord], columns: &[usize]) -> Removal {
    let max_columns = rows.iter().map(csv::StringRecord::len).max().unwrap_or(0);

    let mut out_of_range = columns
        .iter()
        .copied()
        .filter(|column| *column == 0 || *column > max_columns)
        .collect::<Vec<_>>();
    out_of_range.sort_unstable();
    out_of_range.dedup();

    // 0-based, descending, deduplicated: right-to-left removal avoids index
    // shifting.
    let mut indices = columns
        .iter()
        .copied()
        .filter(|column| *column >= 1)
        .map(|column| column - 1)
        .collect::<Vec<_>>();
    indices.sort_unstable_by(|a, b| b.cmp(a));
    indices.dedup();

    let rows = rows
        .iter()
        .map(|row| {
            let mut fields = row.iter().map(String::from).collect::<Vec<_>>();

            for index in &indices {
                if *index < fields.len() {
                    fields.remove(*index);
                }
            }

            csv::StringRecord::from(fields)
        })
        .collect();

    Removal { rows, out_of_range }
}

/// Prepends a `y`/`n` flag to every row based on whether the given 0-based
/// column is present and non-empty.
///
/// # Examples
///
/// ```
/// use csv::StringRecord;
/// use metmatch::table;
///
/// let rows = vec![
///     StringRecord::from(vec!["g1", "100", "112", "5,10"]),
///     StringRecord::from(vec!["g2", "50", "40", ""]),
/// ];
///
/// let flagged = table::flag_nonempty(&rows, 3);
/// assert_eq!(flagged[0].get(0), Some("y"));
/// assert_eq!(flagged[1].get(0), Some("n"));
/// ```
pub fn flag_nonempty(rows: &[csv::StringRecord], column: usize) -> Vec<csv::StringRecord> {
    rows.iter()
        .map(|row| {
            let present = row
                .get(column)
                .map(|field| !field.trim().is_empty())
                .unwrap_or(false);

            let mut out = csv::StringRecord::new();
            out.push_field(if present { "y" } else { "n" });
            for field in row.iter() {
                out.push_field(field);
            }
            out
        })
        .collect()
}

/// Retains the rows whose given 0-based column coerces to a number at or
/// above the cutoff.
///
/// Uncoercible or missing values are treated as below-cutoff and dropped.
///
/// # Examples
///
/// ```
/// use csv::StringRecord;
/// use metmatch::table;
///
/// let rows = vec![
///     StringRecord::from(vec!["g1", "12"]),
///     StringRecord::from(vec!["g2", "9"]),
///     StringRecord::from(vec!["g3", "coverage"]),
/// ];
///
/// let kept = table::retain_at_least(&rows, 1, 10.0);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].get(0), Some("g1"));
/// ```
pub fn retain_at_least(
    rows: &[csv::StringRecord],
    column: usize,
    cutoff: f64,
) -> Vec<csv::StringRecord> {
    rows.iter()
        .filter(|row| {
            row.get(column)
                .and_then(|field| field.trim().parse::<f64>().ok())
                .map(|value| value >= cutoff)
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
pub mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<csv::StringRecord> {
        data.iter()
            .map(|fields| csv::StringRecord::from(fields.to_vec()))
            .collect()
    }

    #[test]
    fn test_columns_are_removed_right_to_left() {
        let rows = rows(&[&["a", "b", "c", "d", "e"]]);
        let removal = remove_columns(&rows, &[2, 4]);

        assert_eq!(
            removal.rows()[0].iter().collect::<Vec<_>>(),
            vec!["a", "c", "e"]
        );
        assert!(removal.out_of_range().is_empty());
    }

    #[test]
    fn test_out_of_range_columns_are_reported_not_fatal() {
        let rows = rows(&[&["a", "b"], &["c", "d", "e"]]);
        let removal = remove_columns(&rows, &[1, 7, 0]);

        assert_eq!(removal.out_of_range(), &[0, 7]);
        assert_eq!(removal.rows()[0].iter().collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(removal.rows()[1].iter().collect::<Vec<_>>(), vec!["d", "e"]);
    }

    #[test]
    fn test_short_rows_lose_only_the_columns_they_have() {
        let rows = rows(&[&["a", "b", "c", "d"], &["e", "f"]]);
        let removal = remove_columns(&rows, &[3]);

        assert_eq!(
            removal.rows()[0].iter().collect::<Vec<_>>(),
            vec!["a", "b", "d"]
        );
        assert_eq!(removal.rows()[1].iter().collect::<Vec<_>>(), vec!["e", "f"]);
    }

    #[test]
    fn test_flagging_by_column_presence() {
        let rows = rows(&[
            &["g1", "", "", "5,10"],
            &["g2", "", "", ""],
            &["g3", ""],
        ]);

        let flagged = flag_nonempty(&rows, 3);

        assert_eq!(flagged[0].get(0), Some("y"));
        assert_eq!(flagged[1].get(0), Some("n"));
        assert_eq!(flagged[2].get(0), Some("n"));

        // The original row is shifted right by one, never replaced.
        assert_eq!(flagged[0].get(1), Some("g1"));
        assert_eq!(flagged[0].len(), 5);
    }

    #[test]
    fn test_threshold_filter_drops_uncoercible_values() {
        let rows = rows(&[
            &["g1", "12.5"],
            &["g2", "10"],
            &["g3", "9.99"],
            &["g4", "n/a"],
            &["g5"],
        ]);

        let kept = retain_at_least(&rows, 1, 10.0);
        let names = kept
            .iter()
            .map(|row| row.get(0).unwrap().to_string())
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["g1", "g2"]);
    }

    #[test]
    fn test_round_trip_through_read_and_write() -> Result<(), Box<dyn std::error::Error>> {
        let data = "a,b,c\nd,e,f\n";
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data.as_bytes());

        let rows = read_rows(&mut reader)?;
        assert_eq!(rows.len(), 2);

        let mut out = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut out);
            write_rows(&mut writer, &rows)?;
        }

        assert_eq!(String::from_utf8(out)?, data);

        Ok(())
    }
}
