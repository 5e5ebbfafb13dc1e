//! A builder for a [`Machine`].

use std::collections::HashMap;
use std::io::Read;

use crate::columns::PointColumns;
use crate::core::Position;
use crate::matcher::Machine;
use crate::record::PointRecord;

/// An error related to building a [`Machine`].
#[derive(Debug)]
pub enum Error {
    /// An error reading the underlying table.
    Csv(csv::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Csv(err) => write!(f, "csv error: {}", err),
        }
    }
}

impl std::error::Error for Error {}

/// A builder for a [`Machine`].
#[derive(Debug, Default)]
pub struct Builder;

impl Builder {
    /// Builds a [`Machine`] by consuming a reader of point record rows.
    ///
    /// Rows that fail to parse as point records (non-numeric or missing
    /// position, empty category key, or too few fields for a configured role)
    /// are skipped and counted on the resulting machine; I/O and
    /// table-structure errors are fatal. Building is idempotent: identical
    /// input always yields an index with identical contents.
    ///
    /// # Examples
    ///
    /// ```
    /// use metmatch::columns::PointColumns;
    /// use metmatch::matcher::machine;
    ///
    /// let data = "105,,x,A\nbad,,y,A\n110,,y,A\n";
    /// let reader = csv::ReaderBuilder::new()
    ///     .has_headers(false)
    ///     .flexible(true)
    ///     .from_reader(data.as_bytes());
    ///
    /// let machine = machine::Builder::default()
    ///     .try_build_from(reader, &PointColumns::try_new(0, 3, 2)?)?;
    ///
    /// assert_eq!(machine.points(), 2);
    /// assert_eq!(machine.skipped(), 1);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build_from<R>(
        &self,
        mut reader: csv::Reader<R>,
        columns: &PointColumns,
    ) -> Result<Machine, Error>
    where
        R: Read,
    {
        let mut index = HashMap::<String, Vec<(Position, String)>>::new();
        let mut skipped = 0usize;

        for result in reader.records() {
            let record = result.map_err(Error::Csv)?;

            match PointRecord::parse(&record, columns) {
                Ok(point) => {
                    let (position, key, value) = point.into_parts();
                    index.entry(key).or_default().push((position, value));
                }
                Err(_) => skipped += 1,
            }
        }

        Ok(Machine::new(index, skipped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(data: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data.as_bytes())
    }

    #[test]
    fn test_building_groups_points_by_key() -> Result<(), Box<dyn std::error::Error>> {
        let machine = Builder::default()
            .try_build_from(reader("105,,x,A\n110,,y,A\n300,,z,B\n"), &PointColumns::default())?;

        assert_eq!(machine.len(), 2);
        assert_eq!(machine.points(), 3);
        assert_eq!(machine.skipped(), 0);

        Ok(())
    }

    #[test]
    fn test_unparseable_rows_are_skipped_and_counted() -> Result<(), Box<dyn std::error::Error>> {
        // A non-numeric position, a missing key, and a short row.
        let machine = Builder::default().try_build_from(
            reader("105,,x,A\npos,,y,A\n110,,z,\n42\n"),
            &PointColumns::default(),
        )?;

        assert_eq!(machine.points(), 1);
        assert_eq!(machine.skipped(), 3);

        Ok(())
    }

    #[test]
    fn test_empty_input_builds_an_empty_machine() -> Result<(), Box<dyn std::error::Error>> {
        let machine = Builder::default().try_build_from(reader(""), &PointColumns::default())?;

        assert!(machine.is_empty());
        assert_eq!(machine.skipped(), 0);

        Ok(())
    }
}
