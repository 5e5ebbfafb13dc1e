//! Named column roles for the tables the engine consumes.
//!
//! The engine never assumes fixed column positions internally. Callers map
//! each named role to a 0-based column index once, up front, and the mapping
//! is validated at construction rather than assumed throughout. The defaults
//! reproduce the layouts of the tables the pipelines were originally built
//! around.

/// An error related to a column configuration.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// Two roles were mapped to the same column index.
    DuplicateColumn(usize),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::DuplicateColumn(index) => {
                write!(f, "column index {} is assigned to more than one role", index)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Ensures a set of role indices contains no duplicates.
fn ensure_distinct(indices: &[usize]) -> Result<(), Error> {
    for (i, index) in indices.iter().enumerate() {
        if indices[i + 1..].contains(index) {
            return Err(Error::DuplicateColumn(*index));
        }
    }

    Ok(())
}

/// The column roles of a point record table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PointColumns {
    /// The column holding the point position.
    position: usize,
    /// The column holding the category key.
    key: usize,
    /// The column holding the auxiliary value carried through to the output.
    value: usize,
}

impl PointColumns {
    /// Attempts to create a new [`PointColumns`].
    ///
    /// # Examples
    ///
    /// ```
    /// use metmatch::columns::Error;
    /// use metmatch::columns::PointColumns;
    ///
    /// let columns = PointColumns::try_new(0, 3, 2)?;
    /// assert_eq!(columns.position(), 0);
    ///
    /// let err = PointColumns::try_new(0, 0, 2).unwrap_err();
    /// assert_eq!(err, Error::DuplicateColumn(0));
    ///
    /// # Ok::<(), Error>(())
    /// ```
    pub fn try_new(position: usize, key: usize, value: usize) -> Result<Self, Error> {
        ensure_distinct(&[position, key, value])?;

        Ok(PointColumns {
            position,
            key,
            value,
        })
    }

    /// The column index of the point position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The column index of the category key.
    pub fn key(&self) -> usize {
        self.key
    }

    /// The column index of the auxiliary value.
    pub fn value(&self) -> usize {
        self.value
    }
}

impl Default for PointColumns {
    fn default() -> Self {
        PointColumns {
            position: 0,
            key: 3,
            value: 2,
        }
    }
}

/// The column roles of an interval record table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IntervalColumns {
    /// The column holding the inclusive interval start.
    start: usize,
    /// The column holding the inclusive interval end.
    end: usize,
    /// The column holding the category key.
    key: usize,
    /// The column holding the strand indicator, if any.
    strand: Option<usize>,
}

impl IntervalColumns {
    /// Attempts to create a new [`IntervalColumns`].
    ///
    /// # Examples
    ///
    /// ```
    /// use metmatch::columns::IntervalColumns;
    ///
    /// let columns = IntervalColumns::try_new(4, 5, 7, Some(6))?;
    /// assert_eq!(columns.strand(), Some(6));
    ///
    /// # Ok::<(), metmatch::columns::Error>(())
    /// ```
    pub fn try_new(
        start: usize,
        end: usize,
        key: usize,
        strand: Option<usize>,
    ) -> Result<Self, Error> {
        let mut indices = vec![start, end, key];
        if let Some(strand) = strand {
            indices.push(strand);
        }
        ensure_distinct(&indices)?;

        Ok(IntervalColumns {
            start,
            end,
            key,
            strand,
        })
    }

    /// The column index of the interval start.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The column index of the interval end.
    pub fn end(&self) -> usize {
        self.end
    }

    /// The column index of the category key.
    pub fn key(&self) -> usize {
        self.key
    }

    /// The column index of the strand indicator, if one is configured.
    pub fn strand(&self) -> Option<usize> {
        self.strand
    }
}

impl Default for IntervalColumns {
    fn default() -> Self {
        IntervalColumns {
            start: 4,
            end: 5,
            key: 7,
            strand: Some(6),
        }
    }
}

/// The column roles used when building cross-column uniqueness sets.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UniqueColumns {
    /// The first value column.
    left: usize,
    /// The second value column.
    right: usize,
    /// The auxiliary tag column, if any.
    tag: Option<usize>,
}

impl UniqueColumns {
    /// Attempts to create a new [`UniqueColumns`].
    pub fn try_new(left: usize, right: usize, tag: Option<usize>) -> Result<Self, Error> {
        let mut indices = vec![left, right];
        if let Some(tag) = tag {
            indices.push(tag);
        }
        ensure_distinct(&indices)?;

        Ok(UniqueColumns { left, right, tag })
    }

    /// The column index of the first value column.
    pub fn left(&self) -> usize {
        self.left
    }

    /// The column index of the second value column.
    pub fn right(&self) -> usize {
        self.right
    }

    /// The column index of the auxiliary tag column, if one is configured.
    pub fn tag(&self) -> Option<usize> {
        self.tag
    }
}

impl Default for UniqueColumns {
    fn default() -> Self {
        UniqueColumns {
            left: 1,
            right: 2,
            tag: Some(5),
        }
    }
}

/// The column roles of the range table consumed by the uniqueness variant.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RangeColumns {
    /// The column holding the inclusive range start.
    start: usize,
    /// The column holding the inclusive range end.
    end: usize,
    /// The column whose value labels the range in the output.
    label: usize,
}

impl RangeColumns {
    /// Attempts to create a new [`RangeColumns`].
    pub fn try_new(start: usize, end: usize, label: usize) -> Result<Self, Error> {
        ensure_distinct(&[start, end, label])?;
        Ok(RangeColumns { start, end, label })
    }

    /// The column index of the range start.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The column index of the range end.
    pub fn end(&self) -> usize {
        self.end
    }

    /// The column index of the range label.
    pub fn label(&self) -> usize {
        self.label
    }
}

impl Default for RangeColumns {
    fn default() -> Self {
        RangeColumns {
            start: 4,
            end: 5,
            label: 2,
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_valid_configurations() -> Result<(), Box<dyn std::error::Error>> {
        let columns = PointColumns::try_new(0, 3, 2)?;
        assert_eq!(columns.position(), 0);
        assert_eq!(columns.key(), 3);
        assert_eq!(columns.value(), 2);

        let columns = IntervalColumns::try_new(4, 5, 7, None)?;
        assert_eq!(columns.strand(), None);

        Ok(())
    }

    #[test]
    fn test_duplicate_roles_are_rejected() {
        let err = PointColumns::try_new(1, 1, 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "column index 1 is assigned to more than one role"
        );

        let err = IntervalColumns::try_new(4, 5, 7, Some(4)).unwrap_err();
        assert_eq!(err, Error::DuplicateColumn(4));

        let err = UniqueColumns::try_new(1, 2, Some(2)).unwrap_err();
        assert_eq!(err, Error::DuplicateColumn(2));

        let err = RangeColumns::try_new(4, 4, 2).unwrap_err();
        assert_eq!(err, Error::DuplicateColumn(4));
    }

    #[test]
    fn test_defaults_match_the_original_table_layouts() {
        let columns = PointColumns::default();
        assert_eq!(
            (columns.position(), columns.key(), columns.value()),
            (0, 3, 2)
        );

        let columns = IntervalColumns::default();
        assert_eq!(
            (columns.start(), columns.end(), columns.key(), columns.strand()),
            (4, 5, 7, Some(6))
        );

        let columns = UniqueColumns::default();
        assert_eq!(
            (columns.left(), columns.right(), columns.tag()),
            (1, 2, Some(5))
        );

        let columns = RangeColumns::default();
        assert_eq!(
            (columns.start(), columns.end(), columns.label()),
            (4, 5, 2)
        );
    }
}
