//! Uniqueness-constrained deduplication across columns.
//!
//! The building block is the *exactly-once set*: the subset of a column's
//! values whose occurrence count in that column equals one. Two such sets
//! (from two columns of the same table) can be intersected into a
//! cross-unique candidate set, and a candidate can further be rejected when
//! the auxiliary tags seen alongside its two occurrences collide — a
//! deliberate tightening that guards against coincidental numeric equality
//! across unrelated entities sharing a tag.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::core::Offset;
use crate::core::Position;

/// The fixed shift subtracted from a probed value before it is looked up in a
/// cross-unique set.
///
/// Like the strand constants in [`crate::core::offset`], this is a parameter
/// of the coordinate convention the companion table is expressed in.
pub const PROBE_OFFSET: f64 = 3.0;

/// Computes the exactly-once set of a sequence of values.
///
/// A value is a member iff its occurrence count in the input equals one.
///
/// # Examples
///
/// ```
/// use metmatch::core::Position;
/// use metmatch::unique;
///
/// let values = ["3.0", "3.0", "5.0"]
///     .iter()
///     .map(|s| s.parse::<Position>())
///     .collect::<Result<Vec<_>, _>>()?;
///
/// let once = unique::exactly_once(values);
/// assert_eq!(once.len(), 1);
/// assert!(once.contains(&"5".parse::<Position>()?));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn exactly_once<I>(values: I) -> HashSet<Position>
where
    I: IntoIterator<Item = Position>,
{
    let mut counts = HashMap::<Position, usize>::new();

    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count == 1)
        .map(|(value, _)| value)
        .collect()
}

/// One column's values together with the auxiliary tags observed next to
/// each value.
#[derive(Clone, Debug, Default)]
pub struct TaggedColumn {
    /// Every value observed in the column, in input order (duplicates kept).
    values: Vec<Position>,
    /// The set of tags observed alongside each value.
    tags: HashMap<Position, HashSet<String>>,
}

impl TaggedColumn {
    /// Creates an empty [`TaggedColumn`].
    pub fn new() -> Self {
        TaggedColumn::default()
    }

    /// Records one observation of a value, optionally with a tag.
    pub fn push(&mut self, value: Position, tag: Option<&str>) {
        self.values.push(value);

        if let Some(tag) = tag {
            self.tags.entry(value).or_default().insert(tag.to_string());
        }
    }

    /// The number of observations recorded so far.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no observations have been recorded.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Computes the exactly-once set of this column.
    pub fn exactly_once(&self) -> HashSet<Position> {
        exactly_once(self.values.iter().copied())
    }

    /// The tags observed alongside a value, if any were recorded.
    pub fn tags(&self, value: Position) -> Option<&HashSet<String>> {
        self.tags.get(&value)
    }
}

/// The cross-column candidate set: values unique in each of two columns.
#[derive(Clone, Debug)]
pub struct CrossUnique {
    /// The intersection of the two columns' exactly-once sets.
    members: HashSet<Position>,
    /// The tag sets of the first column, restricted to members.
    left_tags: HashMap<Position, HashSet<String>>,
    /// The tag sets of the second column, restricted to members.
    right_tags: HashMap<Position, HashSet<String>>,
}

impl CrossUnique {
    /// Builds the cross-unique set of two tagged columns.
    ///
    /// # Examples
    ///
    /// ```
    /// use metmatch::core::Position;
    /// use metmatch::unique::CrossUnique;
    /// use metmatch::unique::TaggedColumn;
    ///
    /// let mut left = TaggedColumn::new();
    /// for value in ["3.0", "3.0", "5.0"] {
    ///     left.push(value.parse::<Position>()?, None);
    /// }
    ///
    /// let mut right = TaggedColumn::new();
    /// for value in ["5.0", "7.0", "7.0"] {
    ///     right.push(value.parse::<Position>()?, None);
    /// }
    ///
    /// let cross = CrossUnique::new(&left, &right);
    /// assert!(cross.contains("5".parse::<Position>()?));
    /// assert!(!cross.contains("3".parse::<Position>()?));
    /// assert!(!cross.contains("7".parse::<Position>()?));
    ///
    /// # Ok::<(), metmatch::core::position::Error>(())
    /// ```
    pub fn new(left: &TaggedColumn, right: &TaggedColumn) -> Self {
        let left_once = left.exactly_once();
        let right_once = right.exactly_once();

        let members = left_once
            .intersection(&right_once)
            .copied()
            .collect::<HashSet<_>>();

        let left_tags = members
            .iter()
            .filter_map(|value| left.tags(*value).map(|tags| (*value, tags.clone())))
            .collect();

        let right_tags = members
            .iter()
            .filter_map(|value| right.tags(*value).map(|tags| (*value, tags.clone())))
            .collect();

        CrossUnique {
            members,
            left_tags,
            right_tags,
        }
    }

    /// The number of members in the candidate set.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the candidate set is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether a value occurs exactly once in both columns.
    pub fn contains(&self, value: Position) -> bool {
        self.members.contains(&value)
    }

    /// Whether a value is a member *and* its per-column tag sets are
    /// disjoint.
    ///
    /// A member whose two occurrences share any tag is rejected as ambiguous:
    /// numerically unique, but not unique in the relevant sense.
    pub fn accepts(&self, value: Position) -> bool {
        if !self.contains(value) {
            return false;
        }

        match (self.left_tags.get(&value), self.right_tags.get(&value)) {
            (Some(left), Some(right)) => left.is_disjoint(right),
            _ => true,
        }
    }

    /// Applies the tag-checked acceptance predicate to `value - PROBE_OFFSET`.
    ///
    /// Used when flagging rows of a companion table whose probed column is
    /// expressed [`PROBE_OFFSET`] above the indexed coordinates. A shifted
    /// value that falls outside the finite range is simply not a member.
    pub fn probe(&self, value: Position) -> bool {
        match Position::try_new(value.get() - PROBE_OFFSET) {
            Ok(target) => self.accepts(target),
            Err(_) => false,
        }
    }

    /// Computes the offsets of the members contained in an inclusive range.
    ///
    /// Containment is the literal `start ≤ value ≤ end` against the whole
    /// candidate set (no category-key join in this variant), and each
    /// contained value is reported as the plain offset `value - start`, in
    /// ascending order. No strand transform applies here.
    ///
    /// # Examples
    ///
    /// ```
    /// use metmatch::core::Position;
    /// use metmatch::unique::CrossUnique;
    /// use metmatch::unique::TaggedColumn;
    ///
    /// let mut left = TaggedColumn::new();
    /// let mut right = TaggedColumn::new();
    /// for value in ["105", "110"] {
    ///     left.push(value.parse::<Position>()?, None);
    ///     right.push(value.parse::<Position>()?, None);
    /// }
    ///
    /// let cross = CrossUnique::new(&left, &right);
    /// let offsets = cross.offsets_within("100".parse()?, "112".parse()?);
    ///
    /// let rendered = offsets
    ///     .iter()
    ///     .map(|offset| offset.to_string())
    ///     .collect::<Vec<_>>()
    ///     .join(",");
    /// assert_eq!(rendered, "5,10");
    ///
    /// # Ok::<(), metmatch::core::position::Error>(())
    /// ```
    pub fn offsets_within(&self, start: Position, end: Position) -> Vec<Offset> {
        let mut offsets = self
            .members
            .iter()
            .filter(|value| start.get() <= value.get() && value.get() <= end.get())
            .map(|value| Offset::between(*value, start))
            .collect::<Vec<_>>();

        offsets.sort();
        offsets
    }
}
