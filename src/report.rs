//! The assembled result of matching one interval.

use crate::core::Offset;

/// The flag rendered for an interval with at least one match.
const MATCHED_FLAG: &str = "y";

/// The flag rendered for an interval with no matches.
const UNMATCHED_FLAG: &str = "n";

/// The delimiter used to join matched offsets and carried values.
const FIELD_DELIMITER: &str = ",";

/// The result of matching one interval against the point index.
///
/// Offsets are held in ascending order with their carried auxiliary values in
/// the same order. The report renders as two comma-joined strings plus a
/// `y`/`n` presence flag, appended to the original interval row.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchReport {
    /// The matched offsets, ascending.
    offsets: Vec<Offset>,
    /// The carried auxiliary values, in the same order as the offsets.
    values: Vec<String>,
}

impl MatchReport {
    /// Assembles a report from matched, normalized offsets and their carried
    /// values.
    ///
    /// The matches are sorted ascending by offset with a stable sort, so ties
    /// keep their first-seen order and the output is deterministic for
    /// deterministic input order.
    ///
    /// # Examples
    ///
    /// ```
    /// use metmatch::core::Offset;
    /// use metmatch::core::Position;
    /// use metmatch::report::MatchReport;
    ///
    /// let start = "100".parse::<Position>()?;
    /// let matches = vec![
    ///     (Offset::between("110".parse()?, start), String::from("y")),
    ///     (Offset::between("105".parse()?, start), String::from("x")),
    /// ];
    ///
    /// let report = MatchReport::assemble(matches);
    /// assert_eq!(report.rendered_offsets(), "5,10");
    /// assert_eq!(report.rendered_values(), "x,y");
    /// assert_eq!(report.flag(), "y");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn assemble(mut matches: Vec<(Offset, String)>) -> Self {
        matches.sort_by(|(a, _), (b, _)| a.cmp(b));

        let (offsets, values) = matches.into_iter().unzip();

        MatchReport { offsets, values }
    }

    /// Creates a report with no matches.
    pub fn empty() -> Self {
        MatchReport {
            offsets: Vec::new(),
            values: Vec::new(),
        }
    }

    /// The matched offsets, ascending.
    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    /// The carried auxiliary values, in offset order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// The number of matches in the report.
    pub fn count(&self) -> usize {
        self.offsets.len()
    }

    /// Whether the report holds at least one match.
    pub fn has_matches(&self) -> bool {
        !self.offsets.is_empty()
    }

    /// The presence flag as rendered in the output (`y` or `n`).
    pub fn flag(&self) -> &'static str {
        if self.has_matches() {
            MATCHED_FLAG
        } else {
            UNMATCHED_FLAG
        }
    }

    /// The matched offsets rendered as a comma-joined string.
    ///
    /// Zero matches render as an empty string.
    pub fn rendered_offsets(&self) -> String {
        self.offsets
            .iter()
            .map(|offset| offset.to_string())
            .collect::<Vec<_>>()
            .join(FIELD_DELIMITER)
    }

    /// The carried values rendered as a comma-joined string.
    ///
    /// Zero matches render as an empty string.
    pub fn rendered_values(&self) -> String {
        self.values.join(FIELD_DELIMITER)
    }

    /// Appends the rendered report fields to a copy of the given row.
    ///
    /// The output row is the input row plus three fields: the rendered
    /// offsets, the rendered values, and the presence flag. No existing field
    /// is replaced.
    pub fn append_to(&self, row: &csv::StringRecord) -> csv::StringRecord {
        let mut out = row.clone();
        out.push_field(&self.rendered_offsets());
        out.push_field(&self.rendered_values());
        out.push_field(self.flag());
        out
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::core::Position;

    fn offset(position: &str, start: &str) -> Offset {
        Offset::between(
            position.parse::<Position>().unwrap(),
            start.parse::<Position>().unwrap(),
        )
    }

    #[test]
    fn test_assembly_sorts_ascending_by_offset() {
        let report = MatchReport::assemble(vec![
            (offset("110", "100"), String::from("y")),
            (offset("105", "100"), String::from("x")),
            (offset("95", "100"), String::from("w")),
        ]);

        assert_eq!(report.rendered_offsets(), "-5,5,10");
        assert_eq!(report.rendered_values(), "w,x,y");
        assert_eq!(report.count(), 3);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let report = MatchReport::assemble(vec![
            (offset("105", "100"), String::from("first")),
            (offset("105", "100"), String::from("second")),
            (offset("103", "100"), String::from("low")),
        ]);

        assert_eq!(report.rendered_values(), "low,first,second");
    }

    #[test]
    fn test_empty_report_renders_empty_strings() {
        let report = MatchReport::empty();

        assert_eq!(report.rendered_offsets(), "");
        assert_eq!(report.rendered_values(), "");
        assert_eq!(report.flag(), "n");
        assert!(!report.has_matches());
    }

    #[test]
    fn test_fields_are_appended_without_replacing_any() {
        let row = csv::StringRecord::from(vec!["g1", "100", "112"]);
        let report = MatchReport::assemble(vec![(offset("107", "100"), String::from("x"))]);

        let out = report.append_to(&row);
        let fields = out.iter().collect::<Vec<_>>();
        assert_eq!(fields, vec!["g1", "100", "112", "7", "x", "y"]);
    }
}
