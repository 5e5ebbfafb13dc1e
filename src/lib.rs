//! `metmatch` is a crate for reconciling genomic point records against
//! interval ranges.
//!
//! The crate provides three main points of entry:
//!
//! - Annotating interval rows with the points they contain, normalized to
//!   strand-aware offsets.
//! - Reporting, per range, the values that occur exactly once in each of two
//!   columns of a companion table.
//! - Flagging rows of a table by probing a shifted value against that same
//!   cross-unique set.
//!
//! All three are deterministic, single-pass batch transforms over delimited
//! tables: the lookup side is fully materialized up front, the driving table
//! is then mapped row by row in input order, and the run terminates. Rows
//! that fail to parse are recovered locally (skipped or written through
//! unmatched, depending on the pipeline) and surfaced in the run's
//! [`pipeline::Summary`]; they never halt a run.
//!
//! ## Matching points against intervals
//!
//! The core facility is the [`matcher::Machine`], an index of point records
//! keyed by their category. A [`Machine`] cannot be instantiated directly.
//! Instead, you should use [`matcher::machine::Builder`] and the associated
//! [`matcher::machine::Builder::try_build_from()`] method to construct one
//! from a table of point records.
//!
//! Once built, [`Machine::report()`](matcher::Machine::report) takes an
//! [`record::IntervalRecord`] and produces a [`MatchReport`]: the offsets of
//! every same-category point the interval contains, normalized by the
//! interval's strand, paired with the points' carried values and sorted in
//! ascending offset order.
//!
//! ```
//! use metmatch::columns::IntervalColumns;
//! use metmatch::columns::PointColumns;
//! use metmatch::matcher::machine;
//! use metmatch::record::IntervalRecord;
//!
//! let points = csv::ReaderBuilder::new()
//!     .has_headers(false)
//!     .flexible(true)
//!     .from_reader(&b"105,,x,A\n110,,y,A\n"[..]);
//!
//! let machine = machine::Builder::default()
//!     .try_build_from(points, &PointColumns::default())?;
//!
//! let row = csv::StringRecord::from(vec!["g1", "", "", "", "100", "112", "+", "A"]);
//! let interval = IntervalRecord::parse(&row, &IntervalColumns::default())?;
//!
//! let report = machine.report(&interval);
//! assert_eq!(report.rendered_offsets(), "7,12");
//! assert_eq!(report.flag(), "y");
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Running whole pipelines
//!
//! Most users will not want to drive the matcher row by row. The
//! [`pipeline`] module wraps each of the three transforms above into a
//! single call that reads, maps, and writes entire tables and returns the
//! run's [`pipeline::Summary`]. The [`table`] module holds the smaller
//! row-level utilities (column removal, non-emptiness flagging, numeric
//! threshold filtering) that accompany the pipelines.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod columns;
pub mod core;
pub mod matcher;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod table;
pub mod unique;

pub use matcher::Machine;

pub use self::report::MatchReport;
