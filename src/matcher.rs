//! Facilities for matching interval records against indexed points.

pub mod machine;

pub use machine::Machine;
