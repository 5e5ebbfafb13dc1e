//! The records the engine reconciles.

pub mod interval;
pub mod point;

pub use interval::IntervalRecord;
pub use point::PointRecord;
