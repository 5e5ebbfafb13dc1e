//! Core functionality used across the crate.

pub mod offset;
pub mod position;
pub mod strand;

pub use offset::Offset;
pub use position::Position;
pub use strand::Strand;
