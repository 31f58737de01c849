//! Performance analytics derived from a trade collection.
//!
//! Everything here is a pure function of `(trades, adjustments, settings)`:
//! no storage access, no wall clock, bit-identical output for identical
//! input. Every ratio with a zero denominator resolves to a documented
//! sentinel, never NaN or infinity.

pub mod buckets;
pub mod chart;
pub mod equity;
pub mod snapshot;

pub use buckets::*;
pub use chart::*;
pub use equity::*;
pub use snapshot::*;
