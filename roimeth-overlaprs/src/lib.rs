//! Genomic interval overlap operations for roimeth.
//!
//! All overlap computation lives here: the [`AIList`] index answers
//! single-chromosome overlap queries, and [`IntervalSetOps`] /
//! [`RegionIndex`] build the set algebra (mask subtraction, unique
//! intersection, per-region hit enumeration) on top of it.
//!
//! ```rust
//! use roimeth_core::models::{Region, RegionSet};
//! use roimeth_overlaprs::{IntervalSetOps, RegionIndex};
//!
//! let cpg = |start: u32, rest: &str| Region {
//!     chr: "chr1".to_string(),
//!     start,
//!     end: start + 1,
//!     rest: Some(rest.to_string()),
//! };
//! let sample = RegionSet::from(vec![cpg(110, "0.80-10"), cpg(150, "0.50-4"), cpg(900, "1-2")]);
//! let mask = RegionSet::from(vec![Region { chr: "chr1".into(), start: 150, end: 151, rest: None }]);
//! let roi = RegionSet::from(vec![Region { chr: "chr1".into(), start: 100, end: 200, rest: None }]);
//!
//! let kept = sample.subtract(&mask).intersect_any(&roi);
//! let index = RegionIndex::new(&kept);
//! assert_eq!(index.all_hits(&roi.regions[0]).len(), 1);
//! ```

/// Augmented Interval List implementation.
///
/// See [`AIList`] for details.
pub mod ailist;

/// Subtract, intersect and hit enumeration over region sets.
pub mod interval_set;

/// Core traits for overlap operations.
///
/// See [`Overlapper`] for the main trait.
pub mod traits;

// re-exports
pub use self::ailist::AIList;
pub use self::interval_set::{IntervalSetOps, RegionIndex};
pub use self::traits::{Interval, Overlapper};
