//! Core models shared by the roimeth crates.
//!
//! A [`Region`](models::Region) is one line of a BED-like file and a
//! [`RegionSet`](models::RegionSet) is the whole file, kept in file order.
pub mod errors;
pub mod models;
pub mod utils;

pub use errors::RegionSetError;
