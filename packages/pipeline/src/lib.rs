#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Report list derivation for the auto watch map.
//!
//! Everything here is a pure function over an immutable snapshot of the
//! fetched reports:
//!
//! 1. [`filter`] narrows thefts and sightings by type and fuzzy plate query.
//! 2. [`sort`] orders the result by time, plate or distance.
//! 3. [`selection`] resolves clicks to records and styles markers.
//! 4. [`relation`] connects a theft to its sightings with line geometry.
//!
//! [`session::MapSession`] ties the stages together for one map view.

pub mod distance;
pub mod filter;
pub mod relation;
pub mod report_ref;
pub mod search;
pub mod selection;
pub mod session;
pub mod sort;
pub mod time;

pub use report_ref::ReportRef;
