//! Streaming pivot tables.
//!
//! This crate builds an in-memory pivot table from a stream of records:
//! rows are grouped by one or more keys, optionally spread (cross-tabulated)
//! on a secondary key, and running aggregates are kept per group and column.
//! Population is incremental - each [`Pivot::add`] touches exactly one
//! root-to-leaf path of the fact tree - and queries may be interleaved with
//! it, always reflecting the records added so far.
//!
//! Layers:
//! - `value`: records, field keys and hashable values
//! - `select`: key specifier resolution into uniform extraction functions
//! - `fact`: the accumulator tree nodes (HOW totals are kept)
//! - `pivot`: construction, `add`, and the path-based queries
//! - `collect`: the collector contract and the fluent configuration surface

pub mod collect;
pub mod error;
pub mod fact;
pub mod pivot;
pub mod select;
pub mod value;

pub use collect::{collect, Collector, InPivot};
pub use error::PivotError;
pub use fact::{ColumnFact, Fact, Totals};
pub use pivot::Pivot;
pub use select::Selector;
pub use value::{Key, OrderedFloat, Record, Value};
