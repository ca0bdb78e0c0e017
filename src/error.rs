//! Error taxonomy for pivot configuration, population and queries.

use thiserror::Error;

use crate::value::{Key, Value};

#[derive(Error, Debug)]
pub enum PivotError {
    /// Grouping is mandatory; a pivot without at least one group-by level
    /// cannot be constructed.
    #[error("group by cannot be empty")]
    EmptyGroupBy,

    /// A query path carries more segments than the pivot has group levels.
    /// Reported before traversal, distinct from a value simply not existing.
    #[error("query path has {given} segments, but only {depth} group levels are configured")]
    DepthMismatch { given: usize, depth: usize },

    /// A group-by or spread value in a query path does not exist in the tree.
    #[error("no fact under {0}")]
    PathNotFound(Value),

    /// A field-key selector addressed a field the record does not have.
    #[error("record has no field {0}")]
    NoSuchField(Key),

    /// An aggregate selector produced a value that is not a number.
    #[error("aggregate '{aggregate}' produced non-numeric value {value}")]
    NonNumeric { aggregate: String, value: Value },

    /// Average over a fact that has seen no records (zero count).
    #[error("average is undefined: fact holds no records")]
    EmptyFact,

    /// Percentage against a grand total of zero.
    #[error("percentage is undefined: grand total of '{0}' is zero")]
    ZeroTotal(String),
}
