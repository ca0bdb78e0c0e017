//! Collector contract and the fluent pivot configuration surface.
//!
//! The pivot participates in a generic fold pipeline through three hooks:
//! a supplier producing a fresh accumulator, an accumulate step folding one
//! item in, and a finisher turning the accumulator into the result. For a
//! pivot the finisher is the identity - the accumulated table is the result.

use log::debug;

use crate::error::PivotError;
use crate::pivot::Pivot;
use crate::select::Selector;
use crate::value::Record;

// ============================================================================
// COLLECTOR CONTRACT
// ============================================================================

/// A terminal reduction over a stream of items.
pub trait Collector<T> {
    type Acc;
    type Out;

    /// Produces a fresh, empty accumulator.
    fn supplier(&self) -> Result<Self::Acc, PivotError>;

    /// Folds one item into the accumulator.
    fn accumulate(&self, acc: &mut Self::Acc, item: T) -> Result<(), PivotError>;

    /// Turns the accumulator into the final result.
    fn finish(&self, acc: Self::Acc) -> Self::Out;
}

/// Folds every item of `items` through `collector`.
pub fn collect<T, I, C>(items: I, collector: &C) -> Result<C::Out, PivotError>
where
    I: IntoIterator<Item = T>,
    C: Collector<T>,
{
    let mut acc = collector.supplier()?;
    let mut folded = 0usize;
    for item in items {
        collector.accumulate(&mut acc, item)?;
        folded += 1;
    }
    debug!("collected {} item(s)", folded);
    Ok(collector.finish(acc))
}

// ============================================================================
// PIVOT CONFIGURATION
// ============================================================================

/// Fluent configuration collecting a record stream into a [`Pivot`].
///
/// Field keys (names or positional indices) and closures are both accepted
/// wherever a selector is expected; resolution happens at the builder call,
/// never during row processing.
///
/// ```
/// use pivot_facts::{collect, InPivot, Record};
///
/// let rows = vec![
///     Record::new().with("type", "good").with("occurrences", 100),
///     Record::new().with("type", "bad").with("occurrences", 4),
/// ];
/// let pivot = collect(rows, &InPivot::new()
///     .grouping_by("type")
///     .summing("occurrences"))
///     .unwrap();
/// assert_eq!(pivot.total(None).unwrap().get("occurrences"), Some(104.0));
/// ```
#[derive(Debug, Default)]
pub struct InPivot {
    group_by: Vec<Selector>,
    spread_on: Option<Selector>,
    aggregates: Vec<(String, Selector)>,
}

impl InPivot {
    pub fn new() -> Self {
        InPivot::default()
    }

    /// Appends a group-by level.
    pub fn grouping_by(mut self, key: impl Into<Selector>) -> Self {
        self.group_by.push(key.into());
        self
    }

    /// Sets the spread (cross-tabulation) selector.
    pub fn spreading_on(mut self, key: impl Into<Selector>) -> Self {
        self.spread_on = Some(key.into());
        self
    }

    /// Appends a sum aggregate. A field key names the aggregate after
    /// itself; a closure is named by its zero-based position among the
    /// aggregates configured so far.
    pub fn summing(self, key: impl Into<Selector>) -> Self {
        let selector = key.into();
        let name = match selector.label() {
            Some(label) => label.to_string(),
            None => self.aggregates.len().to_string(),
        };
        self.summing_as(selector, name)
    }

    /// Appends a sum aggregate under an explicit name.
    pub fn summing_as(mut self, key: impl Into<Selector>, name: impl Into<String>) -> Self {
        self.aggregates.push((name.into(), key.into()));
        self
    }

    /// Builds a configured, empty pivot. Fails when no group-by level was
    /// configured.
    pub fn create(&self) -> Result<Pivot, PivotError> {
        Pivot::new(
            self.group_by.clone(),
            self.spread_on.clone(),
            self.aggregates.clone(),
        )
    }
}

impl Collector<Record> for InPivot {
    type Acc = Pivot;
    type Out = Pivot;

    fn supplier(&self) -> Result<Pivot, PivotError> {
        self.create()
    }

    fn accumulate(&self, acc: &mut Pivot, record: Record) -> Result<(), PivotError> {
        acc.add(&record)
    }

    fn finish(&self, acc: Pivot) -> Pivot {
        acc
    }
}
