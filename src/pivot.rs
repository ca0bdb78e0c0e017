//! The pivot table core: construction, incremental `add`, path queries.
//!
//! A pivot owns its entire fact tree. `add` walks exactly one root-to-leaf
//! path per record (the values of the group-by selectors, in order), creating
//! missing nodes on the way and folding the record's aggregate contributions
//! into every node it passes, so totals stay consistent at every depth. The
//! terminal level is implicit: the accumulate step runs once at the root and
//! once per group level after descending, which gives the innermost group
//! value a leaf fact of its own.
//!
//! Queries are read-only traversals and may be interleaved with population;
//! they always reflect the records added so far. There is no internal
//! locking: at most one writer, queries share `&Pivot` freely once
//! population has ceased.

use std::sync::Arc;

use log::debug;
use smallvec::SmallVec;

use crate::error::PivotError;
use crate::fact::{ColumnFact, Fact, Slots, Totals};
use crate::select::Selector;
use crate::value::{Record, Value};

/// An append-only, incrementally updated aggregate tree.
pub struct Pivot {
    group_by: Vec<Selector>,
    spread_on: Option<Selector>,
    selects: Vec<Selector>,
    names: Arc<[String]>,
    root: Fact,
}

impl Pivot {
    /// Creates an empty pivot table.
    ///
    /// `group_by` must hold at least one selector; `aggregates` pairs each
    /// aggregate name with the selector producing its per-record numeric
    /// contribution. No aggregates is legal - only counts are kept then.
    pub fn new(
        group_by: Vec<Selector>,
        spread_on: Option<Selector>,
        aggregates: Vec<(String, Selector)>,
    ) -> Result<Self, PivotError> {
        if group_by.is_empty() {
            return Err(PivotError::EmptyGroupBy);
        }
        let (names, selects): (Vec<String>, Vec<Selector>) = aggregates.into_iter().unzip();
        let names: Arc<[String]> = names.into();
        debug!(
            "new pivot: {} group level(s), {} aggregate(s), spreading: {}",
            group_by.len(),
            names.len(),
            spread_on.is_some()
        );
        Ok(Pivot {
            group_by,
            spread_on,
            selects,
            root: Fact::new(Arc::clone(&names)),
            names,
        })
    }

    /// Number of configured group-by levels.
    pub fn depth(&self) -> usize {
        self.group_by.len()
    }

    /// Configured aggregate names, in configuration order.
    pub fn aggregates(&self) -> &[String] {
        &self.names
    }

    /// Adds one record, updating counts and totals along its group path.
    ///
    /// All selectors are applied before the first mutation, so a failing
    /// selector aborts the call without leaving a partially-applied record.
    /// O(depth x aggregates); totals accumulate in call order.
    pub fn add(&mut self, record: &Record) -> Result<(), PivotError> {
        let mut sums: Slots = SmallVec::with_capacity(self.selects.len());
        for (name, select) in self.names.iter().zip(&self.selects) {
            let value = select.select(record)?;
            let sum = value.as_f64().ok_or_else(|| PivotError::NonNumeric {
                aggregate: name.clone(),
                value,
            })?;
            sums.push(sum);
        }
        let spread = match &self.spread_on {
            Some(selector) => Some(selector.select(record)?),
            None => None,
        };
        let mut path: SmallVec<[Value; 4]> = SmallVec::with_capacity(self.group_by.len());
        for selector in &self.group_by {
            path.push(selector.select(record)?);
        }

        let mut node = &mut self.root;
        node.apply(&sums, spread.as_ref());
        for key in &path {
            node = node.child_mut(key);
            node.apply(&sums, spread.as_ref());
        }
        Ok(())
    }

    /// Resolves a query path (outermost group value first) to its fact.
    fn fact(&self, path: &[Value]) -> Result<&Fact, PivotError> {
        if path.len() > self.group_by.len() {
            return Err(PivotError::DepthMismatch {
                given: path.len(),
                depth: self.group_by.len(),
            });
        }
        let mut node = &self.root;
        for segment in path {
            node = node
                .child(segment)
                .ok_or_else(|| PivotError::PathNotFound(segment.clone()))?;
        }
        Ok(node)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Distinct group values under `path`, in first-seen order.
    pub fn rows(&self, path: &[Value]) -> Result<&[Value], PivotError> {
        Ok(self.fact(path)?.rows())
    }

    /// The full fact at `path`: a read-only snapshot of count, totals,
    /// child keys and columns.
    pub fn row(&self, path: &[Value]) -> Result<&Fact, PivotError> {
        self.fact(path)
    }

    /// Number of records under `path`.
    pub fn count(&self, path: &[Value]) -> Result<u64, PivotError> {
        Ok(self.fact(path)?.count())
    }

    /// Running totals under `path`, by aggregate name.
    pub fn sum(&self, path: &[Value]) -> Result<Totals, PivotError> {
        Ok(self.fact(path)?.sum())
    }

    /// Per-name average under `path`: total divided by the fact's own count.
    /// Fails with `EmptyFact` when no records were added (zero count).
    pub fn average(&self, path: &[Value]) -> Result<Totals, PivotError> {
        let fact = self.fact(path)?;
        if fact.count() == 0 {
            return Err(PivotError::EmptyFact);
        }
        let count = fact.count() as f64;
        let averages: Slots = fact.raw_total().iter().map(|total| total / count).collect();
        Ok(Totals::new(&self.names, &averages))
    }

    /// Per-name share of the grand total under `path`, in percent.
    /// Fails with `ZeroTotal` when the grand total of a name is zero.
    pub fn percentage(&self, path: &[Value]) -> Result<Totals, PivotError> {
        let fact = self.fact(path)?;
        let mut shares: Slots = SmallVec::with_capacity(self.names.len());
        for (index, name) in self.names.iter().enumerate() {
            let grand = self.root.raw_total()[index];
            if grand == 0.0 {
                return Err(PivotError::ZeroTotal(name.clone()));
            }
            shares.push(fact.raw_total()[index] / grand * 100.0);
        }
        Ok(Totals::new(&self.names, &shares))
    }

    /// Distinct spread values observed, in first-seen order. Empty when no
    /// spread selector is configured.
    pub fn columns(&self) -> &[Value] {
        self.root.columns()
    }

    /// The full column fact for `column` at `path`.
    pub fn column_fact(&self, column: &Value, path: &[Value]) -> Result<&ColumnFact, PivotError> {
        self.fact(path)?
            .column(column)
            .ok_or_else(|| PivotError::PathNotFound(column.clone()))
    }

    /// Totals of the column fact for `column` at `path`.
    pub fn column(&self, column: &Value, path: &[Value]) -> Result<Totals, PivotError> {
        Ok(self.column_fact(column, path)?.sum())
    }

    /// Number of records in the column fact for `column` at `path`.
    pub fn records(&self, column: &Value, path: &[Value]) -> Result<u64, PivotError> {
        Ok(self.column_fact(column, path)?.count())
    }

    /// Grand totals, or a single column's totals at the root.
    pub fn total(&self, column: Option<&Value>) -> Result<Totals, PivotError> {
        match column {
            None => Ok(self.root.sum()),
            Some(column) => self.column(column, &[]),
        }
    }
}
