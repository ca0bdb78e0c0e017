//! Fact tree nodes - the incremental accumulators behind a pivot.
//!
//! Every node keeps a record count and one running total per configured
//! aggregate, stored positionally so accumulation is a zero-initialized
//! merge rather than a lookup into an optional entry. Child facts (next
//! group level) and column facts (spread partition) are kept in two stores
//! each: a hash map for O(1) lookup and an ordered key list so enumeration
//! follows first appearance.

use std::collections::hash_map::Entry;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::{smallvec, SmallVec};

use crate::value::Value;

/// Per-row aggregate contributions, and per-node running totals. One slot
/// per configured aggregate, in configuration order.
pub(crate) type Slots = SmallVec<[f64; 4]>;

// ============================================================================
// TOTALS VIEW
// ============================================================================

/// Read-only name-to-number view returned by the aggregate queries.
/// Entries enumerate in aggregate configuration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    entries: SmallVec<[(String, f64); 4]>,
}

impl Totals {
    pub(crate) fn new(names: &[String], values: &[f64]) -> Self {
        Totals {
            entries: names
                .iter()
                .zip(values)
                .map(|(name, value)| (name.clone(), *value))
                .collect(),
        }
    }

    /// The total recorded under an aggregate name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// COLUMN FACT
// ============================================================================

/// A reduced fact restricted to count and totals: one per distinct spread
/// value observed at the owning node. No further nesting.
#[derive(Debug, Clone)]
pub struct ColumnFact {
    names: Arc<[String]>,
    count: u64,
    total: Slots,
}

impl ColumnFact {
    fn new(names: Arc<[String]>) -> Self {
        let slots = names.len();
        ColumnFact {
            names,
            count: 0,
            total: smallvec![0.0; slots],
        }
    }

    fn apply(&mut self, sums: &[f64]) {
        self.count += 1;
        for (total, sum) in self.total.iter_mut().zip(sums) {
            *total += sum;
        }
    }

    /// Number of records folded into this column.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Running totals of this column, by aggregate name.
    pub fn sum(&self) -> Totals {
        Totals::new(&self.names, &self.total)
    }
}

// ============================================================================
// FACT
// ============================================================================

/// One node of the pivot tree: the accumulated state for a single group-by
/// path prefix, partitioned further by child group values and, when a spread
/// selector is configured, by spread values.
#[derive(Debug, Clone)]
pub struct Fact {
    names: Arc<[String]>,
    count: u64,
    total: Slots,
    row_keys: Vec<Value>,
    children: FxHashMap<Value, Fact>,
    col_keys: Vec<Value>,
    columns: FxHashMap<Value, ColumnFact>,
}

impl Fact {
    pub(crate) fn new(names: Arc<[String]>) -> Self {
        let slots = names.len();
        Fact {
            names,
            count: 0,
            total: smallvec![0.0; slots],
            row_keys: Vec::new(),
            children: FxHashMap::default(),
            col_keys: Vec::new(),
            columns: FxHashMap::default(),
        }
    }

    /// Folds one record's contributions into this node, and into the column
    /// fact for `spread` if spreading is configured.
    pub(crate) fn apply(&mut self, sums: &[f64], spread: Option<&Value>) {
        self.count += 1;
        for (total, sum) in self.total.iter_mut().zip(sums) {
            *total += sum;
        }
        if let Some(spread) = spread {
            match self.columns.entry(spread.clone()) {
                Entry::Occupied(entry) => {
                    entry.into_mut().apply(sums);
                }
                Entry::Vacant(entry) => {
                    self.col_keys.push(spread.clone());
                    let column = entry.insert(ColumnFact::new(Arc::clone(&self.names)));
                    column.apply(sums);
                }
            }
        }
    }

    /// Descends into the child for `key`, creating it zero-initialized on
    /// first touch.
    pub(crate) fn child_mut(&mut self, key: &Value) -> &mut Fact {
        match self.children.entry(key.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                self.row_keys.push(key.clone());
                entry.insert(Fact::new(Arc::clone(&self.names)))
            }
        }
    }

    /// Number of records folded into this node.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Running totals of this node, by aggregate name.
    pub fn sum(&self) -> Totals {
        Totals::new(&self.names, &self.total)
    }

    /// Distinct child group values, in first-seen order.
    pub fn rows(&self) -> &[Value] {
        &self.row_keys
    }

    /// The child fact for a group value, if one exists.
    pub fn child(&self, key: &Value) -> Option<&Fact> {
        self.children.get(key)
    }

    /// Distinct spread values observed at this node, in first-seen order.
    pub fn columns(&self) -> &[Value] {
        &self.col_keys
    }

    /// The column fact for a spread value, if one exists.
    pub fn column(&self, key: &Value) -> Option<&ColumnFact> {
        self.columns.get(key)
    }

    pub(crate) fn raw_total(&self) -> &[f64] {
        &self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Arc<[String]> {
        vec!["occurrences".to_string(), "bytes".to_string()].into()
    }

    #[test]
    fn apply_accumulates_count_and_totals() {
        let mut fact = Fact::new(names());
        fact.apply(&[100.0, 2000.0], None);
        fact.apply(&[101.0, 2020.0], None);

        assert_eq!(fact.count(), 2);
        assert_eq!(fact.sum().get("occurrences"), Some(201.0));
        assert_eq!(fact.sum().get("bytes"), Some(4020.0));
    }

    #[test]
    fn children_enumerate_in_first_seen_order() {
        let mut fact = Fact::new(names());
        fact.child_mut(&Value::from("good"));
        fact.child_mut(&Value::from("ok"));
        fact.child_mut(&Value::from("good"));
        fact.child_mut(&Value::from("bad"));

        assert_eq!(
            fact.rows(),
            [Value::from("good"), Value::from("ok"), Value::from("bad")]
        );
    }

    #[test]
    fn columns_partition_by_spread_value() {
        let mut fact = Fact::new(names());
        fact.apply(&[100.0, 2000.0], Some(&Value::from("2015-05-10")));
        fact.apply(&[101.0, 2020.0], Some(&Value::from("2015-05-11")));
        fact.apply(&[9.0, 200.0], Some(&Value::from("2015-05-10")));

        assert_eq!(
            fact.columns(),
            [Value::from("2015-05-10"), Value::from("2015-05-11")]
        );
        let column = fact.column(&Value::from("2015-05-10")).unwrap();
        assert_eq!(column.count(), 2);
        assert_eq!(column.sum().get("occurrences"), Some(109.0));
    }

    #[test]
    fn totals_enumerate_in_configuration_order() {
        let totals = Totals::new(
            &["occurrences".to_string(), "bytes".to_string()],
            &[10.0, 3328.0],
        );
        let collected: Vec<_> = totals.iter().collect();
        assert_eq!(collected, [("occurrences", 10.0), ("bytes", 3328.0)]);
        assert_eq!(totals.get("missing"), None);
    }
}
