//! Deduplicating formula table.
//!
//! [`FormulaTable`] hands out a stable [`FormulaRef`] per distinct formula. Structurally
//! equal formulas always receive the same reference, so callers exploring a state space
//! can compare and store small handles instead of whole token sequences.
//!
//! Formulas are bucketed by [`StructuralHash`]; entries sharing a bucket are told apart
//! with [`StructuralEq`]. The table is append-only and safe to share between threads.
use std::collections::BTreeMap;

use log::{debug, info};
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard, RwLockUpgradableReadGuard};
use smallvec::SmallVec;

use crate::formula::Formula;
use crate::hash::{StructuralEq, StructuralHash};

/// A stable reference to a formula stored inside a [`FormulaTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormulaRef(u32);

impl FormulaRef {
    /// Position of the formula in insertion order.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for FormulaRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Default)]
struct TableInner {
    formulas: Vec<Formula>,
    buckets: BTreeMap<u64, SmallVec<u32, 1>>,
}

impl TableInner {
    fn find(&self, h: u64, formula: &Formula) -> Option<FormulaRef> {
        self.buckets.get(&h).and_then(|bucket| {
            bucket
                .iter()
                .copied()
                .find(|&idx| self.formulas[idx as usize].structural_eq(formula))
                .map(FormulaRef)
        })
    }
}

/// Thread-safe, append-only set of formulas.
#[derive(Debug, Default)]
pub struct FormulaTable {
    inner: RwLock<TableInner>,
}

impl FormulaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the reference of `formula`, inserting it if no equal formula is stored yet.
    ///
    /// Collisions (distinct formulas with the same hash) are resolved by comparing token
    /// sequences; they only cost a longer bucket scan.
    ///
    /// # A note on concurrency
    /// This method takes an upgradable read lock on the table and upgrades it to a write
    /// lock when `formula` is new. As a result,
    ///  1) You **MUST NOT** hold a guard returned by [`Self::get`] on the same thread while
    ///     calling this method, as the upgrade waits for every reader to leave.
    ///  2) Guards held by other threads only delay the insertion until they are dropped.
    ///  3) Concurrent calls with the same formula all receive the same [`FormulaRef`].
    pub fn search_or_insert(&self, formula: Formula) -> FormulaRef {
        let h = formula.structural_hash();

        let inner = self.inner.upgradable_read();
        if let Some(found) = inner.find(h, &formula) {
            return found;
        }

        let mut inner = RwLockUpgradableReadGuard::upgrade(inner);
        let idx = u32::try_from(inner.formulas.len())
            .expect("formula table cannot hold more than u32::MAX formulas");

        if let Some(bucket) = inner.buckets.get(&h) {
            info!(
                "Detected a hash collision on hash 0x{:016x}. The following formulas collided:\n{}\n - {} -> {}",
                h,
                bucket
                    .iter()
                    .map(|&other| format!(" - #{} -> {}", other, inner.formulas[other as usize]))
                    .collect::<Vec<_>>()
                    .join("\n"),
                FormulaRef(idx),
                formula,
            );
        } else {
            debug!("New formula encountered {}. Registered as #{}.", formula, idx);
        }

        inner.buckets.entry(h).or_insert_with(SmallVec::new).push(idx);
        inner.formulas.push(formula);
        FormulaRef(idx)
    }

    /// Reference of a stored formula structurally equal to `formula`, if any.
    pub fn lookup(&self, formula: &Formula) -> Option<FormulaRef> {
        self.inner
            .read_recursive()
            .find(formula.structural_hash(), formula)
    }

    /// Borrow the formula behind `formula_ref`.
    ///
    /// # A note on concurrency
    /// This method acquires a recursive read lock on the table. As a result,
    ///  1) Multiple concurrent readers are allowed, and a thread holding a guard may keep
    ///     calling [`Self::get`], [`Self::lookup`] or [`Self::len`] even while another
    ///     thread waits to insert.
    ///  2) You mustn't hold a guard while calling [`Self::search_or_insert`] on the same
    ///     thread, as it may upgrade to a write lock, leading to a deadlock.
    ///  3) The returned guard keeps the read lock held for the lifetime of the guard.
    pub fn get(&self, formula_ref: FormulaRef) -> Option<MappedRwLockReadGuard<'_, Formula>> {
        RwLockReadGuard::try_map(self.inner.read_recursive(), |inner| {
            inner.formulas.get(formula_ref.index())
        })
        .ok()
    }

    pub fn len(&self) -> usize {
        self.inner.read_recursive().formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of hash buckets holding more than one formula.
    pub fn collisions(&self) -> usize {
        self.inner
            .read_recursive()
            .buckets
            .values()
            .filter(|bucket| bucket.len() > 1)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, mpsc};
    use std::time::Duration;

    use super::*;
    use crate::formula::token::{Ident, Operator, Token};

    #[test]
    fn equal_formulas_share_a_reference() {
        let table = FormulaTable::new();
        let x = Ident::new(1, 2, 3, 16);
        let a = table.search_or_insert(Formula::ident(x).apply_unary(Operator::Neg));
        let b = table.search_or_insert(Formula::from_tokens([
            Token::Identifier(x),
            Token::Op(Operator::Neg),
        ]));
        assert_eq!(a, b);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn distinct_formulas_get_distinct_references() {
        let table = FormulaTable::new();
        let a = table.search_or_insert(Formula::constant(1));
        let b = table.search_or_insert(Formula::boolean(true));
        assert_ne!(a, b);
        assert_eq!(table.len(), 2);
        // `1` and `true` hash alike, so they land in the same bucket.
        assert_eq!(table.collisions(), 1);
        assert_eq!(&*table.get(a).unwrap(), &Formula::constant(1));
        assert_eq!(&*table.get(b).unwrap(), &Formula::boolean(true));
    }

    #[test]
    fn lookup_does_not_insert() {
        let table = FormulaTable::new();
        assert!(table.is_empty());
        assert_eq!(table.lookup(&Formula::constant(3)), None);
        assert!(table.is_empty());

        let r = table.search_or_insert(Formula::constant(3));
        assert_eq!(table.lookup(&Formula::constant(3)), Some(r));
        assert_eq!(r.index(), 0);
        assert_eq!(r.to_string(), "#0");
    }

    #[test]
    fn get_out_of_range_is_none() {
        let table = FormulaTable::new();
        table.search_or_insert(Formula::constant(0));
        assert!(table.get(FormulaRef(7)).is_none());
    }

    #[test]
    fn reads_under_a_guard_do_not_wait_for_a_pending_insert() {
        let table = Arc::new(FormulaTable::new());
        let one = table.search_or_insert(Formula::constant(1));
        let (held_tx, held_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();

        // Detached threads, so a deadlock fails the test instead of hanging it.
        let reader = {
            let table = Arc::clone(&table);
            std::thread::spawn(move || {
                let guard = table.get(one).unwrap();
                held_tx.send(()).unwrap();
                // Leave the writer time to park on its upgrade.
                std::thread::sleep(Duration::from_millis(200));
                let seen = (
                    table.lookup(&Formula::constant(1)),
                    table.lookup(&Formula::constant(2)),
                    table.len(),
                    table.collisions(),
                    table.get(one).map(|f| f.clone()),
                );
                drop(guard);
                done_tx.send(seen).unwrap();
            })
        };

        held_rx.recv_timeout(Duration::from_secs(3)).unwrap();
        let writer = {
            let table = Arc::clone(&table);
            std::thread::spawn(move || table.search_or_insert(Formula::constant(2)))
        };

        let (found, missing, len, collisions, formula) = done_rx
            .recv_timeout(Duration::from_secs(3))
            .expect("reads while holding a guard blocked behind a pending insert");
        assert_eq!(found, Some(one));
        assert_eq!(missing, None);
        assert_eq!(len, 1);
        assert_eq!(collisions, 0);
        assert_eq!(formula, Some(Formula::constant(1)));

        reader.join().unwrap();
        assert_eq!(writer.join().unwrap().index(), 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn concurrent_inserts_agree() {
        let table = FormulaTable::new();
        let shared = &table;
        let refs: Vec<Vec<FormulaRef>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(move || {
                        (0..64)
                            .map(|i| shared.search_or_insert(Formula::constant(i)))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(table.len(), 64);
        for other in &refs[1..] {
            assert_eq!(other, &refs[0]);
        }
    }
}
