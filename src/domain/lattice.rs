//! Value-lattice trait definition and some common implementations.

use fxhash::FxHashSet;
use std::fmt::Debug;
use std::marker::PhantomData;

/// Result of comparing two lattice values under the partial order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueOrdering {
    Less,
    Equal,
    Greater,
    Incomparable,
}

impl ValueOrdering {
    /// True for `Less` and `Equal`: the left operand carries at least as
    /// much information as the right. This is the fixpoint-stabilization
    /// direction.
    pub fn is_less_or_equal(self) -> bool {
        matches!(self, ValueOrdering::Less | ValueOrdering::Equal)
    }
}

/// A join-semilattice of abstract values, supplied per analysis.
///
/// `merge` must compute the least upper bound of its operands and obey
/// the usual lattice laws:
///
/// * merge(a, a) == a (idempotence)
/// * merge(a, b) == merge(b, a) (commutativity)
/// * merge(a, merge(b, c)) == merge(merge(a, b), c) (associativity)
/// * merge(a, unknown) == unknown (the unknown value absorbs)
///
/// `unknown_or_may_be` is the safe over-approximation the map domains
/// fall back to when a slot's fact cannot be claimed on some path; it
/// need not be the unique top of the lattice, but it must absorb every
/// value reachable in the analysis. `compare` must be consistent with
/// `merge` (`compare(a, merge(a, b))` is never `Greater`). Termination of
/// the enclosing fixpoint loop additionally requires a finite chain
/// length; that is the lattice designer's responsibility, not checked
/// here.
///
/// The domain is an object rather than a set of static functions so that
/// lattices can carry configuration (e.g. an index universe size).
/// Implementations must be pure: no side effects, no panics for values
/// drawn from the same lattice.
pub trait AbstractValueDomain {
    type Value: Clone + Debug + PartialEq + Eq;

    fn unknown_or_may_be(&self) -> Self::Value;
    fn merge(&self, a: &Self::Value, b: &Self::Value) -> Self::Value;
    fn compare(&self, a: &Self::Value, b: &Self::Value) -> ValueOrdering;
}

/// A flat lattice over some literal type: `Undefined` (nothing observed
/// yet) below every `Exactly(t)`, all of which sit below `Unknown`. Two
/// distinct literals join to `Unknown`. This is the shape used by
/// copy-propagation and value-content style analyses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlatValue<T> {
    Undefined,
    Exactly(T),
    Unknown,
}

#[derive(Clone, Copy, Debug)]
pub struct FlatDomain<T>(PhantomData<T>);

impl<T> FlatDomain<T> {
    pub fn new() -> Self {
        FlatDomain(PhantomData)
    }
}

impl<T> Default for FlatDomain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Debug + PartialEq + Eq> AbstractValueDomain for FlatDomain<T> {
    type Value = FlatValue<T>;

    fn unknown_or_may_be(&self) -> FlatValue<T> {
        FlatValue::Unknown
    }

    fn merge(&self, a: &FlatValue<T>, b: &FlatValue<T>) -> FlatValue<T> {
        match (a, b) {
            (FlatValue::Undefined, other) | (other, FlatValue::Undefined) => other.clone(),
            (FlatValue::Unknown, _) | (_, FlatValue::Unknown) => FlatValue::Unknown,
            (FlatValue::Exactly(x), FlatValue::Exactly(y)) => {
                if x == y {
                    FlatValue::Exactly(x.clone())
                } else {
                    FlatValue::Unknown
                }
            }
        }
    }

    fn compare(&self, a: &FlatValue<T>, b: &FlatValue<T>) -> ValueOrdering {
        match (a, b) {
            _ if a == b => ValueOrdering::Equal,
            (FlatValue::Undefined, _) | (_, FlatValue::Unknown) => ValueOrdering::Less,
            (_, FlatValue::Undefined) | (FlatValue::Unknown, _) => ValueOrdering::Greater,
            (FlatValue::Exactly(_), FlatValue::Exactly(_)) => ValueOrdering::Incomparable,
        }
    }
}

/// A may-set lattice whose values are sets of `usize` indices (e.g.
/// candidate points-to targets). The join is set union; the unknown
/// value is the degenerate "universe" set, which absorbs every union.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnionSet {
    set: FxHashSet<usize>,
    /// The set has degenerated to contain all possible indices. When
    /// set, `set` is empty, so derived equality stays structural.
    universe: bool,
}

impl UnionSet {
    pub fn empty() -> Self {
        UnionSet {
            set: FxHashSet::default(),
            universe: false,
        }
    }

    pub fn universe() -> Self {
        UnionSet {
            set: FxHashSet::default(),
            universe: true,
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.universe || self.set.contains(&index)
    }

    pub fn add(&mut self, index: usize) {
        if !self.universe {
            self.set.insert(index);
        }
    }
}

impl std::iter::FromIterator<usize> for UnionSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        UnionSet {
            set: iter.into_iter().collect(),
            universe: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct UnionSetDomain;

impl AbstractValueDomain for UnionSetDomain {
    type Value = UnionSet;

    fn unknown_or_may_be(&self) -> UnionSet {
        UnionSet::universe()
    }

    fn merge(&self, a: &UnionSet, b: &UnionSet) -> UnionSet {
        if a.universe || b.universe {
            return UnionSet::universe();
        }
        let mut set = a.set.clone();
        set.extend(b.set.iter().copied());
        UnionSet {
            set,
            universe: false,
        }
    }

    fn compare(&self, a: &UnionSet, b: &UnionSet) -> ValueOrdering {
        match (a.universe, b.universe) {
            (true, true) => return ValueOrdering::Equal,
            (false, true) => return ValueOrdering::Less,
            (true, false) => return ValueOrdering::Greater,
            (false, false) => {}
        }
        let sub = a.set.is_subset(&b.set);
        let sup = b.set.is_subset(&a.set);
        match (sub, sup) {
            (true, true) => ValueOrdering::Equal,
            (true, false) => ValueOrdering::Less,
            (false, true) => ValueOrdering::Greater,
            (false, false) => ValueOrdering::Incomparable,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    type V = FlatValue<u32>;

    fn flat_values() -> Vec<V> {
        vec![
            FlatValue::Undefined,
            FlatValue::Exactly(1),
            FlatValue::Exactly(2),
            FlatValue::Unknown,
        ]
    }

    #[test]
    fn flat_lattice_laws() {
        let d = FlatDomain::<u32>::new();
        let values = flat_values();
        for a in &values {
            assert_eq!(d.merge(a, a), *a);
            assert_eq!(d.merge(a, &FlatValue::Unknown), FlatValue::Unknown);
            for b in &values {
                assert_eq!(d.merge(a, b), d.merge(b, a));
                for c in &values {
                    assert_eq!(d.merge(a, &d.merge(b, c)), d.merge(&d.merge(a, b), c));
                }
            }
        }
    }

    #[test]
    fn flat_compare_is_consistent_with_merge() {
        let d = FlatDomain::<u32>::new();
        let values = flat_values();
        for a in &values {
            assert_eq!(d.compare(a, a), ValueOrdering::Equal);
            for b in &values {
                let joined = d.merge(a, b);
                assert!(d.compare(a, &joined).is_less_or_equal());
                assert!(d.compare(b, &joined).is_less_or_equal());
            }
        }
        assert_eq!(
            d.compare(&FlatValue::Exactly(1), &FlatValue::Exactly(2)),
            ValueOrdering::Incomparable
        );
        assert_eq!(
            d.compare(&FlatValue::Undefined, &FlatValue::Unknown),
            ValueOrdering::Less
        );
    }

    #[test]
    fn union_set_join_is_union() {
        let d = UnionSetDomain;
        let a: UnionSet = vec![1, 2].into_iter().collect();
        let b: UnionSet = vec![2, 3].into_iter().collect();
        let joined = d.merge(&a, &b);
        assert!(joined.contains(1) && joined.contains(2) && joined.contains(3));
        assert!(!joined.contains(4));

        assert_eq!(d.compare(&a, &joined), ValueOrdering::Less);
        assert_eq!(d.compare(&a, &b), ValueOrdering::Incomparable);
    }

    #[test]
    fn union_set_universe_absorbs() {
        let d = UnionSetDomain;
        let a: UnionSet = vec![7].into_iter().collect();
        let top = d.unknown_or_may_be();
        assert_eq!(d.merge(&a, &top), top);
        assert!(top.contains(usize::MAX));

        // Adding to the universe keeps structural equality with it.
        let mut u = UnionSet::universe();
        u.add(3);
        assert_eq!(u, UnionSet::universe());
    }
}
