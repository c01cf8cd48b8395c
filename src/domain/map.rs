//! Generic map abstract domain: lifts a value lattice to a lattice over
//! finite key-to-value maps.
//!
//! The merge policy for a key present in only one operand is to keep the
//! key mapped to the unknown value: the other path established no fact
//! about the slot, so nothing may be assumed, but the slot must stay
//! tracked. Dropping the key instead would silently read as "no
//! constraint". The entity-keyed specialization overrides the merge with
//! an aliasing-aware algorithm and shares the ordering defined here.

use fxhash::FxHashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::domain::lattice::{AbstractValueDomain, ValueOrdering};

#[derive(Clone, Debug)]
pub struct MapDomain<K, D> {
    value_domain: D,
    _marker: PhantomData<K>,
}

impl<K, D> MapDomain<K, D>
where
    K: Clone + Debug + Eq + Hash,
    D: AbstractValueDomain,
{
    pub fn new(value_domain: D) -> Self {
        MapDomain {
            value_domain,
            _marker: PhantomData,
        }
    }

    pub fn value_domain(&self) -> &D {
        &self.value_domain
    }

    /// Key-wise join. The inputs are read-only; the result is a fresh
    /// map owned by the caller.
    pub fn merge(
        &self,
        m1: &FxHashMap<K, D::Value>,
        m2: &FxHashMap<K, D::Value>,
    ) -> FxHashMap<K, D::Value> {
        let mut result = FxHashMap::default();
        for (key, value1) in m1 {
            let merged = match m2.get(key) {
                Some(value2) => self.value_domain.merge(value1, value2),
                None => self.value_domain.unknown_or_may_be(),
            };
            result.insert(key.clone(), merged);
        }
        for key in m2.keys() {
            if !result.contains_key(key) {
                result.insert(key.clone(), self.value_domain.unknown_or_may_be());
            }
        }
        result
    }

    /// Whether every fact asserted by `m1` is at least as strong as the
    /// corresponding fact in `m2`. A key missing from either map reads as
    /// the unknown value (top): asserting nothing is the weakest claim,
    /// and an explicit unknown entry is equivalent to no entry.
    pub fn leq(&self, m1: &FxHashMap<K, D::Value>, m2: &FxHashMap<K, D::Value>) -> bool {
        let unknown = self.value_domain.unknown_or_may_be();
        m1.iter().all(|(key, value1)| {
            let value2 = m2.get(key).unwrap_or(&unknown);
            self.value_domain.compare(value1, value2).is_less_or_equal()
        }) && m2.iter().all(|(key, value2)| {
            m1.contains_key(key)
                || self
                    .value_domain
                    .compare(&unknown, value2)
                    .is_less_or_equal()
        })
    }

    /// Ordering over whole maps, derived from `leq` in both directions.
    /// The fixpoint driver stabilizes a point once
    /// `compare(new, old).is_less_or_equal()` holds.
    pub fn compare(
        &self,
        m1: &FxHashMap<K, D::Value>,
        m2: &FxHashMap<K, D::Value>,
    ) -> ValueOrdering {
        match (self.leq(m1, m2), self.leq(m2, m1)) {
            (true, true) => ValueOrdering::Equal,
            (true, false) => ValueOrdering::Less,
            (false, true) => ValueOrdering::Greater,
            (false, false) => ValueOrdering::Incomparable,
        }
    }
}
