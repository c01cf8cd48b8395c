//! Entity-keyed map domain: the aliasing-aware flow-state merge.
//!
//! At a control-flow join the two incoming states may track "the same"
//! slot under entities whose instance locations disagree, because each
//! branch bound the slot to a different object. A plain key-wise join
//! would see two unrelated keys and degrade both to unknown. The merge
//! here instead reconciles entities by access path: path-equal entities
//! with equal locations join point-wise under the original key, while
//! path-equal entities with differing locations fold into a single
//! entity whose location is the disjunction of the operands' locations.
//! Only entities with no path-equal counterpart on the other side fall
//! back to the unknown value.

use fxhash::FxHashMap;
use smallvec::SmallVec;

use crate::domain::lattice::{AbstractValueDomain, ValueOrdering};
use crate::domain::map::MapDomain;
use crate::entity::AnalysisEntity;

/// The analysis state at one CFG point.
pub type FlowMap<V> = FxHashMap<AnalysisEntity, V>;

#[derive(Clone, Debug)]
pub struct EntityMapDomain<D> {
    map_domain: MapDomain<AnalysisEntity, D>,
}

impl<D: AbstractValueDomain> EntityMapDomain<D> {
    pub fn new(value_domain: D) -> Self {
        EntityMapDomain {
            map_domain: MapDomain::new(value_domain),
        }
    }

    pub fn value_domain(&self) -> &D {
        self.map_domain.value_domain()
    }

    /// Merge the states flowing in from two predecessors. The inputs are
    /// read-only; the result is a fresh map owned by the caller.
    ///
    /// For each entry of `map1`, all path-equal keys of `map2` are folded
    /// in, not just the first: upstream merges (e.g. around a loop) can
    /// leave `map2` with several entities that share the path but
    /// distinguish finer-grained locations. An exact-location match
    /// stores the joined value at the original key; the differing-location
    /// matches fold into one merged-location key per `map1` entry, which
    /// then joins with any value already accumulated there by an earlier
    /// entry funneling into the same merged key. Keys of either input
    /// with no path-equal counterpart on the other side are kept at the
    /// unknown value so the slot stays tracked.
    pub fn merge(&self, map1: &FlowMap<D::Value>, map2: &FlowMap<D::Value>) -> FlowMap<D::Value> {
        let domain = self.map_domain.value_domain();
        let mut result: FlowMap<D::Value> = FxHashMap::default();
        let mut matches: SmallVec<[&AnalysisEntity; 4]> = SmallVec::new();

        for (key1, value1) in map1 {
            matches.clear();
            matches.extend(map2.keys().filter(|key2| key2.equals_ignoring_location(key1)));

            if matches.is_empty() {
                // The other path carries no fact about this slot at all;
                // no claim may be made about its value.
                log::trace!("merge: {} unmatched, degrading to unknown", key1);
                result.insert(key1.clone(), domain.unknown_or_may_be());
                continue;
            }

            // Accumulated key/value over the differing-location matches.
            // The key is a set union and the value join is commutative and
            // associative, so the fold is independent of match order.
            let mut folded: Option<(AnalysisEntity, D::Value)> = None;
            for &key2 in &matches {
                let value2 = &map2[key2];
                let merged_value = domain.merge(value1, value2);
                if key1.location() == key2.location() {
                    result.insert(key1.clone(), merged_value);
                } else {
                    folded = Some(match folded {
                        None => (key1.with_merged_location(key2), merged_value),
                        Some((key, value)) => (
                            key.with_merged_location(key2),
                            domain.merge(&value, &merged_value),
                        ),
                    });
                }
            }

            if let Some((merged_key, mut merged_value)) = folded {
                log::trace!("merge: {} folds into {}", key1, merged_key);
                if let Some(existing) = result.get(&merged_key) {
                    merged_value = domain.merge(&merged_value, existing);
                }
                result.insert(merged_key, merged_value);
            }
        }

        // Symmetric fallback: map2 keys whose path map1 does not track at
        // all. Path-equal keys were already reconciled above; checking
        // against map1 rather than the result keeps the sweep independent
        // of map2's iteration order.
        for key2 in map2.keys() {
            let matched = map1.keys().any(|key1| key1.equals_ignoring_location(key2));
            if !matched {
                result.insert(key2.clone(), domain.unknown_or_may_be());
            }
        }

        result
    }

    pub fn leq(&self, m1: &FlowMap<D::Value>, m2: &FlowMap<D::Value>) -> bool {
        self.map_domain.leq(m1, m2)
    }

    /// Ordering for fixpoint detection; see [`MapDomain::compare`].
    pub fn compare(&self, m1: &FlowMap<D::Value>, m2: &FlowMap<D::Value>) -> ValueOrdering {
        self.map_domain.compare(m1, m2)
    }
}
