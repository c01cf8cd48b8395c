//! End-to-end merge scenarios with an analysis-style value lattice.

use latmap::{
    AbstractValueDomain, AccessPath, AllocId, AnalysisEntity, EntityMapDomain, FlowMap, IdRef,
    InstanceLocation, SymbolId, ValueOrdering,
};

/// The nullability lattice a consuming analysis would supply: `NotNull`
/// and `MaybeNull` are incomparable facts, `Unknown` sits above both.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Nullability {
    NotNull,
    MaybeNull,
    Unknown,
}

#[derive(Clone, Copy, Debug)]
struct NullabilityDomain;

impl AbstractValueDomain for NullabilityDomain {
    type Value = Nullability;

    fn unknown_or_may_be(&self) -> Nullability {
        Nullability::Unknown
    }

    fn merge(&self, a: &Nullability, b: &Nullability) -> Nullability {
        if a == b {
            *a
        } else {
            Nullability::Unknown
        }
    }

    fn compare(&self, a: &Nullability, b: &Nullability) -> ValueOrdering {
        match (a, b) {
            _ if a == b => ValueOrdering::Equal,
            (_, Nullability::Unknown) => ValueOrdering::Less,
            (Nullability::Unknown, _) => ValueOrdering::Greater,
            _ => ValueOrdering::Incomparable,
        }
    }
}

fn var(sym: usize, site: usize) -> AnalysisEntity {
    AnalysisEntity::new(
        AccessPath::root(SymbolId::new(sym)),
        InstanceLocation::allocation(AllocId::new(site)),
    )
}

fn state(entries: Vec<(AnalysisEntity, Nullability)>) -> FlowMap<Nullability> {
    entries.into_iter().collect()
}

#[test]
fn nullability_lattice_laws() {
    let _ = env_logger::try_init();
    let d = NullabilityDomain;
    let values = [
        Nullability::NotNull,
        Nullability::MaybeNull,
        Nullability::Unknown,
    ];
    for a in &values {
        assert_eq!(d.merge(a, a), *a);
        assert_eq!(d.merge(a, &Nullability::Unknown), Nullability::Unknown);
        for b in &values {
            assert_eq!(d.merge(a, b), d.merge(b, a));
            for c in &values {
                assert_eq!(d.merge(a, &d.merge(b, c)), d.merge(&d.merge(a, b), c));
            }
        }
    }
}

/// `if (..) { x = new Obj(); /* site S1 */ } else { x = new Obj(); /* S2 */ }`
/// Both branches prove `x` not-null, through different objects: the join
/// must keep the not-null fact under a single merged-identity entity.
#[test]
fn branch_join_preserves_agreeing_facts_across_identities() {
    let _ = env_logger::try_init();
    let d = EntityMapDomain::new(NullabilityDomain);

    let then_state = state(vec![(var(0, 1), Nullability::NotNull)]);
    let else_state = state(vec![(var(0, 2), Nullability::NotNull)]);

    let joined = d.merge(&then_state, &else_state);
    let x_either = var(0, 1).with_merged_location(&var(0, 2));
    assert_eq!(joined.len(), 1);
    assert_eq!(joined[&x_either], Nullability::NotNull);

    // Symmetric in the predecessor order.
    assert_eq!(d.merge(&else_state, &then_state), joined);
}

#[test]
fn branch_join_degrades_disagreeing_facts() {
    let d = EntityMapDomain::new(NullabilityDomain);

    let then_state = state(vec![(var(0, 1), Nullability::NotNull)]);
    let else_state = state(vec![(var(0, 2), Nullability::MaybeNull)]);

    let joined = d.merge(&then_state, &else_state);
    let x_either = var(0, 1).with_merged_location(&var(0, 2));
    assert_eq!(joined[&x_either], Nullability::Unknown);
}

/// A slot assigned on only one branch carries no fact on the other; it
/// must stay tracked, at the unknown value, rather than be dropped.
#[test]
fn one_sided_assignment_stays_tracked_as_unknown() {
    let d = EntityMapDomain::new(NullabilityDomain);

    let then_state = state(vec![
        (var(0, 1), Nullability::NotNull),
        (var(1, 3), Nullability::NotNull),
    ]);
    let else_state = state(vec![(var(0, 1), Nullability::NotNull)]);

    let joined = d.merge(&then_state, &else_state);
    assert_eq!(joined[&var(0, 1)], Nullability::NotNull);
    assert_eq!(joined[&var(1, 3)], Nullability::Unknown);
}

/// Loop-style iteration: repeatedly merging the loop body's out-state
/// into the header reaches a state the comparison reports as stable.
#[test]
fn repeated_merge_reaches_fixpoint() {
    let d = EntityMapDomain::new(NullabilityDomain);

    let entry = state(vec![(var(0, 1), Nullability::NotNull)]);
    // The body re-binds x at a different allocation site each conceptual
    // iteration, but the abstraction only distinguishes the static site.
    let body = state(vec![(var(0, 2), Nullability::NotNull)]);

    let mut header = entry;
    for _ in 0..4 {
        let next = d.merge(&header, &body);
        let stabilized = d.compare(&next, &header).is_less_or_equal();
        header = next;
        if stabilized {
            return;
        }
    }
    panic!("merge did not stabilize: {:?}", header);
}

/// Merges for independent join points are pure and share no state, so
/// they can run in parallel over the same input maps.
#[test]
fn independent_merges_run_in_parallel() {
    use rayon::prelude::*;

    let d = EntityMapDomain::new(NullabilityDomain);
    let m1 = state(vec![
        (var(0, 1), Nullability::NotNull),
        (var(1, 3), Nullability::MaybeNull),
    ]);
    let m2 = state(vec![
        (var(0, 2), Nullability::NotNull),
        (var(1, 3), Nullability::MaybeNull),
    ]);

    let expected = d.merge(&m1, &m2);
    let results: Vec<_> = (0..64).into_par_iter().map(|_| d.merge(&m1, &m2)).collect();
    for result in results {
        assert_eq!(result, expected);
    }
}
