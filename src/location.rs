//! Instance locations: symbolic identities for heap/stack storage.
//!
//! An analysis distinguishes "the object allocated at site S1" from "the
//! object allocated at site S2" even when both are currently bound to the
//! same program variable. At a control-flow join the two identities may
//! collapse into "one of {S1, S2}", which we represent as an immutable
//! tagged union rather than a mutable location object: equality stays
//! structural and location merging is a pure constructor.

use std::collections::BTreeSet;
use std::fmt;

use crate::ids::{AllocId, FieldId, SymbolId};

/// One concrete storage abstraction.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LocationSite {
    /// The object created at the given allocation site.
    Allocation(AllocId),
    /// A local's or parameter's own storage.
    Symbol(SymbolId),
    /// A value-type field nested within another location.
    Nested(Box<LocationSite>, FieldId),
}

impl fmt::Display for LocationSite {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LocationSite::Allocation(id) => write!(f, "{}", id),
            LocationSite::Symbol(id) => write!(f, "{}", id),
            LocationSite::Nested(parent, field) => write!(f, "{}.{}", parent, field),
        }
    }
}

/// The storage identity attached to an analysis entity: either exactly one
/// site, or a disjunction of sites produced by upstream control-flow merges.
///
/// Distinct sites are never equal; two locations are equal iff they denote
/// the same site (or the same site set).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InstanceLocation {
    Site(LocationSite),
    /// "One of these sites". Invariant: at least two sites, so that a
    /// single-site location has the unique representation `Site`.
    Merged(BTreeSet<LocationSite>),
}

impl InstanceLocation {
    pub fn site(site: LocationSite) -> Self {
        InstanceLocation::Site(site)
    }

    pub fn allocation(id: AllocId) -> Self {
        InstanceLocation::Site(LocationSite::Allocation(id))
    }

    pub fn symbol(id: SymbolId) -> Self {
        InstanceLocation::Site(LocationSite::Symbol(id))
    }

    pub fn is_merged(&self) -> bool {
        matches!(self, InstanceLocation::Merged(_))
    }

    /// The constituent sites, in site order.
    pub fn sites(&self) -> impl Iterator<Item = &LocationSite> + '_ {
        let (single, set) = match self {
            InstanceLocation::Site(site) => (Some(site), None),
            InstanceLocation::Merged(sites) => (None, Some(sites)),
        };
        single.into_iter().chain(set.into_iter().flatten())
    }

    /// The disjunction of `self` and `other`: a location denoting "one of
    /// the sites of either". Merging a location with itself (or with a
    /// location over the same site set) returns an equal location, so
    /// repeated merges at loop back-edges reach a fixed representation.
    pub fn merge(&self, other: &InstanceLocation) -> InstanceLocation {
        if self == other {
            return self.clone();
        }
        let mut sites: BTreeSet<LocationSite> = self.sites().cloned().collect();
        sites.extend(other.sites().cloned());
        if sites.len() == 1 {
            let site = sites.into_iter().next().unwrap();
            InstanceLocation::Site(site)
        } else {
            InstanceLocation::Merged(sites)
        }
    }
}

impl fmt::Display for InstanceLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InstanceLocation::Site(site) => write!(f, "{}", site),
            InstanceLocation::Merged(sites) => {
                write!(f, "{{")?;
                for (i, site) in sites.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "{}", site)?;
                }
                write!(f, "}}")
            }
        }
    }
}
