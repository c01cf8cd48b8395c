//! Analysis entities: symbolic names for the storage slots an analysis
//! tracks.
//!
//! An entity is an access path (a root symbol plus field/element
//! selectors) paired with the instance location the path currently
//! refers to. Exact equality compares both; flow merging additionally
//! needs "same path, possibly different location", which is how the same
//! source-level slot is recognized across two branches that bound it to
//! different objects.

use smallvec::SmallVec;
use std::fmt;

use crate::ids::{FieldId, SymbolId};
use crate::location::InstanceLocation;

/// One step of an access path below its root symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Selector {
    /// A named field or property.
    Field(FieldId),
    /// An array/collection element at a statically known index.
    Element(u64),
    /// An array/collection element at a statically unknown index.
    AnyElement,
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Selector::Field(id) => write!(f, ".{}", id),
            Selector::Element(i) => write!(f, "[{}]", i),
            Selector::AnyElement => write!(f, "[*]"),
        }
    }
}

/// A rooted access path, e.g. `sym0.field1[2]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AccessPath {
    root: SymbolId,
    selectors: SmallVec<[Selector; 2]>,
}

impl AccessPath {
    pub fn root(root: SymbolId) -> Self {
        AccessPath {
            root,
            selectors: SmallVec::new(),
        }
    }

    /// The path one selector below `self`.
    pub fn child(&self, selector: Selector) -> Self {
        let mut selectors = self.selectors.clone();
        selectors.push(selector);
        AccessPath {
            root: self.root,
            selectors,
        }
    }

    pub fn symbol(&self) -> SymbolId {
        self.root
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }
}

impl fmt::Display for AccessPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for selector in &self.selectors {
            write!(f, "{}", selector)?;
        }
        Ok(())
    }
}

/// A tracked storage slot: access path plus instance location.
///
/// Entities are immutable; the driver creates one per observed slot
/// reference and the merge machinery derives merged-location variants.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnalysisEntity {
    path: AccessPath,
    location: InstanceLocation,
}

impl AnalysisEntity {
    pub fn new(path: AccessPath, location: InstanceLocation) -> Self {
        AnalysisEntity { path, location }
    }

    pub fn path(&self) -> &AccessPath {
        &self.path
    }

    pub fn location(&self) -> &InstanceLocation {
        &self.location
    }

    /// Path equality only: the same named slot, regardless of which
    /// object it refers to.
    pub fn equals_ignoring_location(&self, other: &AnalysisEntity) -> bool {
        self.path == other.path
    }

    /// An entity with the same path whose location is the disjunction of
    /// the two operands' locations. The operands must name the same path;
    /// a mismatch is a bug in the caller.
    pub fn with_merged_location(&self, other: &AnalysisEntity) -> AnalysisEntity {
        debug_assert!(self.equals_ignoring_location(other));
        AnalysisEntity {
            path: self.path.clone(),
            location: self.location.merge(&other.location),
        }
    }
}

impl fmt::Display for AnalysisEntity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} @ {}", self.path, self.location)
    }
}
