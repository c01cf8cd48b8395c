//! Type-safe index newtypes for symbols, fields, and allocation sites.
//!
//! Ids are assigned by the embedding analysis driver (symbol and type
//! resolution live outside this crate); here they are opaque handles
//! that only need equality, ordering, and hashing.

use std::hash::Hash;

pub trait IdRef: Clone + Copy + PartialEq + Eq + PartialOrd + Ord + Hash {
    fn new(value: usize) -> Self;
    fn index(self) -> usize;
}

#[macro_export]
macro_rules! declare_id {
    ($name:tt, $prefix:tt) => {
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl crate::ids::IdRef for $name {
            fn new(value: usize) -> Self {
                use std::convert::TryFrom;
                let value = u32::try_from(value).unwrap();
                Self(value)
            }
            fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::convert::From<u32> for $name {
            fn from(val: u32) -> Self {
                <Self as crate::ids::IdRef>::new(val as usize)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

declare_id!(SymbolId, "sym");
declare_id!(FieldId, "field");
declare_id!(AllocId, "alloc");
