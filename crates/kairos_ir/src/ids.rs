//! Opaque IDs for elaborated entities.
//!
//! Declarations never move once elaborated, so an ID is nothing more than
//! the slot of the declaration in its arena, wrapped in a distinct type per
//! entity kind. IDs are minted by [`Arena::alloc`](crate::arena::Arena::alloc)
//! and converted through the [`ArenaId`] trait only.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};

macro_rules! declare_arena_ids {
    ($($(#[$meta:meta])* $name:ident,)+) => {$(
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl ArenaId for $name {
            fn from_index(index: usize) -> Self {
                debug_assert!(index <= u32::MAX as usize, "arena slot out of ID range");
                Self(index as u32)
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }
    )+};
}

declare_arena_ids! {
    /// ID of a signal declaration in an elaborated design.
    SignalDeclId,
    /// ID of a process statement in an elaborated design.
    ProcessDeclId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn index_roundtrip() {
        assert_eq!(SignalDeclId::from_index(9).index(), 9);
        assert_eq!(ProcessDeclId::from_index(0).index(), 0);
    }

    #[test]
    fn equality() {
        assert_eq!(ProcessDeclId::from_index(3), ProcessDeclId::from_index(3));
        assert_ne!(ProcessDeclId::from_index(3), ProcessDeclId::from_index(4));
    }

    #[test]
    fn usable_as_hash_key() {
        let mut set = HashSet::new();
        set.insert(SignalDeclId::from_index(0));
        set.insert(SignalDeclId::from_index(1));
        set.insert(SignalDeclId::from_index(0));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn serde_roundtrip() {
        let id = ProcessDeclId::from_index(12);
        let json = serde_json::to_string(&id).unwrap();
        let back: ProcessDeclId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
