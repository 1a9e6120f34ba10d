//! Signal and process declarations.
//!
//! After elaboration every signal is a [`SignalDecl`] with a fixed driver
//! count, and every process is a [`ProcessDecl`] whose name locates its
//! compiled entry point. Both are read-only to the kernel; the kernel keeps
//! its own side-table from declaration IDs to runtime records.

use crate::ident::Ident;
use crate::ids::{ProcessDeclId, SignalDeclId};
use serde::{Deserialize, Serialize};

/// A signal declaration in an elaborated design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalDecl {
    /// The unique ID of this declaration.
    pub id: SignalDeclId,
    /// The signal name, unique within the design.
    pub name: Ident,
    /// Number of drivers determined at elaboration.
    ///
    /// Each process that assigns to the signal contributes one driver; the
    /// kernel allocates one transaction queue per driver.
    pub drivers: u32,
}

/// A process statement in an elaborated design.
///
/// The name doubles as the lookup key for the process's compiled entry
/// point in the code generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDecl {
    /// The unique ID of this declaration.
    pub id: ProcessDeclId,
    /// The process name, unique within the design.
    pub name: Ident,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaId;

    #[test]
    fn signal_decl_construction() {
        let decl = SignalDecl {
            id: SignalDeclId::from_index(0),
            name: Ident::from_raw(1),
            drivers: 2,
        };
        assert_eq!(decl.drivers, 2);
    }

    #[test]
    fn process_decl_construction() {
        let decl = ProcessDecl {
            id: ProcessDeclId::from_index(0),
            name: Ident::from_raw(1),
        };
        assert_eq!(decl.id.index(), 0);
    }

    #[test]
    fn signal_decl_serde_roundtrip() {
        let decl = SignalDecl {
            id: SignalDeclId::from_index(3),
            name: Ident::from_raw(5),
            drivers: 1,
        };
        let json = serde_json::to_string(&decl).unwrap();
        let back: SignalDecl = serde_json::from_str(&json).unwrap();
        assert_eq!(decl, back);
    }
}
