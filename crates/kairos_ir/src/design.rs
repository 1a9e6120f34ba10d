//! Top-level elaborated design.

use crate::arena::Arena;
use crate::decl::{ProcessDecl, SignalDecl};
use crate::ident::Ident;
use crate::ids::{ProcessDeclId, SignalDeclId};
use serde::{Deserialize, Serialize};

/// A flattened design as produced by elaboration.
///
/// Holds the top-level signal declarations and process statements the
/// simulation kernel binds at setup. The kernel treats the design as
/// read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElabDesign {
    /// The name of the elaborated top-level unit.
    pub name: Ident,
    /// All signal declarations, keyed by [`SignalDeclId`].
    pub signals: Arena<SignalDeclId, SignalDecl>,
    /// All process statements, keyed by [`ProcessDeclId`].
    pub processes: Arena<ProcessDeclId, ProcessDecl>,
}

impl ElabDesign {
    /// Creates an empty design with the given name.
    pub fn new(name: Ident) -> Self {
        Self {
            name,
            signals: Arena::new(),
            processes: Arena::new(),
        }
    }

    /// Returns the number of signal declarations.
    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    /// Returns the number of process statements.
    pub fn process_count(&self) -> usize {
        self.processes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaId;

    fn make_design() -> ElabDesign {
        let mut design = ElabDesign::new(Ident::from_raw(0));
        design.signals.alloc(SignalDecl {
            id: SignalDeclId::from_index(0),
            name: Ident::from_raw(1),
            drivers: 1,
        });
        design.processes.alloc(ProcessDecl {
            id: ProcessDeclId::from_index(0),
            name: Ident::from_raw(2),
        });
        design
    }

    #[test]
    fn counts() {
        let design = make_design();
        assert_eq!(design.signal_count(), 1);
        assert_eq!(design.process_count(), 1);
    }

    #[test]
    fn empty_design() {
        let design = ElabDesign::new(Ident::from_raw(0));
        assert_eq!(design.signal_count(), 0);
        assert_eq!(design.process_count(), 0);
    }

    #[test]
    fn serde_roundtrip() {
        let design = make_design();
        let json = serde_json::to_string(&design).unwrap();
        let back: ElabDesign = serde_json::from_str(&json).unwrap();
        assert_eq!(back.signal_count(), 1);
        assert_eq!(back.process_count(), 1);
    }
}
