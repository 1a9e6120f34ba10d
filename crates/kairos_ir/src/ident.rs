//! Interned names for design entities.
//!
//! The kernel only ever meets two kinds of names — signal identifiers and
//! process identifiers — and needs each twice: once when elaboration mints
//! it, and once at setup when runtime records and compiled entry points are
//! bound. Names are therefore interned into a shared pool and passed around
//! as plain [`Ident`] indices; nothing outside the pool ever stores the
//! string itself.

use lasso::{Key, Spur, ThreadedRodeo};
use serde::{Deserialize, Serialize};

/// An interned design-entity name.
///
/// Two idents from the same [`Interner`] are equal exactly when their
/// strings are equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Ident(u32);

impl Ident {
    /// Creates an `Ident` from a raw index, for deserialization and test
    /// fixtures. Normal code obtains idents from [`Interner::intern`].
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// Shared pool of design-entity names.
///
/// Interning takes `&self`, so the elaborator and the kernel can hold the
/// same pool by shared reference.
pub struct Interner {
    names: ThreadedRodeo,
}

impl Interner {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self {
            names: ThreadedRodeo::new(),
        }
    }

    /// Interns a name; the same string always yields the same [`Ident`].
    pub fn intern(&self, name: &str) -> Ident {
        Ident(self.names.get_or_intern(name).into_usize() as u32)
    }

    /// Returns the string behind an [`Ident`].
    ///
    /// # Panics
    ///
    /// Panics if `ident` did not come from this pool.
    pub fn resolve(&self, ident: Ident) -> &str {
        let key = Spur::try_from_usize(ident.0 as usize).expect("ident index out of range");
        self.names.resolve(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_resolve_roundtrip() {
        let pool = Interner::new();
        let id = pool.intern("clk");
        assert_eq!(pool.resolve(id), "clk");
    }

    #[test]
    fn same_name_same_ident() {
        let pool = Interner::new();
        assert_eq!(pool.intern("sig"), pool.intern("sig"));
    }

    #[test]
    fn distinct_names_distinct_idents() {
        let pool = Interner::new();
        assert_ne!(pool.intern("a"), pool.intern("b"));
    }

    #[test]
    fn ident_survives_raw_roundtrip() {
        let pool = Interner::new();
        let id = pool.intern("rst_n");
        let back = Ident::from_raw(id.as_raw());
        assert_eq!(pool.resolve(back), "rst_n");
    }

    #[test]
    fn serde_roundtrip() {
        let id = Ident::from_raw(7);
        let json = serde_json::to_string(&id).unwrap();
        let back: Ident = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
