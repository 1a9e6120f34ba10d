//! Elaborated design representation for the Kairos HDL simulator.
//!
//! Elaboration flattens a design hierarchy into a single top-level unit:
//! a sequence of signal declarations and a sequence of processes. This
//! crate defines that post-elaboration form — the [`ElabDesign`] consumed
//! read-only by the simulation kernel — together with the supporting
//! infrastructure it is built from:
//!
//! - `ident` — interned identifiers and the [`Interner`]
//! - `ids` — opaque ID newtypes for elaborated entities
//! - `arena` — dense ID-indexed storage
//! - `decl` — signal and process declarations
//! - `design` — the top-level [`ElabDesign`] container

#![warn(missing_docs)]

pub mod arena;
pub mod decl;
pub mod design;
pub mod ident;
pub mod ids;

pub use arena::{Arena, ArenaId};
pub use decl::{ProcessDecl, SignalDecl};
pub use design::ElabDesign;
pub use ident::{Ident, Interner};
pub use ids::{ProcessDeclId, SignalDeclId};
