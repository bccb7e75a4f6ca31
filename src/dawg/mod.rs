//! The automaton side of a dictionary: building a minimal DAWG from sorted
//! keys, compacting it, and deriving the guide used for enumeration.
//!
//! [`Builder`](crate::Builder) talks to this module only through
//! [`AutomatonConstructor`] and [`GuideConstructor`], so either half can be
//! replaced by another implementation.

/// Incremental DAWG construction from sorted keys.
pub mod builder;
/// Flat, read-only automaton.
pub mod compact;
/// Child/sibling traversal hints over a compacted automaton.
pub mod guide;
/// Automaton states under construction.
pub(crate) mod node;
/// Index arena for canonical states.
pub(crate) mod node_arena;

pub use builder::{build_dawg, DawgBuilder};
pub use compact::{CompactDawg, EdgeId, StateId};
pub use guide::{Guide, GuideBuilder};

use crate::error::{BuildError, GuideError, InsertError};

/// Incrementally builds a minimized automaton from keys in ascending order.
pub trait AutomatonConstructor {
    /// Registers `key`, tagged with `index`.
    ///
    /// Fails without changing any state if `key` does not sort strictly after
    /// the previously registered key.
    fn insert(&mut self, key: &[u8], index: u32) -> Result<(), InsertError>;

    /// Compacts everything registered so far into a [`CompactDawg`].
    ///
    /// The constructor is empty afterwards, whether or not this succeeds.
    fn finish(&mut self) -> Result<CompactDawg, BuildError>;

    /// Discards everything registered so far.
    fn reset(&mut self);
}

/// Derives a [`Guide`] from a compacted automaton.
pub trait GuideConstructor {
    /// Builds the guide for `dawg`, or reports why `dawg` is malformed.
    fn build(&mut self, dawg: &CompactDawg) -> Result<Guide, GuideError>;
}
