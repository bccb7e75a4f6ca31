//! Error types for dawgdict

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Why a key was not accepted by a builder.
///
/// Rejections are local: the builder is left exactly as it was before the
/// call and keeps accepting keys that respect the ordering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InsertError {
    /// The key sorts before the previously accepted key.
    #[error("key {key:?} sorts before previous key {previous:?}")]
    Order {
        /// The last accepted key.
        previous: Vec<u8>,
        /// The rejected key.
        key: Vec<u8>,
    },

    /// The key equals the previously accepted key.
    #[error("duplicate key {0:?}")]
    Duplicate(Vec<u8>),

    /// The index handed to the automaton is not the next dense index.
    #[error("index {actual} does not follow the {expected} keys already accepted")]
    Index {
        /// Number of keys accepted so far.
        expected: u32,
        /// Index that came with the key.
        actual: u32,
    },

    /// The insertion index space is exhausted.
    #[error("too many keys for a single dictionary")]
    TooManyKeys,
}

impl InsertError {
    /// Create an ordering error
    pub fn order(previous: impl Into<Vec<u8>>, key: impl Into<Vec<u8>>) -> Self {
        InsertError::Order {
            previous: previous.into(),
            key: key.into(),
        }
    }

    /// Create a duplicate key error
    pub fn duplicate(key: impl Into<Vec<u8>>) -> Self {
        InsertError::Duplicate(key.into())
    }
}

/// A compacted automaton that cannot back a dictionary.
///
/// Only produced for automata that were not built by a well-behaved
/// automaton constructor, or that were tampered with after serialization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuideError {
    /// The automaton has no root state.
    #[error("automaton has no states")]
    Empty,

    /// Per-state tables disagree on the number of states.
    #[error("expected {expected} state offsets, found {found}")]
    OffsetCount {
        /// `states + 1`
        expected: usize,
        /// Actual length of the offset table.
        found: usize,
    },

    /// Edge ranges of consecutive states overlap or run past the edge table.
    #[error("edge offsets of state {0} are out of order")]
    UnsortedOffsets(u32),

    /// Per-edge tables disagree on the number of edges.
    #[error("edge tables have mismatched lengths")]
    EdgeCount,

    /// Outgoing labels of a state are not strictly ascending.
    #[error("labels of state {0} are not strictly ascending")]
    UnsortedLabels(u32),

    /// An edge leads to a state that does not exist.
    #[error("edge {edge} targets missing state {target}")]
    TargetOutOfRange {
        /// Edge position in the edge table.
        edge: u32,
        /// Target state id.
        target: u32,
    },

    /// An edge does not lead to a higher-numbered state.
    #[error("edge {edge} from state {source_state} points backwards to {target}")]
    BackwardEdge {
        /// Edge position in the edge table.
        edge: u32,
        /// State the edge leaves.
        source_state: u32,
        /// Target state id.
        target: u32,
    },

    /// A non-root state accepts nothing.
    #[error("state {0} has no edges and is not accepting")]
    DeadState(u32),

    /// A rank skip disagrees with the key counts below it.
    #[error("edge {edge} skips {found} keys, expected {expected}")]
    Skip {
        /// Edge position in the edge table.
        edge: u32,
        /// Skip recomputed from the key counts.
        expected: u32,
        /// Skip stored in the automaton.
        found: u32,
    },

    /// The stored key count is not the number of accepting paths.
    #[error("automaton claims {found} keys but accepts {expected}")]
    KeyCount {
        /// Number of accepting paths.
        expected: u32,
        /// Stored key count.
        found: u32,
    },
}

/// Failure of a whole build cycle. The builder is empty afterwards.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Guide construction rejected the finished automaton.
    #[error("guide construction failed: {0}")]
    Guide(#[from] GuideError),

    /// The automaton constructor could not finish.
    #[error("automaton construction failed: {0}")]
    Automaton(String),
}

impl BuildError {
    /// Create an automaton construction error
    pub fn automaton(msg: impl Into<String>) -> Self {
        BuildError::Automaton(msg.into())
    }
}

/// A deserialized dictionary whose parts do not fit together.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DictionaryError {
    /// The automaton is malformed.
    #[error("invalid automaton: {0}")]
    Guide(#[from] GuideError),

    /// The stored guide was not derived from the stored automaton.
    #[error("guide does not match automaton")]
    GuideMismatch,

    /// Number of keys and number of values differ.
    #[error("automaton holds {keys} keys but {values} values were stored")]
    ValueCount {
        /// Keys accepted by the automaton.
        keys: u32,
        /// Length of the payload store.
        values: usize,
    },
}

/// Crate-level error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A key was rejected
    #[error(transparent)]
    Insert(#[from] InsertError),

    /// A build cycle failed
    #[error(transparent)]
    Build(#[from] BuildError),

    /// A dictionary failed validation
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
}
