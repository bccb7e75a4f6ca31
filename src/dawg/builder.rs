use std::hash::BuildHasher;

use hashbrown::{DefaultHashBuilder, HashTable};
use mark_last::MarkLastIterator;

use super::compact::CompactDawg;
use super::node::DawgNode;
use super::node_arena::{NodeArena, NodeId};
use super::AutomatonConstructor;
use crate::error::{self, BuildError, InsertError};

/// Incremental builder for a minimal DAWG over sorted byte keys.
///
/// Keys must be added in strictly ascending byte order. The path of the
/// previous key is kept unfinished; whenever a new key diverges from it, the
/// diverging tail is minimized bottom-up against a register of canonical
/// nodes, so common suffixes end up sharing states
/// ([Daciuk et al. (2000)](https://arxiv.org/abs/cs/0007009v1)).
///
/// The builder is reusable: [`finish`](AutomatonConstructor::finish) hands out
/// the compacted automaton and leaves the builder empty.
///
/// # Examples
///
/// ```
/// use dawgdict::dawg::{AutomatonConstructor, DawgBuilder};
///
/// let mut builder = DawgBuilder::new();
/// builder.insert(b"bake", 0).unwrap();
/// builder.insert(b"cake", 1).unwrap();
/// assert!(builder.insert(b"awake", 2).is_err());
///
/// let dawg = builder.finish().unwrap();
/// assert_eq!(dawg.index_of(b"cake"), Some(1));
/// assert_eq!(dawg.index_of(b"awake"), None);
/// ```
pub struct DawgBuilder {
    arena: NodeArena,
    build_state: Vec<BuildState>,
    register: HashTable<NodeId>,
    hasher: DefaultHashBuilder,
    key_count: u32,
}

struct BuildState {
    label: u8,
    node: DawgNode,
}

impl DawgBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        DawgBuilder {
            arena: NodeArena::new(),
            build_state: vec![Self::root_state()],
            register: HashTable::new(),
            hasher: DefaultHashBuilder::default(),
            key_count: 0,
        }
    }

    /// Number of keys accepted since the last finish or reset.
    pub fn len(&self) -> u32 {
        self.key_count
    }

    /// True if no key has been accepted since the last finish or reset.
    pub fn is_empty(&self) -> bool {
        self.key_count == 0
    }

    /// Number of minimized states so far, excluding the unfinished path of
    /// the last key.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    fn root_state() -> BuildState {
        BuildState {
            label: 0,
            node: DawgNode::new(false),
        }
    }

    fn add_key(&mut self, key: &[u8]) -> Result<(), InsertError> {
        if key.is_empty() {
            if !self.is_empty() {
                return Err(self.rejection(key));
            }
            self.build_state[0].node.set_accepting();
            return Ok(());
        }

        let prefix_length = self.prefix_length(key)?;
        self.canonicalize_suffix(prefix_length);
        self.build_state.extend(
            key[prefix_length..]
                .iter()
                .copied()
                .mark_last()
                .map(|(last, label)| BuildState {
                    label,
                    node: DawgNode::new(last),
                }),
        );
        Ok(())
    }

    /// Length of the prefix `key` shares with the previous key.
    ///
    /// Fails if `key` does not sort strictly after the previous key.
    fn prefix_length(&self, key: &[u8]) -> Result<usize, InsertError> {
        let mut prefix_len = 0;
        for (i, &label) in key.iter().enumerate() {
            let is_last = i == key.len() - 1;
            if let Some(prev_state) = self.build_state.get(prefix_len + 1) {
                if label > prev_state.label {
                    break;
                }
                if label < prev_state.label || is_last {
                    return Err(self.rejection(key));
                }
                prefix_len += 1;
            } else {
                break;
            }
        }
        Ok(prefix_len)
    }

    fn rejection(&self, key: &[u8]) -> InsertError {
        let previous = self.previous_key();
        if previous == key {
            InsertError::duplicate(previous)
        } else {
            InsertError::order(previous, key)
        }
    }

    fn previous_key(&self) -> Vec<u8> {
        self.build_state[1..].iter().map(|s| s.label).collect()
    }

    fn canonicalize_suffix(&mut self, target_length: usize) {
        assert!(self.build_state.len() > target_length);
        let target_length = target_length
            .checked_add(1)
            .expect("target_length overflow");
        while self.build_state.len() > target_length {
            let state = self.pop_build_state();
            let child = self.canonicalize(state.node);
            self.add_build_state_child(state.label, child);
        }
    }

    fn pop_build_state(&mut self) -> BuildState {
        self.build_state
            .pop()
            .expect("Build state will always have at least one entry")
    }

    fn add_build_state_child(&mut self, label: u8, child: NodeId) {
        self.build_state
            .last_mut()
            .expect("Build state will always have at least one entry")
            .node
            .insert(label, child)
    }

    /// Returns the id of the registered node equivalent to `node`,
    /// registering `node` if there is none yet.
    fn canonicalize(&mut self, node: DawgNode) -> NodeId {
        let hash = self.hasher.hash_one(&node);
        if let Some(&id) = self.register.find(hash, |&id| self.arena[id] == node) {
            return id;
        }
        let id = self.arena.alloc(node);
        self.register
            .insert_unique(hash, id, |&id| self.hasher.hash_one(&self.arena[id]));
        id
    }
}

impl Default for DawgBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AutomatonConstructor for DawgBuilder {
    /// Adds `key`, which must sort strictly after every key added before.
    ///
    /// `index` must be the number of keys accepted so far: the compacted
    /// automaton recovers indices as key ranks, and the two only agree when
    /// indices are dense and follow key order.
    fn insert(&mut self, key: &[u8], index: u32) -> Result<(), InsertError> {
        if index != self.key_count {
            return Err(InsertError::Index {
                expected: self.key_count,
                actual: index,
            });
        }
        let next_count = self
            .key_count
            .checked_add(1)
            .ok_or(InsertError::TooManyKeys)?;
        self.add_key(key)?;
        self.key_count = next_count;
        Ok(())
    }

    fn finish(&mut self) -> Result<CompactDawg, BuildError> {
        self.canonicalize_suffix(0);
        let root_node = std::mem::replace(&mut self.build_state[0].node, DawgNode::new(false));
        let root = self.canonicalize(root_node);
        let dawg = CompactDawg::from_arena(&self.arena, root);
        self.reset();
        Ok(dawg)
    }

    fn reset(&mut self) {
        self.arena.clear();
        self.register.clear();
        self.build_state.clear();
        self.build_state.push(Self::root_state());
        self.key_count = 0;
    }
}

/// Builds a compacted DAWG from sorted keys, tagging them `0, 1, 2, …`.
///
/// # Examples
///
/// ```
/// use dawgdict::dawg::build_dawg;
///
/// let dawg = build_dawg(["APPLE", "BANANA", "CHERRY"]).unwrap();
/// assert_eq!(dawg.index_of(b"BANANA"), Some(1));
/// assert_eq!(dawg.index_of(b"APRICOT"), None);
/// ```
pub fn build_dawg<K: AsRef<[u8]>>(
    keys: impl IntoIterator<Item = K>,
) -> error::Result<CompactDawg> {
    let mut builder = DawgBuilder::new();
    for key in keys {
        let index = builder.len();
        builder.insert(key.as_ref(), index)?;
    }
    Ok(builder.finish()?)
}
