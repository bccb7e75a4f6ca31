//! Flattened, read-only form of a finished DAWG.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::guide;
use super::node_arena::{NodeArena, NodeId};
use crate::error::GuideError;

/// Identifies a state of a [`CompactDawg`].
pub type StateId = u32;

/// Identifies an edge of a [`CompactDawg`].
pub type EdgeId = u32;

/// A minimal acyclic automaton in a flat, lifetime-free layout.
///
/// The outgoing edges of state `s` occupy `offsets[s]..offsets[s + 1]` of the
/// edge tables, sorted by label. The root is state 0 and every edge leads to
/// a higher-numbered state.
///
/// Keys are not stored with an attached index. Instead each edge records how
/// many keys of its source state sort before every key reached through it
/// (its *skip*), and the index of a key is the sum of the skips along its
/// path, i.e. its rank among all keys. For keys added in ascending order with
/// dense indices that rank is the index the key was added with.
///
/// Deserialization runs the same structural checks as
/// [`GuideBuilder`](super::GuideBuilder), so a loaded automaton never
/// indexes out of its own tables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDawg")]
pub struct CompactDawg {
    pub(crate) offsets: Vec<u32>,
    pub(crate) labels: Vec<u8>,
    pub(crate) targets: Vec<StateId>,
    pub(crate) skips: Vec<u32>,
    pub(crate) terminals: Vec<bool>,
    pub(crate) key_count: u32,
}

#[derive(Deserialize)]
struct RawDawg {
    offsets: Vec<u32>,
    labels: Vec<u8>,
    targets: Vec<StateId>,
    skips: Vec<u32>,
    terminals: Vec<bool>,
    key_count: u32,
}

impl TryFrom<RawDawg> for CompactDawg {
    type Error = GuideError;

    fn try_from(raw: RawDawg) -> Result<Self, Self::Error> {
        let dawg = CompactDawg {
            offsets: raw.offsets,
            labels: raw.labels,
            targets: raw.targets,
            skips: raw.skips,
            terminals: raw.terminals,
            key_count: raw.key_count,
        };
        guide::validate(&dawg)?;
        Ok(dawg)
    }
}

impl CompactDawg {
    /// The start state.
    pub const ROOT: StateId = 0;

    /// Flattens a finished arena whose last node is `root`.
    ///
    /// The arena is in post-order, so walking it backwards numbers the root
    /// 0 and every child after its parents.
    pub(crate) fn from_arena(arena: &NodeArena, root: NodeId) -> Self {
        debug_assert_eq!(root as usize + 1, arena.len(), "root must be the last node");

        let mut counts = vec![0u32; arena.len()];
        for (id, node) in arena.iter() {
            let below: u32 = node.children().map(|(_, child)| counts[child as usize]).sum();
            counts[id as usize] = u32::from(node.is_accepting()) + below;
        }

        let edge_total: usize = arena.iter().map(|(_, node)| node.child_count()).sum();
        let mut dawg = CompactDawg {
            offsets: Vec::with_capacity(arena.len() + 1),
            labels: Vec::with_capacity(edge_total),
            targets: Vec::with_capacity(edge_total),
            skips: Vec::with_capacity(edge_total),
            terminals: Vec::with_capacity(arena.len()),
            key_count: counts[root as usize],
        };
        for (_, node) in arena.iter().rev() {
            dawg.offsets.push(dawg.labels.len() as u32);
            dawg.terminals.push(node.is_accepting());
            let mut skip = u32::from(node.is_accepting());
            for (label, child) in node.children() {
                dawg.labels.push(label);
                dawg.targets.push(root - child);
                dawg.skips.push(skip);
                skip += counts[child as usize];
            }
        }
        dawg.offsets.push(dawg.labels.len() as u32);
        dawg
    }

    /// Number of states, including the root.
    pub fn state_count(&self) -> usize {
        self.terminals.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of keys the automaton accepts.
    pub fn key_count(&self) -> u32 {
        self.key_count
    }

    /// True if a key ends in `state`.
    ///
    /// # Panics
    ///
    /// Panics if `state` does not exist.
    #[inline]
    pub fn is_accepting(&self, state: StateId) -> bool {
        self.terminals[state as usize]
    }

    /// Label of `edge`.
    #[inline]
    pub fn label(&self, edge: EdgeId) -> u8 {
        self.labels[edge as usize]
    }

    /// State `edge` leads to.
    #[inline]
    pub fn target(&self, edge: EdgeId) -> StateId {
        self.targets[edge as usize]
    }

    /// Number of keys skipped by taking `edge` instead of stopping at its
    /// source state or taking a lower-labelled edge.
    #[inline]
    pub fn skip(&self, edge: EdgeId) -> u32 {
        self.skips[edge as usize]
    }

    /// Edges leaving `state`, in label order.
    #[inline]
    pub fn edges(&self, state: StateId) -> Range<EdgeId> {
        let s = state as usize;
        self.offsets[s]..self.offsets[s + 1]
    }

    /// The edge leaving `state` labelled `label`, if any.
    #[inline]
    pub fn follow_edge(&self, state: StateId, label: u8) -> Option<EdgeId> {
        let edges = self.edges(state);
        let labels = &self.labels[edges.start as usize..edges.end as usize];
        labels
            .binary_search(&label)
            .ok()
            .map(|pos| edges.start + pos as EdgeId)
    }

    /// The state reached from `state` over `label`, if any.
    #[inline]
    pub fn follow(&self, state: StateId, label: u8) -> Option<StateId> {
        self.follow_edge(state, label).map(|edge| self.target(edge))
    }

    /// Follows `key` from the root.
    ///
    /// Returns the state reached and the number of keys that sort before
    /// every key starting with `key`, or `None` if no key starts with `key`.
    pub fn walk(&self, key: &[u8]) -> Option<(StateId, u32)> {
        key.iter().try_fold((Self::ROOT, 0), |(state, rank), &label| {
            let edge = self.follow_edge(state, label)?;
            Some((self.target(edge), rank + self.skip(edge)))
        })
    }

    /// Index of `key`, or `None` if `key` is not accepted.
    pub fn index_of(&self, key: &[u8]) -> Option<u32> {
        self.walk(key)
            .and_then(|(state, rank)| self.is_accepting(state).then_some(rank))
    }

    /// True if `key` is accepted.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.index_of(key).is_some()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dawg::build_dawg;

    #[test]
    fn ranks_follow_key_order() {
        let keys = ["apple", "banana", "band", "bandit", "can"];
        let dawg = build_dawg(keys).unwrap();
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(dawg.index_of(key.as_bytes()), Some(i as u32), "{key}");
        }
        assert_eq!(dawg.key_count(), 5);
    }

    #[test]
    fn prefixes_are_not_keys() {
        let dawg = build_dawg(["apple", "band"]).unwrap();
        assert_eq!(dawg.index_of(b"app"), None);
        assert_eq!(dawg.index_of(b"bandit"), None);
        assert_eq!(dawg.index_of(b""), None);
        assert!(dawg.walk(b"app").is_some());
        assert!(dawg.walk(b"apx").is_none());
    }

    #[test]
    fn walk_reports_rank_of_first_completion() {
        let dawg = build_dawg(["apple", "banana", "band", "can"]).unwrap();
        let (_, rank) = dawg.walk(b"ban").unwrap();
        assert_eq!(rank, 1);
        let (_, rank) = dawg.walk(b"c").unwrap();
        assert_eq!(rank, 3);
    }

    #[test]
    fn edges_point_forward_and_are_sorted() {
        let dawg = build_dawg(["BAKE", "BAKED", "BAKER", "CAKE", "CAKED", "FAKE", "LAKE"]).unwrap();
        for state in 0..dawg.state_count() as StateId {
            let labels: Vec<u8> = dawg.edges(state).map(|e| dawg.label(e)).collect();
            assert!(labels.windows(2).all(|w| w[0] < w[1]));
            for edge in dawg.edges(state) {
                assert!(dawg.target(edge) > state);
            }
        }
    }

    #[test]
    fn shared_suffixes_still_rank_correctly() {
        let keys = ["BAKE", "CAKE", "FAKE", "LAKE", "MAKE"];
        let dawg = build_dawg(keys).unwrap();
        // root + one state per first letter collapsed into one "AKE" chain
        assert_eq!(dawg.state_count(), 5);
        assert_eq!(
            dawg.follow(CompactDawg::ROOT, b'B'),
            dawg.follow(CompactDawg::ROOT, b'M')
        );
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(dawg.index_of(key.as_bytes()), Some(i as u32));
        }
    }

    #[test]
    fn empty_automaton_has_only_a_root() {
        let dawg = build_dawg::<&str>([]).unwrap();
        assert_eq!(dawg.state_count(), 1);
        assert_eq!(dawg.edge_count(), 0);
        assert_eq!(dawg.key_count(), 0);
        assert!(!dawg.contains(b""));
        assert_eq!(dawg.edges(CompactDawg::ROOT), 0..0);
    }

    #[test]
    fn reloads_through_serde() {
        let dawg = build_dawg(["apple", "banana", "band"]).unwrap();
        let json = serde_json::to_string(&dawg).unwrap();
        let restored: CompactDawg = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, dawg);
        assert_eq!(restored.index_of(b"band"), Some(2));
    }

    #[test]
    fn rejects_target_outside_automaton_on_load() {
        let json = r#"{"offsets":[0,1],"labels":[97],"targets":[5],"skips":[0],"terminals":[false],"key_count":1}"#;
        let err = serde_json::from_str::<CompactDawg>(json).unwrap_err();
        assert!(err.to_string().contains("edge 0 targets missing state 5"), "{err}");
    }

    #[test]
    fn rejects_tampered_skips_on_load() {
        let mut json = serde_json::to_value(build_dawg(["a", "b"]).unwrap()).unwrap();
        json["skips"][1] = 7.into();
        let err = serde_json::from_value::<CompactDawg>(json).unwrap_err();
        assert!(err.to_string().contains("edge 1 skips 7 keys"), "{err}");
    }

    #[test]
    fn follow_uses_every_byte_value() {
        let keys: Vec<[u8; 1]> = (0..=u8::MAX).map(|b| [b]).collect();
        let dawg = build_dawg(&keys).unwrap();
        for b in 0..=u8::MAX {
            assert_eq!(dawg.index_of(&[b]), Some(u32::from(b)));
        }
    }
}
