use serde::{Deserialize, Serialize};

use super::compact::{CompactDawg, EdgeId, StateId};
use super::GuideConstructor;
use crate::error::GuideError;

/// Traversal hints over a [`CompactDawg`] for enumerating completions.
///
/// For every state the guide stores the label of its first edge, and for
/// every edge the label of the next edge leaving the same state. A
/// depth-first walk can then go down with [`child`](Guide::child) and
/// sideways with [`sibling`](Guide::sibling) without scanning edge tables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Guide {
    children: Vec<Option<u8>>,
    siblings: Vec<Option<u8>>,
}

impl Guide {
    /// Label of the first edge leaving `state`.
    #[inline]
    pub fn child(&self, state: StateId) -> Option<u8> {
        self.children[state as usize]
    }

    /// Label of the edge after `edge` in its source state.
    #[inline]
    pub fn sibling(&self, edge: EdgeId) -> Option<u8> {
        self.siblings[edge as usize]
    }

    /// Number of states covered.
    pub fn state_count(&self) -> usize {
        self.children.len()
    }
}

/// A guide read back from storage.
///
/// Stored guides are never trusted. They are only compared against the
/// guide rebuilt from the automaton they were stored with.
#[derive(Deserialize)]
pub(crate) struct StoredGuide {
    children: Vec<Option<u8>>,
    siblings: Vec<Option<u8>>,
}

impl StoredGuide {
    pub(crate) fn matches(&self, guide: &Guide) -> bool {
        self.children == guide.children && self.siblings == guide.siblings
    }
}

/// Builds a [`Guide`] after checking that the automaton is well formed.
#[derive(Clone, Copy, Debug, Default)]
pub struct GuideBuilder;

impl GuideBuilder {
    /// Creates a guide builder.
    pub fn new() -> Self {
        GuideBuilder
    }
}

impl GuideConstructor for GuideBuilder {
    fn build(&mut self, dawg: &CompactDawg) -> Result<Guide, GuideError> {
        validate(dawg)?;

        let mut guide = Guide {
            children: Vec::with_capacity(dawg.state_count()),
            siblings: Vec::with_capacity(dawg.edge_count()),
        };
        for state in 0..dawg.state_count() as StateId {
            let edges = dawg.edges(state);
            guide
                .children
                .push((!edges.is_empty()).then(|| dawg.label(edges.start)));
            for edge in edges.clone() {
                let next = edge + 1;
                guide
                    .siblings
                    .push((next < edges.end).then(|| dawg.label(next)));
            }
        }
        Ok(guide)
    }
}

/// Checks the structural invariants lookups and enumeration rely on.
///
/// States are visited from the highest id down, so key counts below a state
/// are known before its skips are checked.
pub(super) fn validate(dawg: &CompactDawg) -> Result<(), GuideError> {
    let states = dawg.terminals.len();
    if states == 0 {
        return Err(GuideError::Empty);
    }
    if dawg.offsets.len() != states + 1 {
        return Err(GuideError::OffsetCount {
            expected: states + 1,
            found: dawg.offsets.len(),
        });
    }
    let edges = dawg.labels.len();
    if dawg.targets.len() != edges
        || dawg.skips.len() != edges
        || dawg.offsets[states] as usize != edges
    {
        return Err(GuideError::EdgeCount);
    }
    if dawg.offsets[0] != 0 {
        return Err(GuideError::UnsortedOffsets(0));
    }
    if let Some(s) = (0..states).find(|&s| dawg.offsets[s] > dawg.offsets[s + 1]) {
        return Err(GuideError::UnsortedOffsets(s as StateId));
    }

    let overflow = || GuideError::KeyCount {
        expected: u32::MAX,
        found: dawg.key_count,
    };
    let mut counts = vec![0u32; states];
    for s in (0..states as StateId).rev() {
        let range = dawg.edges(s);
        let accepting = dawg.is_accepting(s);
        if range.is_empty() && !accepting && s != CompactDawg::ROOT {
            return Err(GuideError::DeadState(s));
        }
        let mut skip = u32::from(accepting);
        for edge in range.clone() {
            if edge > range.start && dawg.label(edge - 1) >= dawg.label(edge) {
                return Err(GuideError::UnsortedLabels(s));
            }
            let target = dawg.target(edge);
            if target as usize >= states {
                return Err(GuideError::TargetOutOfRange { edge, target });
            }
            if target <= s {
                return Err(GuideError::BackwardEdge {
                    edge,
                    source_state: s,
                    target,
                });
            }
            if dawg.skip(edge) != skip {
                return Err(GuideError::Skip {
                    edge,
                    expected: skip,
                    found: dawg.skip(edge),
                });
            }
            skip = skip
                .checked_add(counts[target as usize])
                .ok_or_else(overflow)?;
        }
        counts[s as usize] = skip;
    }

    if counts[0] != dawg.key_count {
        return Err(GuideError::KeyCount {
            expected: counts[0],
            found: dawg.key_count,
        });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dawg::build_dawg;

    fn guide_for(keys: &[&str]) -> (CompactDawg, Guide) {
        let dawg = build_dawg(keys).unwrap();
        let guide = GuideBuilder.build(&dawg).unwrap();
        (dawg, guide)
    }

    #[test]
    fn child_and_sibling_labels() {
        let (dawg, guide) = guide_for(&["apple", "banana", "band"]);
        assert_eq!(guide.state_count(), dawg.state_count());
        assert_eq!(guide.child(CompactDawg::ROOT), Some(b'a'));

        let a = dawg.follow_edge(CompactDawg::ROOT, b'a').unwrap();
        assert_eq!(guide.sibling(a), Some(b'b'));
        let b = dawg.follow_edge(CompactDawg::ROOT, b'b').unwrap();
        assert_eq!(guide.sibling(b), None);

        let (ban, _) = dawg.walk(b"ban").unwrap();
        assert_eq!(guide.child(ban), Some(b'a'));
        let ana = dawg.follow_edge(ban, b'a').unwrap();
        assert_eq!(guide.sibling(ana), Some(b'd'));

        let (leaf, _) = dawg.walk(b"band").unwrap();
        assert_eq!(guide.child(leaf), None);
    }

    #[test]
    fn empty_automaton_gets_a_guide() {
        let (_, guide) = guide_for(&[]);
        assert_eq!(guide.state_count(), 1);
        assert_eq!(guide.child(CompactDawg::ROOT), None);
    }

    #[test]
    fn rejects_missing_root() {
        let (mut dawg, _) = guide_for(&["a"]);
        dawg.terminals.clear();
        assert_eq!(GuideBuilder.build(&dawg), Err(GuideError::Empty));
    }

    #[test]
    fn rejects_offset_table_of_wrong_length() {
        let (mut dawg, _) = guide_for(&["ab", "b"]);
        dawg.offsets.pop();
        assert!(matches!(
            GuideBuilder.build(&dawg),
            Err(GuideError::OffsetCount { .. })
        ));
    }

    #[test]
    fn rejects_truncated_edge_table() {
        let (mut dawg, _) = guide_for(&["ab", "b"]);
        dawg.skips.pop();
        assert_eq!(GuideBuilder.build(&dawg), Err(GuideError::EdgeCount));
    }

    #[test]
    fn rejects_unsorted_labels() {
        let (mut dawg, _) = guide_for(&["a", "b"]);
        dawg.labels.swap(0, 1);
        assert_eq!(
            GuideBuilder.build(&dawg),
            Err(GuideError::UnsortedLabels(CompactDawg::ROOT))
        );
    }

    #[test]
    fn rejects_edge_back_to_root() {
        let (mut dawg, _) = guide_for(&["ab"]);
        let last = dawg.targets.len() - 1;
        dawg.targets[last] = CompactDawg::ROOT;
        assert!(matches!(
            GuideBuilder.build(&dawg),
            Err(GuideError::BackwardEdge { target: 0, .. })
        ));
    }

    #[test]
    fn rejects_target_out_of_range() {
        let (mut dawg, _) = guide_for(&["ab"]);
        dawg.targets[0] = 99;
        assert!(matches!(
            GuideBuilder.build(&dawg),
            Err(GuideError::TargetOutOfRange { target: 99, .. })
        ));
    }

    #[test]
    fn rejects_dead_state() {
        let (mut dawg, _) = guide_for(&["a"]);
        let leaf = dawg.state_count() - 1;
        dawg.terminals[leaf] = false;
        assert_eq!(
            GuideBuilder.build(&dawg),
            Err(GuideError::DeadState(leaf as StateId))
        );
    }

    #[test]
    fn rejects_wrong_skip() {
        let (mut dawg, _) = guide_for(&["a", "b"]);
        dawg.skips[1] = 5;
        assert_eq!(
            GuideBuilder.build(&dawg),
            Err(GuideError::Skip {
                edge: 1,
                expected: 1,
                found: 5
            })
        );
    }

    #[test]
    fn rejects_wrong_key_count() {
        let (mut dawg, _) = guide_for(&["a", "b"]);
        dawg.key_count = 3;
        assert_eq!(
            GuideBuilder.build(&dawg),
            Err(GuideError::KeyCount {
                expected: 2,
                found: 3
            })
        );
    }
}
