use std::iter::FusedIterator;

use smallvec::SmallVec;

use crate::dawg::{CompactDawg, EdgeId, Guide, StateId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cursor {
    Start,
    Running,
    Done,
}

/// Keys starting with a prefix, with their values, in ascending key order.
///
/// Created by [`Dictionary::enumerate`](crate::Dictionary::enumerate) and
/// [`Dictionary::iter`](crate::Dictionary::iter). Each iterator owns its
/// cursor, so any number of them can run over the same dictionary.
///
/// Keys in the sub-automaton below a state have consecutive indices, so the
/// index of each completion is the index of the previous one plus one.
pub struct Completions<'d, T> {
    dawg: &'d CompactDawg,
    guide: &'d Guide,
    values: &'d [T],
    start: StateId,
    path: SmallVec<[(StateId, EdgeId); 16]>,
    key: Vec<u8>,
    next_index: u32,
    cursor: Cursor,
}

impl<T> Clone for Completions<'_, T> {
    fn clone(&self) -> Self {
        Completions {
            dawg: self.dawg,
            guide: self.guide,
            values: self.values,
            start: self.start,
            path: self.path.clone(),
            key: self.key.clone(),
            next_index: self.next_index,
            cursor: self.cursor,
        }
    }
}

impl<'d, T> Completions<'d, T> {
    pub(crate) fn new(
        dawg: &'d CompactDawg,
        guide: &'d Guide,
        values: &'d [T],
        prefix: &[u8],
    ) -> Self {
        let (start, next_index, cursor) = match dawg.walk(prefix) {
            Some((state, rank)) => (state, rank, Cursor::Start),
            None => (CompactDawg::ROOT, 0, Cursor::Done),
        };
        Completions {
            dawg,
            guide,
            values,
            start,
            path: SmallVec::new(),
            key: prefix.to_vec(),
            next_index,
            cursor,
        }
    }

    fn current(&self) -> StateId {
        self.path
            .last()
            .map_or(self.start, |&(_, edge)| self.dawg.target(edge))
    }

    fn descend(&mut self, state: StateId, label: u8) -> bool {
        match self.dawg.follow_edge(state, label) {
            Some(edge) => {
                self.path.push((state, edge));
                self.key.push(label);
                true
            }
            None => false,
        }
    }

    /// Backtracks to the nearest unvisited sibling edge and takes it.
    fn advance_sibling(&mut self) -> bool {
        while let Some((state, edge)) = self.path.pop() {
            self.key.pop();
            if let Some(label) = self.guide.sibling(edge) {
                return self.descend(state, label);
            }
        }
        false
    }

    fn emit(&mut self) -> Option<(Vec<u8>, &'d T)> {
        let values = self.values;
        let Some(value) = values.get(self.next_index as usize) else {
            self.cursor = Cursor::Done;
            return None;
        };
        self.next_index += 1;
        Some((self.key.clone(), value))
    }
}

impl<'d, T> Iterator for Completions<'d, T> {
    type Item = (Vec<u8>, &'d T);

    fn next(&mut self) -> Option<Self::Item> {
        match self.cursor {
            Cursor::Done => return None,
            Cursor::Start => {
                self.cursor = Cursor::Running;
                if self.dawg.is_accepting(self.start) {
                    return self.emit();
                }
            }
            Cursor::Running => {}
        }

        loop {
            let state = self.current();
            let moved = match self.guide.child(state) {
                Some(label) => self.descend(state, label),
                None => self.advance_sibling(),
            };
            if !moved {
                self.cursor = Cursor::Done;
                return None;
            }
            if self.dawg.is_accepting(self.current()) {
                return self.emit();
            }
        }
    }
}

impl<T> FusedIterator for Completions<'_, T> {}

/// Stored keys that are prefixes of a given key, shortest first.
///
/// Created by [`Dictionary::common_prefixes`](crate::Dictionary::common_prefixes).
pub struct CommonPrefixes<'d, 'k, T> {
    dawg: &'d CompactDawg,
    values: &'d [T],
    key: &'k [u8],
    pos: usize,
    state: Option<StateId>,
    rank: u32,
}

impl<T> Clone for CommonPrefixes<'_, '_, T> {
    fn clone(&self) -> Self {
        CommonPrefixes {
            dawg: self.dawg,
            values: self.values,
            key: self.key,
            pos: self.pos,
            state: self.state,
            rank: self.rank,
        }
    }
}

impl<'d, 'k, T> CommonPrefixes<'d, 'k, T> {
    pub(crate) fn new(dawg: &'d CompactDawg, values: &'d [T], key: &'k [u8]) -> Self {
        CommonPrefixes {
            dawg,
            values,
            key,
            pos: 0,
            state: Some(CompactDawg::ROOT),
            rank: 0,
        }
    }
}

impl<'d, 'k, T> Iterator for CommonPrefixes<'d, 'k, T> {
    type Item = (&'k [u8], &'d T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let state = self.state?;
            let pos = self.pos;
            let hit = self.dawg.is_accepting(state).then_some(self.rank);

            let edge = self
                .key
                .get(pos)
                .and_then(|&label| self.dawg.follow_edge(state, label));
            if let Some(edge) = edge {
                self.rank += self.dawg.skip(edge);
            }
            self.state = edge.map(|edge| self.dawg.target(edge));
            self.pos += 1;

            if let Some(index) = hit {
                let key = self.key;
                return self.values.get(index as usize).map(|value| (&key[..pos], value));
            }
        }
    }
}

impl<T> FusedIterator for CommonPrefixes<'_, '_, T> {}
