//! # dawgdict
//!
//! Immutable dictionaries from byte-string keys to values, backed by a minimal
//! [DAWG](https://en.wikipedia.org/wiki/Deterministic_acyclic_finite_state_automaton)
//! (Directed Acyclic Word Graph).
//!
//! Keys are inserted in strictly ascending byte order. Shared prefixes and
//! shared suffixes are stored once, so large sorted word lists stay small.
//! The automaton is built incrementally with the algorithm described in
//! [Daciuk et al. (2000)](https://arxiv.org/abs/cs/0007009v1).
//!
//! ## Features
//!
//! - **Lookup** in O(key length), with the key's insertion position as a
//!   by-product
//! - **Prefix completion**: every key under a prefix, in ascending order,
//!   through independent restartable iterators
//! - **Common prefixes**: every stored key that is a prefix of a query
//! - **Persistence** through serde, with validation on load
//! - **Thread-safe**: a built [`Dictionary`] is never mutated
//!
//! ## Quick Start
//!
//! ```
//! use dawgdict::Builder;
//!
//! let mut builder = Builder::new();
//! assert!(builder.insert("apple", 1));
//! assert!(builder.insert("banana", 2));
//! assert!(builder.insert("band", 3));
//! let dict = builder.build().unwrap();
//!
//! assert_eq!(dict.lookup("banana"), Some(&2));
//! assert_eq!(dict.lookup("ban"), None);
//!
//! let under_ban: Vec<_> = dict.enumerate("ban").map(|(key, _)| key).collect();
//! assert_eq!(under_ban, [b"banana".to_vec(), b"band".to_vec()]);
//! ```
//!
//! Keys that break the ordering are refused and leave the builder untouched:
//!
//! ```
//! use dawgdict::{build_dictionary, Error, InsertError};
//!
//! let err = build_dictionary([("b", 'x'), ("a", 'y')]).unwrap_err();
//! assert_eq!(err, Error::Insert(InsertError::order("b", "a")));
//! ```
//!
//! ## Payloads
//!
//! Stored values must implement [`Payload`], which every serde-serializable
//! owned type does. The bound is checked when a [`Builder`] is named, so
//! values that could not be persisted with the dictionary are rejected at
//! compile time.
//!
//! ## Lower Level
//!
//! The [`dawg`] module exposes the automaton on its own: [`dawg::DawgBuilder`]
//! for construction, [`dawg::CompactDawg`] for the flat result and
//! [`dawg::Guide`] for enumeration. [`Builder::with_constructors`] accepts
//! other implementations of [`dawg::AutomatonConstructor`] and
//! [`dawg::GuideConstructor`].
//!
//! ```
//! use dawgdict::dawg::build_dawg;
//!
//! let dawg = build_dawg(["BAKE", "CAKE", "FAKE", "LAKE", "MAKE"]).unwrap();
//! assert_eq!(dawg.index_of(b"FAKE"), Some(2));
//! assert!(!dawg.contains(b"AKE"));
//! // "AKE" is shared by every key.
//! assert_eq!(dawg.state_count(), 5);
//! ```

#![warn(missing_docs)]

mod builder;
mod completer;
/// Automaton construction, compaction and guide derivation.
pub mod dawg;
mod dictionary;
/// Error types.
pub mod error;
mod payload;

pub use builder::{build_dictionary, Builder};
pub use completer::{CommonPrefixes, Completions};
pub use dictionary::Dictionary;
pub use error::{BuildError, DictionaryError, Error, GuideError, InsertError, Result};
pub use payload::Payload;

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use super::*;

    fn keys(dict: &Dictionary<u32>, prefix: &[u8]) -> Vec<Vec<u8>> {
        dict.enumerate(prefix).map(|(key, _)| key).collect()
    }

    #[test]
    fn fruit_scenario() {
        let mut builder = Builder::new();
        assert!(builder.insert("apple", 1u32));
        assert!(builder.insert("banana", 2));
        assert!(builder.insert("band", 3));
        let dict = builder.build().unwrap();

        assert_eq!(dict.lookup("band"), Some(&3));
        assert_eq!(dict.lookup("bandit"), None);
        assert_eq!(keys(&dict, b"ban"), [b"banana".to_vec(), b"band".to_vec()]);
        assert!(keys(&dict, b"c").is_empty());
    }

    #[test]
    fn descending_pair_keeps_first() {
        let mut builder = Builder::new();
        assert!(builder.insert("b", 1u32));
        assert!(!builder.insert("a", 2));
        let dict = builder.build().unwrap();

        assert_eq!(dict.len(), 1);
        assert_eq!(dict.lookup("b"), Some(&1));
        assert_eq!(dict.lookup("a"), None);
        assert_eq!(keys(&dict, b""), [b"b".to_vec()]);
    }

    #[test]
    fn interleaved_rejections_keep_values_aligned() {
        let mut builder = Builder::new();
        let attempts = [("d", 4), ("c", 3), ("e", 5), ("e", 6), ("a", 1), ("f", 7)];
        let accepted: Vec<bool> = attempts
            .iter()
            .map(|&(key, value)| builder.insert(key, value))
            .collect();
        assert_eq!(accepted, [true, false, true, false, false, true]);

        let dict = builder.build().unwrap();
        assert_eq!(dict.values(), [4, 5, 7]);
        assert_eq!(dict.lookup("e"), Some(&5));
        assert_eq!(dict.lookup("c"), None);
    }

    fn key_sets() -> impl Strategy<Value = BTreeMap<Vec<u8>, u32>> {
        prop::collection::btree_map(
            prop::collection::vec(prop::sample::select(b"abcd\0\xff".to_vec()), 0..8),
            any::<u32>(),
            0..64,
        )
    }

    proptest! {
        #[test]
        fn sorted_keys_round_trip(entries in key_sets()) {
            let mut builder = Builder::new();
            for (key, &value) in &entries {
                prop_assert!(builder.insert(key, value));
            }
            let dict = builder.build().unwrap();

            prop_assert_eq!(dict.len(), entries.len());
            for (index, (key, value)) in entries.iter().enumerate() {
                prop_assert_eq!(dict.lookup(key), Some(value));
                prop_assert_eq!(dict.index_of(key), Some(index as u32));
            }
        }

        #[test]
        fn enumeration_matches_sorted_filter(
            entries in key_sets(),
            prefix in prop::collection::vec(prop::sample::select(b"abcd".to_vec()), 0..3),
        ) {
            let dict = build_dictionary(entries.iter().map(|(k, &v)| (k, v))).unwrap();
            let expected: Vec<(Vec<u8>, u32)> = entries
                .iter()
                .filter(|(key, _)| key.starts_with(&prefix))
                .map(|(key, &value)| (key.clone(), value))
                .collect();
            let found: Vec<(Vec<u8>, u32)> = dict
                .enumerate(&prefix)
                .map(|(key, &value)| (key, value))
                .collect();
            prop_assert_eq!(found, expected);
        }

        #[test]
        fn absent_keys_are_not_found(entries in key_sets(), probe in prop::collection::vec(any::<u8>(), 0..8)) {
            let dict = build_dictionary(entries.iter().map(|(k, &v)| (k, v))).unwrap();
            prop_assert_eq!(dict.lookup(&probe), entries.get(&probe));
            prop_assert_eq!(dict.contains(&probe), entries.contains_key(&probe));
        }

        #[test]
        fn unsorted_insertions_keep_ascending_subsequence(
            attempts in prop::collection::vec(prop::collection::vec(0u8..4, 0..4), 0..32),
        ) {
            let mut builder = Builder::new();
            let mut last: Option<&Vec<u8>> = None;
            let mut expected = Vec::new();
            for (value, key) in attempts.iter().enumerate() {
                let should_accept = last.is_none_or(|prev| key > prev);
                prop_assert_eq!(builder.insert(key, value as u32), should_accept);
                if should_accept {
                    last = Some(key);
                    expected.push((key.clone(), value as u32));
                }
            }
            prop_assert_eq!(builder.len(), expected.len());

            let dict = builder.build().unwrap();
            let found: Vec<(Vec<u8>, u32)> = dict.iter().map(|(k, &v)| (k, v)).collect();
            prop_assert_eq!(found, expected);
        }

        #[test]
        fn builder_reuse_is_independent(first in key_sets(), second in key_sets()) {
            let mut builder = Builder::new();
            for (key, &value) in &first {
                builder.insert(key, value);
            }
            let a = builder.build().unwrap();
            for (key, &value) in &second {
                prop_assert!(builder.insert(key, value));
            }
            let b = builder.build().unwrap();

            prop_assert_eq!(a.len(), first.len());
            prop_assert_eq!(b.len(), second.len());
            for key in first.keys().filter(|key| !second.contains_key(*key)) {
                prop_assert_eq!(b.lookup(key), None);
            }
        }
    }
}
