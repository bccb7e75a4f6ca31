use serde::{Deserialize, Serialize};

use crate::completer::{CommonPrefixes, Completions};
use crate::dawg::guide::StoredGuide;
use crate::dawg::{CompactDawg, Guide, GuideBuilder, GuideConstructor};
use crate::error::DictionaryError;
use crate::payload::Payload;

/// An immutable map from byte-string keys to values.
///
/// Produced by [`Builder::build`](crate::Builder::build). Lookups walk the
/// automaton and read the value at the key's index; enumeration walks the
/// guide. Nothing is mutated after construction, so a dictionary can be
/// shared freely between threads.
///
/// A dictionary is serializable with any serde format. Deserialization
/// checks that the automaton, guide and values still fit together.
///
/// # Examples
///
/// ```
/// use dawgdict::Builder;
///
/// let mut builder = Builder::new();
/// assert!(builder.insert("apple", 1));
/// assert!(builder.insert("banana", 2));
/// assert!(builder.insert("band", 3));
/// let dict = builder.build().unwrap();
///
/// assert_eq!(dict.lookup("band"), Some(&3));
/// assert_eq!(dict.lookup("bandit"), None);
///
/// let completions: Vec<_> = dict.enumerate("ban").collect();
/// assert_eq!(completions, [(b"banana".to_vec(), &2), (b"band".to_vec(), &3)]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(
    try_from = "DictionaryParts<T>",
    bound(deserialize = "T: Payload")
)]
pub struct Dictionary<T> {
    dawg: CompactDawg,
    guide: Guide,
    values: Vec<T>,
}

impl<T> Dictionary<T> {
    pub(crate) fn from_parts(dawg: CompactDawg, guide: Guide, values: Vec<T>) -> Self {
        debug_assert_eq!(dawg.key_count() as usize, values.len());
        Dictionary {
            dawg,
            guide,
            values,
        }
    }

    /// Value stored under `key`.
    pub fn lookup(&self, key: impl AsRef<[u8]>) -> Option<&T> {
        let index = self.index_of(key)?;
        self.values.get(index as usize)
    }

    /// True if `key` is stored.
    pub fn contains(&self, key: impl AsRef<[u8]>) -> bool {
        self.index_of(key).is_some()
    }

    /// Position of `key` in insertion order.
    pub fn index_of(&self, key: impl AsRef<[u8]>) -> Option<u32> {
        self.dawg.index_of(key.as_ref())
    }

    /// Every stored key starting with `prefix`, with its value, in ascending
    /// key order.
    ///
    /// The iterator is independent of any other, so calling this again with
    /// the same prefix yields the same sequence.
    pub fn enumerate(&self, prefix: impl AsRef<[u8]>) -> Completions<'_, T> {
        Completions::new(&self.dawg, &self.guide, &self.values, prefix.as_ref())
    }

    /// Every stored key with its value, in ascending key order.
    pub fn iter(&self) -> Completions<'_, T> {
        self.enumerate(b"")
    }

    /// Every stored key that is a prefix of `key` (including `key` itself),
    /// shortest first.
    ///
    /// ```
    /// let dict = dawgdict::build_dictionary([("ban", 1), ("band", 2), ("bar", 3)]).unwrap();
    /// let hits: Vec<_> = dict.common_prefixes("bandit").map(|(k, v)| (k, *v)).collect();
    /// assert_eq!(hits, [(b"ban".as_slice(), 1), (b"band".as_slice(), 2)]);
    /// ```
    pub fn common_prefixes<'d, 'k, K>(&'d self, key: &'k K) -> CommonPrefixes<'d, 'k, T>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        CommonPrefixes::new(&self.dawg, &self.values, key.as_ref())
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no key is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in insertion order.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Takes the values out, dropping the automaton.
    pub fn into_values(self) -> Vec<T> {
        self.values
    }

    /// The compacted automaton.
    pub fn automaton(&self) -> &CompactDawg {
        &self.dawg
    }

    /// The enumeration guide.
    pub fn guide(&self) -> &Guide {
        &self.guide
    }
}

impl<'d, T> IntoIterator for &'d Dictionary<T> {
    type Item = (Vec<u8>, &'d T);
    type IntoIter = Completions<'d, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Serialized form of a [`Dictionary`], before validation.
#[derive(Deserialize)]
struct DictionaryParts<T> {
    dawg: CompactDawg,
    guide: StoredGuide,
    values: Vec<T>,
}

impl<T> TryFrom<DictionaryParts<T>> for Dictionary<T> {
    type Error = DictionaryError;

    fn try_from(parts: DictionaryParts<T>) -> Result<Self, Self::Error> {
        let guide = GuideBuilder.build(&parts.dawg)?;
        if !parts.guide.matches(&guide) {
            return Err(DictionaryError::GuideMismatch);
        }
        if parts.dawg.key_count() as usize != parts.values.len() {
            return Err(DictionaryError::ValueCount {
                keys: parts.dawg.key_count(),
                values: parts.values.len(),
            });
        }
        Ok(Dictionary::from_parts(parts.dawg, guide, parts.values))
    }
}
