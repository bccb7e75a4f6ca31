use crate::dawg::{AutomatonConstructor, DawgBuilder, GuideBuilder, GuideConstructor};
use crate::dictionary::Dictionary;
use crate::error::{self, BuildError, InsertError};
use crate::payload::Payload;

/// Accumulates sorted `(key, value)` pairs and builds a [`Dictionary`].
///
/// Keys go to the automaton constructor, values to a payload vector, in
/// lockstep: a value is stored only if its key was accepted, and the
/// automaton tags each key with the position its value lands at.
///
/// [`build`](Builder::build) moves everything into a new dictionary and
/// leaves the builder empty, ready for an unrelated batch.
///
/// `A` and `G` are the automaton and guide constructors. The defaults build a
/// minimal DAWG; other implementations can be plugged in with
/// [`with_constructors`](Builder::with_constructors).
///
/// # Examples
///
/// ```
/// use dawgdict::Builder;
///
/// let mut builder = Builder::new();
/// assert!(builder.insert("b", 1));
/// assert!(!builder.insert("a", 2)); // out of order
/// assert_eq!(builder.len(), 1);
///
/// let dict = builder.build().unwrap();
/// assert_eq!(dict.lookup("b"), Some(&1));
/// assert_eq!(dict.lookup("a"), None);
/// assert!(builder.is_empty());
/// ```
pub struct Builder<T: Payload, A = DawgBuilder, G = GuideBuilder> {
    automaton: A,
    guide: G,
    values: Vec<T>,
}

impl<T: Payload> Builder<T> {
    /// Creates an empty builder backed by [`DawgBuilder`] and [`GuideBuilder`].
    pub fn new() -> Self {
        Self::with_constructors(DawgBuilder::new(), GuideBuilder::new())
    }

    /// Creates an empty builder with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut builder = Self::new();
        builder.values.reserve(capacity);
        builder
    }
}

impl<T: Payload> Default for Builder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A, G> Builder<T, A, G>
where
    T: Payload,
    A: AutomatonConstructor,
    G: GuideConstructor,
{
    /// Creates an empty builder on top of the given constructors.
    pub fn with_constructors(automaton: A, guide: G) -> Self {
        Builder {
            automaton,
            guide,
            values: Vec::new(),
        }
    }

    /// Adds `key` with `value`.
    ///
    /// Returns `false`, storing nothing, if `key` is not strictly greater
    /// than the previously accepted key. Use
    /// [`try_insert`](Builder::try_insert) to learn why.
    pub fn insert(&mut self, key: impl AsRef<[u8]>, value: T) -> bool {
        self.try_insert(key, value).is_ok()
    }

    /// Adds `key` with `value`, reporting why a key was rejected.
    ///
    /// ```
    /// use dawgdict::{Builder, InsertError};
    ///
    /// let mut builder = Builder::new();
    /// builder.try_insert("band", 3).unwrap();
    /// assert_eq!(
    ///     builder.try_insert("band", 4),
    ///     Err(InsertError::duplicate("band"))
    /// );
    /// assert_eq!(
    ///     builder.try_insert("apple", 1),
    ///     Err(InsertError::order("band", "apple"))
    /// );
    /// ```
    pub fn try_insert(&mut self, key: impl AsRef<[u8]>, value: T) -> Result<(), InsertError> {
        let key = key.as_ref();
        let index = u32::try_from(self.values.len()).map_err(|_| InsertError::TooManyKeys)?;
        if let Err(err) = self.automaton.insert(key, index) {
            tracing::trace!(index, error = %err, "key rejected");
            return Err(err);
        }
        self.values.push(value);
        Ok(())
    }

    /// Number of keys accepted since the builder was created or last built.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no key has been accepted since the builder was created or
    /// last built.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Builds a dictionary from everything accepted so far.
    ///
    /// The builder is empty afterwards, whether or not the build succeeds.
    /// On failure no dictionary is produced and the accepted values are
    /// dropped.
    pub fn build(&mut self) -> Result<Dictionary<T>, BuildError> {
        let values = std::mem::take(&mut self.values);
        let finished = self.automaton.finish();
        self.automaton.reset();

        let dawg = finished.inspect_err(|err| {
            tracing::warn!(error = %err, "automaton construction failed");
        })?;
        if dawg.key_count() as usize != values.len() {
            tracing::warn!(
                keys = dawg.key_count(),
                values = values.len(),
                "automaton lost keys"
            );
            return Err(BuildError::automaton(format!(
                "automaton holds {} keys but {} values were inserted",
                dawg.key_count(),
                values.len()
            )));
        }
        let guide = self.guide.build(&dawg).inspect_err(|err| {
            tracing::warn!(error = %err, "guide construction failed");
        })?;

        tracing::debug!(
            keys = values.len(),
            states = dawg.state_count(),
            edges = dawg.edge_count(),
            "dictionary built"
        );
        Ok(Dictionary::from_parts(dawg, guide, values))
    }
}

/// Builds a dictionary from `(key, value)` pairs sorted by key.
///
/// Stops at the first key that is out of order or repeated.
///
/// # Examples
///
/// ```
/// use dawgdict::build_dictionary;
///
/// let dict = build_dictionary([("apple", 1), ("banana", 2), ("cherry", 3)]).unwrap();
/// assert_eq!(dict.lookup("banana"), Some(&2));
///
/// assert!(build_dictionary([("b", 1), ("a", 2)]).is_err());
/// ```
pub fn build_dictionary<K, T>(pairs: impl IntoIterator<Item = (K, T)>) -> error::Result<Dictionary<T>>
where
    K: AsRef<[u8]>,
    T: Payload,
{
    let mut builder = Builder::new();
    for (key, value) in pairs {
        builder.try_insert(key, value)?;
    }
    Ok(builder.build()?)
}
