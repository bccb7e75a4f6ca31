use serde::de::DeserializeOwned;
use serde::Serialize;

/// Values that can be stored in a [`Dictionary`](crate::Dictionary).
///
/// A payload must be persistable together with the dictionary that holds
/// it. Plain fixed-layout values (integers, floats, `bool`, `char`, `()`,
/// arrays and tuples of those) qualify through serde's own implementations;
/// other types opt in by deriving `Serialize` and `Deserialize`.
///
/// Being plain data is not enough on its own: a user-defined struct, even a
/// `Copy` one made only of integers, qualifies only once it derives the serde
/// traits. There is no separate fixed-layout path.
///
/// The check happens when a [`Builder`](crate::Builder) for the payload type
/// is named, so an unsupported type never reaches run time:
///
/// ```compile_fail
/// struct Handle(std::rc::Rc<u8>);
///
/// let builder = dawgdict::Builder::<Handle>::new();
/// ```
///
/// ```compile_fail
/// #[derive(Clone, Copy)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let builder = dawgdict::Builder::<Point>::new();
/// ```
///
/// ```
/// #[derive(serde::Serialize, serde::Deserialize)]
/// struct Entry {
///     id: u64,
///     tags: Vec<String>,
/// }
///
/// let mut builder = dawgdict::Builder::<Entry>::new();
/// assert!(builder.insert("rust", Entry { id: 1, tags: vec!["lang".into()] }));
/// ```
pub trait Payload: Serialize + DeserializeOwned {}

impl<T: Serialize + DeserializeOwned> Payload for T {}
