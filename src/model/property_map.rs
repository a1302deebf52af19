//! PropertyMap: the key-value store on nodes and edges.

use std::collections::BTreeMap;
use super::Value;

/// A map of property names to scalar values.
///
/// Ordered so that rendered queries and exported rows are byte-identical
/// across runs.
pub type PropertyMap = BTreeMap<String, Value>;

/// Build a PropertyMap from `(key, value)` pairs.
pub fn props<K, V, I>(pairs: I) -> PropertyMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// True if every entry of `pattern` is present in `props` with an equal value.
pub fn contains_all(props: &PropertyMap, pattern: &PropertyMap) -> bool {
    pattern.iter().all(|(k, v)| props.get(k) == Some(v))
}
