use serde_json::{Map, Value};

/// A submitted field map, equivalent to form-encoded key/value pairs.
///
/// Form submissions only ever carry text values. JSON submissions may carry
/// anything, so validation has to check value types as well as presence.
pub type Fields = Map<String, Value>;

/// Build a field map from key/value text pairs. Later duplicates win.
pub fn fields_from_pairs<K, V, I>(pairs: I) -> Fields
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), Value::String(v.into())))
        .collect()
}
