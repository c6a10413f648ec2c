// src/internal/lookup/mod.rs

//! Reverse lookups: keys of a map by value.

use std::fmt::Debug;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("{0} not found in map values")]
    ValueNotFound(String),
}

/// Every key mapped to `value`, in the map's iteration order.
///
/// Fails when no entry holds `value`.
pub fn get_keys<'a, K, V, I>(value: &V, map: I) -> Result<Vec<&'a K>, LookupError>
where
    K: 'a,
    V: PartialEq + Debug + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    let keys: Vec<&K> = map
        .into_iter()
        .filter(|(_, v)| *v == value)
        .map(|(k, _)| k)
        .collect();
    if keys.is_empty() {
        return Err(LookupError::ValueNotFound(format!("{:?}", value)));
    }
    Ok(keys)
}

/// First key mapped to `value`, if any.
pub fn get_key<'a, K, V, I>(value: &V, map: I) -> Option<&'a K>
where
    K: 'a,
    V: PartialEq + Debug + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    get_keys(value, map).ok()?.into_iter().next()
}
