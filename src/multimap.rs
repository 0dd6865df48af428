//! Ordered multimap keyed by hashed strings.
//!
//! [`OrderedMultimap`] stores any number of values under the same string key. The
//! values of one key form a dense, zero-based sequence of *positions*: appending
//! assigns the next position, inserting in the middle shifts the tail up, and
//! removing shifts it back down so there are never gaps.
//!
//! Every stored value is identified by an [`Entry`]: the key's hash, the position,
//! and the original key string.
//!
//! ## Why IndexMap?
//!
//! The buckets live in an [`IndexMap`] so that:
//!
//! - **Deterministic output**: keys enumerate in the order they were first added,
//!   which keeps INI sections in file order when a document is written back
//! - **Cheap lookup**: the key hash is computed once and fed straight to the map
//! - **Collision safety**: buckets compare the full key string, so two keys whose
//!   hashes collide keep separate position counters
//!
//! ## Examples
//!
//! ```rust
//! use tagconf::OrderedMultimap;
//!
//! let mut map = OrderedMultimap::new();
//! assert_eq!(map.add("path", "/usr/bin"), 0);
//! assert_eq!(map.add("path", "/bin"), 1);
//! map.insert("path", 0, "/opt/bin").unwrap();
//!
//! assert_eq!(map.get_all("path"), &["/opt/bin", "/usr/bin", "/bin"]);
//! assert_eq!(map.remove("path", 1).unwrap(), "/usr/bin");
//! assert_eq!(map.get("path", 1).unwrap(), &"/bin");
//! ```

use crate::hash::{HashKey, KeyRef};
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::ops::Index;

/// Identity of one stored value: `(key_hash, position, key)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Entry<'a> {
    pub hash: u32,
    pub position: usize,
    pub key: &'a str,
}

impl<'a> Entry<'a> {
    fn new(key: &'a HashKey, position: usize) -> Self {
        Entry {
            hash: key.key_hash(),
            position,
            key: key.as_str(),
        }
    }
}

/// A map from string keys to ordered sequences of values.
///
/// See the [module documentation](self) for the position model.
///
/// # Examples
///
/// ```rust
/// use tagconf::OrderedMultimap;
///
/// let mut map = OrderedMultimap::new();
/// map.add("include", "base.ini".to_string());
/// map.add("include", "local.ini".to_string());
/// map.add("name", "demo".to_string());
///
/// assert_eq!(map.len(), 3);
/// assert_eq!(map.count("include"), 2);
/// assert_eq!(map.get_last("include").unwrap(), "local.ini");
/// assert!(map.try_get("missing", 0).is_none());
/// ```
#[derive(Clone)]
pub struct OrderedMultimap<V> {
    buckets: IndexMap<HashKey, Vec<V>>,
    len: usize,
}

impl<V> OrderedMultimap<V> {
    /// Creates an empty multimap.
    #[must_use]
    pub fn new() -> Self {
        OrderedMultimap {
            buckets: IndexMap::new(),
            len: 0,
        }
    }

    /// Creates an empty multimap with room for `capacity` distinct keys.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        OrderedMultimap {
            buckets: IndexMap::with_capacity(capacity),
            len: 0,
        }
    }

    /// Total number of stored values across all keys.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct keys.
    #[inline]
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of values stored under `key`; the valid positions are `0..count`.
    #[must_use]
    pub fn count(&self, key: &str) -> usize {
        self.bucket(key).map_or(0, Vec::len)
    }

    fn bucket(&self, key: &str) -> Option<&Vec<V>> {
        self.buckets.get(&KeyRef::new(key))
    }

    fn bucket_mut(&mut self, key: &str) -> Option<&mut Vec<V>> {
        self.buckets.get_mut(&KeyRef::new(key))
    }

    fn existing_bucket_mut(&mut self, key: &str) -> Result<&mut Vec<V>> {
        self.bucket_mut(key)
            .ok_or_else(|| Error::key_not_found(key))
    }

    /// Drops the bucket once its last value is gone, keeping the order of the others.
    fn prune(&mut self, key: &str) {
        let key_ref = KeyRef::new(key);
        if self.buckets.get(&key_ref).is_some_and(Vec::is_empty) {
            self.buckets.shift_remove(&key_ref);
        }
    }

    /// Appends `value` under `key` and returns its position.
    pub fn add(&mut self, key: &str, value: V) -> usize {
        let key_ref = KeyRef::new(key);
        self.len += 1;
        if let Some(values) = self.buckets.get_mut(&key_ref) {
            values.push(value);
            return values.len() - 1;
        }
        self.buckets.insert(key_ref.to_hash_key(), vec![value]);
        0
    }

    /// Inserts `value` at `position`, shifting the values at and after it up by one.
    ///
    /// `position` may equal the current count (append). A key with no values only
    /// accepts position 0.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] when `position > count(key)`.
    pub fn insert(&mut self, key: &str, position: usize, value: V) -> Result<()> {
        self.insert_range(key, position, std::iter::once(value))
    }

    /// Inserts `value` at position 0 of `key`.
    pub fn add_first(&mut self, key: &str, value: V) {
        let key_ref = KeyRef::new(key);
        self.len += 1;
        match self.buckets.get_mut(&key_ref) {
            Some(values) => values.insert(0, value),
            None => {
                self.buckets.insert(key_ref.to_hash_key(), vec![value]);
            }
        }
    }

    /// Appends every value under `key`; returns the last assigned position, or
    /// `None` when `values` was empty.
    pub fn add_range<I>(&mut self, key: &str, values: I) -> Option<usize>
    where
        I: IntoIterator<Item = V>,
    {
        values.into_iter().fold(None, |_, value| Some(self.add(key, value)))
    }

    /// Inserts `values` starting at `position`, shifting the tail up by their count.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] when `position > count(key)`.
    pub fn insert_range<I>(&mut self, key: &str, position: usize, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
    {
        let count = self.count(key);
        if position > count {
            return Err(Error::index_out_of_range(key, position, count));
        }
        let mut values = values.into_iter().peekable();
        if values.peek().is_none() {
            return Ok(());
        }

        let key_ref = KeyRef::new(key);
        let bucket = match self.buckets.get_index_of(&key_ref) {
            Some(index) => &mut self.buckets[index],
            None => {
                let (index, _) = self.buckets.insert_full(key_ref.to_hash_key(), Vec::new());
                &mut self.buckets[index]
            }
        };
        // make room: the tail moves up by the number of inserted values
        let before = bucket.len();
        bucket.splice(position..position, values);
        self.len += bucket.len() - before;
        Ok(())
    }

    /// Returns the value at `position` of `key`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] when the key has no values,
    /// [`Error::IndexOutOfRange`] when `position >= count(key)`.
    pub fn get(&self, key: &str, position: usize) -> Result<&V> {
        let values = self.bucket(key).ok_or_else(|| Error::key_not_found(key))?;
        values
            .get(position)
            .ok_or_else(|| Error::index_out_of_range(key, position, values.len()))
    }

    pub fn get_mut(&mut self, key: &str, position: usize) -> Result<&mut V> {
        let values = self.existing_bucket_mut(key)?;
        let len = values.len();
        values
            .get_mut(position)
            .ok_or_else(|| Error::index_out_of_range(key, position, len))
    }

    /// Returns the value at the highest position of `key`.
    pub fn get_last(&self, key: &str) -> Result<&V> {
        self.bucket(key)
            .and_then(|values| values.last())
            .ok_or_else(|| Error::key_not_found(key))
    }

    /// Returns the value at `position` of `key`, or `None`.
    #[must_use]
    pub fn try_get(&self, key: &str, position: usize) -> Option<&V> {
        self.bucket(key).and_then(|values| values.get(position))
    }

    #[must_use]
    pub fn try_get_last(&self, key: &str) -> Option<&V> {
        self.bucket(key).and_then(|values| values.last())
    }

    /// All values of `key` in position order; empty when the key is absent.
    #[must_use]
    pub fn get_all(&self, key: &str) -> &[V] {
        self.bucket(key).map_or(&[], Vec::as_slice)
    }

    /// Replaces the value at `position` and returns the previous one.
    pub fn set(&mut self, key: &str, position: usize, value: V) -> Result<V> {
        let slot = self.get_mut(key, position)?;
        Ok(std::mem::replace(slot, value))
    }

    pub fn set_last(&mut self, key: &str, value: V) -> Result<V> {
        let slot = self
            .existing_bucket_mut(key)?
            .last_mut()
            .ok_or_else(|| Error::key_not_found(key))?;
        Ok(std::mem::replace(slot, value))
    }

    /// Overwrites `values.len()` consecutive positions starting at `start`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] when the run does not fit inside the existing
    /// positions; nothing is written in that case.
    pub fn set_values<I>(&mut self, key: &str, start: usize, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
    {
        let values: Vec<V> = values.into_iter().collect();
        let bucket = self.existing_bucket_mut(key)?;
        let end = start + values.len();
        if end > bucket.len() {
            return Err(Error::index_out_of_range(key, end, bucket.len()));
        }
        for (slot, value) in bucket[start..end].iter_mut().zip(values) {
            *slot = value;
        }
        Ok(())
    }

    /// Overwrites the last `values.len()` positions of `key`.
    pub fn set_last_values<I>(&mut self, key: &str, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
    {
        let values: Vec<V> = values.into_iter().collect();
        let count = self.count(key);
        if count == 0 {
            return Err(Error::key_not_found(key));
        }
        let start = count
            .checked_sub(values.len())
            .ok_or_else(|| Error::index_out_of_range(key, values.len(), count))?;
        self.set_values(key, start, values)
    }

    /// Removes the value at `position`; later positions shift down by one.
    pub fn remove(&mut self, key: &str, position: usize) -> Result<V> {
        let values = self.existing_bucket_mut(key)?;
        if position >= values.len() {
            return Err(Error::index_out_of_range(key, position, values.len()));
        }
        let value = values.remove(position);
        self.len -= 1;
        self.prune(key);
        Ok(value)
    }

    pub fn remove_last(&mut self, key: &str) -> Result<V> {
        let value = self
            .existing_bucket_mut(key)?
            .pop()
            .ok_or_else(|| Error::key_not_found(key))?;
        self.len -= 1;
        self.prune(key);
        Ok(value)
    }

    /// Removes `n` consecutive values starting at `start`; the remainder shifts
    /// down by `n`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] when `start + n > count(key)`.
    pub fn remove_range(&mut self, key: &str, start: usize, n: usize) -> Result<Vec<V>> {
        let values = self.existing_bucket_mut(key)?;
        let end = start
            .checked_add(n)
            .filter(|end| *end <= values.len())
            .ok_or_else(|| Error::index_out_of_range(key, start.saturating_add(n), values.len()))?;
        let removed: Vec<V> = values.drain(start..end).collect();
        self.len -= removed.len();
        self.prune(key);
        Ok(removed)
    }

    /// Removes every value of `key`.
    pub fn remove_key(&mut self, key: &str) -> Result<Vec<V>> {
        let values = self
            .buckets
            .shift_remove(&KeyRef::new(key))
            .ok_or_else(|| Error::key_not_found(key))?;
        self.len -= values.len();
        Ok(values)
    }

    /// Returns `true` if `key` has a value at `position`.
    #[must_use]
    pub fn contains_key(&self, key: &str, position: usize) -> bool {
        self.try_get(key, position).is_some()
    }

    /// Returns `true` if `key` has at least one value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.contains_key(key, 0)
    }

    /// Linear scan for `value`.
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.buckets.values().flatten().any(|stored| stored == value)
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
        self.len = 0;
    }

    /// Iterates `(Entry, &V)` pairs: keys in first-insertion order, positions
    /// ascending within a key.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            current: None,
            remaining: self.len,
        }
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entry<'_>, &mut V)> + '_ {
        self.buckets.iter_mut().flat_map(|(key, values)| {
            values
                .iter_mut()
                .enumerate()
                .map(move |(position, value)| (Entry::new(key, position), value))
        })
    }

    /// Distinct keys in first-insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.buckets.keys().map(HashKey::as_str)
    }

    /// All values, grouped like [`iter`](Self::iter).
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.buckets.values().flatten()
    }

    /// Appends every entry of `self` into `other` without cloning.
    pub fn move_to(self, other: &mut OrderedMultimap<V>) {
        for (key, values) in self.buckets {
            other.add_range(key.as_str(), values);
        }
    }

    /// Returns position 0 of `key`, adding `default()` there first when the key has
    /// no values.
    pub fn first_or_insert_with<F>(&mut self, key: &str, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let key_ref = KeyRef::new(key);
        let index = match self.buckets.get_index_of(&key_ref) {
            Some(index) => index,
            None => {
                self.len += 1;
                self.buckets
                    .insert_full(key_ref.to_hash_key(), vec![default()])
                    .0
            }
        };
        // buckets are pruned when emptied, so position 0 always exists
        &mut self.buckets[index][0]
    }
}

impl<V: Clone> OrderedMultimap<V> {
    pub fn get_cloned(&self, key: &str, position: usize) -> Result<V> {
        self.get(key, position).cloned()
    }

    #[must_use]
    pub fn get_all_cloned(&self, key: &str) -> Vec<V> {
        self.get_all(key).to_vec()
    }

    /// Clone-appends every entry of `self` into `other` under the same key string.
    ///
    /// Positions are assigned by `other`'s own append order.
    pub fn copy_to(&self, other: &mut OrderedMultimap<V>) {
        for (key, values) in &self.buckets {
            other.add_range(key.as_str(), values.iter().cloned());
        }
    }
}

impl<V> Default for OrderedMultimap<V> {
    fn default() -> Self {
        Self::new()
    }
}

// Key order is part of equality.
impl<V: PartialEq> PartialEq for OrderedMultimap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.buckets.iter().eq(other.buckets.iter())
    }
}

impl<V: fmt::Debug> fmt::Debug for OrderedMultimap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.buckets.iter().map(|(k, v)| (k.as_str(), v)))
            .finish()
    }
}

/// Returns position 0 of `key`.
///
/// # Panics
///
/// Panics if `key` has no values.
impl<V> Index<&str> for OrderedMultimap<V> {
    type Output = V;

    fn index(&self, key: &str) -> &V {
        match self.get(key, 0) {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }
}

impl<K: AsRef<str>, V> FromIterator<(K, V)> for OrderedMultimap<V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = OrderedMultimap::new();
        map.extend(iter);
        map
    }
}

impl<K: AsRef<str>, V> Extend<(K, V)> for OrderedMultimap<V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.add(key.as_ref(), value);
        }
    }
}

impl<V> IntoIterator for OrderedMultimap<V> {
    type Item = (String, V);
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            buckets: self.buckets.into_iter(),
            current: None,
        }
    }
}

/// Owning iterator over `(key, value)` pairs, grouped like [`OrderedMultimap::iter`].
pub struct IntoIter<V> {
    buckets: indexmap::map::IntoIter<HashKey, Vec<V>>,
    current: Option<(String, std::vec::IntoIter<V>)>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((key, values)) = &mut self.current {
                if let Some(value) = values.next() {
                    return Some((key.clone(), value));
                }
            }
            let (key, values) = self.buckets.next()?;
            self.current = Some((key.into_string(), values.into_iter()));
        }
    }
}

impl<'a, V> IntoIterator for &'a OrderedMultimap<V> {
    type Item = (Entry<'a>, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`OrderedMultimap::iter`].
pub struct Iter<'a, V> {
    buckets: indexmap::map::Iter<'a, HashKey, Vec<V>>,
    current: Option<(&'a HashKey, std::iter::Enumerate<std::slice::Iter<'a, V>>)>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Entry<'a>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((key, values)) = &mut self.current {
                if let Some((position, value)) = values.next() {
                    self.remaining -= 1;
                    return Some((Entry::new(*key, position), value));
                }
            }
            let (key, values) = self.buckets.next()?;
            self.current = Some((key, values.iter().enumerate()));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V: Serialize> Serialize for OrderedMultimap<V> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (key, values) in &self.buckets {
            map.serialize_entry(key.as_str(), values)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMultimap<V> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MultimapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for MultimapVisitor<V> {
            type Value = OrderedMultimap<V>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map from keys to sequences of values")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = OrderedMultimap::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, values)) = access.next_entry::<String, Vec<V>>()? {
                    map.add_range(&key, values);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(MultimapVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(map: &OrderedMultimap<i32>, key: &str) -> Vec<usize> {
        map.iter()
            .filter(|(entry, _)| entry.key == key)
            .map(|(entry, _)| entry.position)
            .collect()
    }

    #[test]
    fn test_add_assigns_dense_positions() {
        let mut map = OrderedMultimap::new();
        assert_eq!(map.add("a", 1), 0);
        assert_eq!(map.add("b", 10), 0);
        assert_eq!(map.add("a", 2), 1);
        assert_eq!(map.add("a", 3), 2);
        assert_eq!(positions(&map, "a"), vec![0, 1, 2]);
        assert_eq!(map.len(), 4);
        assert_eq!(map.key_count(), 2);
    }

    #[test]
    fn test_insert_makes_room() {
        let mut map: OrderedMultimap<i32> = [("k", 1), ("k", 2), ("k", 3)].into_iter().collect();
        map.insert("k", 1, 99).unwrap();
        assert_eq!(map.get_all("k"), &[1, 99, 2, 3]);
        map.insert("k", 4, 100).unwrap();
        assert_eq!(map.get_last("k").unwrap(), &100);
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut map = OrderedMultimap::new();
        map.add("k", 1);
        assert_eq!(
            map.insert("k", 3, 2),
            Err(Error::index_out_of_range("k", 3, 1))
        );
        assert_eq!(
            map.insert("new", 1, 2),
            Err(Error::index_out_of_range("new", 1, 0))
        );
        assert!(map.insert("new", 0, 2).is_ok());
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_add_first_and_range() {
        let mut map = OrderedMultimap::new();
        assert_eq!(map.add_range("k", vec![2, 3]), Some(1));
        map.add_first("k", 1);
        assert_eq!(map.get_all("k"), &[1, 2, 3]);
        assert_eq!(map.add_range("k", Vec::new()), None);
        map.insert_range("k", 1, vec![7, 8]).unwrap();
        assert_eq!(map.get_all("k"), &[1, 7, 8, 2, 3]);
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn test_get_failures_are_typed() {
        let mut map = OrderedMultimap::new();
        map.add("k", 1);
        assert_eq!(map.get("missing", 0), Err(Error::key_not_found("missing")));
        assert_eq!(map.get("k", 1), Err(Error::index_out_of_range("k", 1, 1)));
        assert!(map.get_last("missing").is_err());
        assert_eq!(map.try_get("k", 1), None);
        assert_eq!(map.try_get_last("k"), Some(&1));
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut map: OrderedMultimap<i32> = [("k", 1), ("k", 2)].into_iter().collect();
        assert_eq!(map.set("k", 1, 20).unwrap(), 2);
        assert_eq!(map.set_last("k", 21).unwrap(), 20);
        assert!(map.set("k", 2, 0).is_err());
        assert_eq!(map.get_all("k"), &[1, 21]);
    }

    #[test]
    fn test_set_values_must_fit() {
        let mut map: OrderedMultimap<i32> = [("k", 1), ("k", 2), ("k", 3)].into_iter().collect();
        map.set_values("k", 1, vec![20, 30]).unwrap();
        assert_eq!(map.get_all("k"), &[1, 20, 30]);
        assert!(map.set_values("k", 2, vec![0, 0]).is_err());
        assert_eq!(map.get_all("k"), &[1, 20, 30]);
        map.set_last_values("k", vec![7, 8]).unwrap();
        assert_eq!(map.get_all("k"), &[1, 7, 8]);
        assert!(map.set_last_values("k", vec![0; 4]).is_err());
    }

    #[test]
    fn test_remove_shifts_down() {
        let mut map: OrderedMultimap<i32> =
            [("k", 1), ("k", 2), ("k", 3), ("k", 4)].into_iter().collect();
        assert_eq!(map.remove("k", 1).unwrap(), 2);
        assert_eq!(map.get_all("k"), &[1, 3, 4]);
        assert_eq!(positions(&map, "k"), vec![0, 1, 2]);
        assert_eq!(map.remove_last("k").unwrap(), 4);
        assert_eq!(map.remove("k", 5), Err(Error::index_out_of_range("k", 5, 2)));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_remove_range() {
        let mut map: OrderedMultimap<i32> = (1..=6).map(|v| ("k", v)).collect();
        assert_eq!(map.remove_range("k", 1, 3).unwrap(), vec![2, 3, 4]);
        assert_eq!(map.get_all("k"), &[1, 5, 6]);
        assert!(map.remove_range("k", 2, 2).is_err());
        assert_eq!(map.remove_range("k", 0, 3).unwrap(), vec![1, 5, 6]);
        assert!(!map.contains("k"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_last_removal_drops_key_and_keeps_order() {
        let mut map = OrderedMultimap::new();
        map.add("a", 1);
        map.add("b", 2);
        map.add("c", 3);
        map.remove("b", 0).unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(map.count("b"), 0);
        map.add("b", 4);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_remove_key() {
        let mut map: OrderedMultimap<i32> = [("a", 1), ("a", 2), ("b", 3)].into_iter().collect();
        assert_eq!(map.remove_key("a").unwrap(), vec![1, 2]);
        assert_eq!(map.len(), 1);
        assert!(map.remove_key("a").is_err());
    }

    #[test]
    fn test_contains() {
        let map: OrderedMultimap<i32> = [("a", 1), ("a", 2)].into_iter().collect();
        assert!(map.contains_key("a", 1));
        assert!(!map.contains_key("a", 2));
        assert!(map.contains_value(&2));
        assert!(!map.contains_value(&3));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original: OrderedMultimap<String> = OrderedMultimap::new();
        original.add("k", "one".to_string());
        let mut copy = original.clone();
        copy.get_mut("k", 0).unwrap().push_str("-changed");
        copy.add("k", "two".to_string());
        assert_eq!(original.get_all("k"), &["one".to_string()]);
        assert_eq!(copy.count("k"), 2);
    }

    #[test]
    fn test_copy_to_and_move_to_append() {
        let source: OrderedMultimap<i32> = [("a", 1), ("b", 2), ("a", 3)].into_iter().collect();
        let mut target: OrderedMultimap<i32> = [("a", 0)].into_iter().collect();
        source.copy_to(&mut target);
        assert_eq!(target.get_all("a"), &[0, 1, 3]);
        assert_eq!(target.get_all("b"), &[2]);

        let mut moved = OrderedMultimap::new();
        source.move_to(&mut moved);
        assert_eq!(moved.len(), 3);
    }

    #[test]
    fn test_iter_is_restartable_and_exact() {
        let map: OrderedMultimap<i32> = [("a", 1), ("b", 2), ("a", 3)].into_iter().collect();
        let first: Vec<_> = map.iter().map(|(e, v)| (e.key, e.position, *v)).collect();
        let second: Vec<_> = (&map).into_iter().map(|(e, v)| (e.key, e.position, *v)).collect();
        assert_eq!(first, vec![("a", 0, 1), ("a", 1, 3), ("b", 0, 2)]);
        assert_eq!(first, second);
        assert_eq!(map.iter().len(), 3);
        assert!(map.iter().all(|(e, _)| e.hash == crate::hash::hash_str(e.key)));
    }

    #[test]
    fn test_iter_mut() {
        let mut map: OrderedMultimap<i32> = [("a", 1), ("b", 2)].into_iter().collect();
        for (_, value) in map.iter_mut() {
            *value *= 10;
        }
        assert_eq!(map.values().copied().collect::<Vec<_>>(), vec![10, 20]);
    }

    #[test]
    fn test_colliding_hashes_stay_separate() {
        let mut buckets: IndexMap<HashKey, Vec<i32>> = IndexMap::new();
        let left = KeyRef { hash: 7, key: "left" };
        let right = KeyRef { hash: 7, key: "right" };
        buckets.insert(left.to_hash_key(), vec![1]);
        buckets.insert(right.to_hash_key(), vec![2, 3]);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets.get(&left), Some(&vec![1]));
        assert_eq!(buckets.get(&right), Some(&vec![2, 3]));
    }

    #[test]
    fn test_index_operator() {
        let map: OrderedMultimap<i32> = [("a", 5)].into_iter().collect();
        assert_eq!(map["a"], 5);
    }

    #[test]
    #[should_panic(expected = "Key not found")]
    fn test_index_operator_panics_on_missing_key() {
        let map: OrderedMultimap<i32> = OrderedMultimap::new();
        let _ = map["missing"];
    }

    #[test]
    fn test_first_or_insert_with() {
        let mut map: OrderedMultimap<Vec<i32>> = OrderedMultimap::new();
        map.first_or_insert_with("a", Vec::new).push(1);
        map.first_or_insert_with("a", Vec::new).push(2);
        assert_eq!(map.get_all("a"), &[vec![1, 2]]);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_owned_iteration() {
        let map: OrderedMultimap<i32> = [("a", 1), ("b", 2), ("a", 3)].into_iter().collect();
        let pairs: Vec<(String, i32)> = map.into_iter().collect();
        assert_eq!(
            pairs,
            vec![("a".to_string(), 1), ("a".to_string(), 3), ("b".to_string(), 2)]
        );
    }

    #[test]
    fn test_clear() {
        let mut map: OrderedMultimap<i32> = [("a", 1)].into_iter().collect();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.key_count(), 0);
    }

    #[test]
    fn test_equality_respects_key_order() {
        let ab: OrderedMultimap<i32> = [("a", 1), ("b", 2)].into_iter().collect();
        let ba: OrderedMultimap<i32> = [("b", 2), ("a", 1)].into_iter().collect();
        assert_ne!(ab, ba);
        assert_eq!(ab, ab.clone());
    }
}
