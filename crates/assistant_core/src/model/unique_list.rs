//! Insertion-ordered list that never holds two equal values.
//!
//! # Invariants
//! - No two elements compare equal under the element's `PartialEq`.
//! - Inserting a present value is a silent no-op.
//! - `change` appends the replacement at the end.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueList<T> {
    items: Vec<T>,
}

impl<T> Default for UniqueList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> UniqueList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: PartialEq> UniqueList<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Appends `item` unless an equal value exists. Returns whether it was added.
    pub fn push(&mut self, item: T) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Inserts `item` at `index` (clamped to the length) unless present.
    pub fn insert(&mut self, index: usize, item: T) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        true
    }

    /// Removes the first occurrence of `old` and appends `new`.
    ///
    /// Does nothing and returns `false` when `old` is absent. When `new` is
    /// already present elsewhere only `old` is dropped.
    pub fn change(&mut self, old: &T, new: T) -> bool {
        let Some(index) = self.items.iter().position(|item| item == old) else {
            return false;
        };
        self.items.remove(index);
        self.push(new);
        true
    }

    /// Removes the first element equal to `item`.
    pub fn remove(&mut self, item: &T) -> bool {
        self.remove_matching(item)
    }

    /// Removes the first element equal to a raw candidate, e.g. a phone string.
    pub fn remove_matching<Q>(&mut self, candidate: &Q) -> bool
    where
        T: PartialEq<Q>,
        Q: ?Sized,
    {
        match self.items.iter().position(|item| item == candidate) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns the first element equal to a raw candidate.
    pub fn find<Q>(&self, candidate: &Q) -> Option<&T>
    where
        T: PartialEq<Q>,
        Q: ?Sized,
    {
        self.items.iter().find(|item| *item == candidate)
    }
}

impl<T: PartialEq> Extend<T> for UniqueList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T: PartialEq> FromIterator<T> for UniqueList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<'a, T> IntoIterator for &'a UniqueList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Display> Display for UniqueList<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, item) in self.items.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

impl<T: Serialize> Serialize for UniqueList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for UniqueList<T>
where
    T: Deserialize<'de> + PartialEq,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(|items| items.into_iter().collect())
    }
}
