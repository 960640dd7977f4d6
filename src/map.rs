//! Ordered, name-keyed collection used for sections and keys.
//!
//! This module provides [`NameMap`], a wrapper around [`IndexMap`] that keeps
//! items in insertion order and looks them up by name under a configurable
//! case policy.
//!
//! ## Why IndexMap?
//!
//! - **Round trips**: Sections and keys are written in the order they were read or added
//! - **Positional edits**: Items can be inserted at, or removed from, a given index
//! - **Lookups**: Name lookups stay O(1) on large files
//!
//! Names are folded to lower case for the index when the map is
//! case-insensitive; the item keeps its original spelling.
//!
//! ## Examples
//!
//! ```rust
//! use ini_doc::{Key, NameMap};
//!
//! let mut keys = NameMap::new(false);
//! keys.insert(Key::new("Name", "Example"));
//! keys.insert(Key::new("Version", "1.0"));
//!
//! assert_eq!(keys.get("NAME").map(|k| k.value()), Some("Example"));
//! let names: Vec<_> = keys.iter().map(|k| k.name()).collect();
//! assert_eq!(names, vec!["Name", "Version"]);
//! ```

use indexmap::IndexMap;

/// Items stored in a [`NameMap`].
pub trait Named {
    fn name(&self) -> &str;

    #[doc(hidden)]
    fn set_name(&mut self, name: String);
}

/// An ordered map of named items.
#[derive(Debug, Clone)]
pub struct NameMap<T> {
    entries: IndexMap<String, T>,
    case_sensitive: bool,
}

impl<T: Named> NameMap<T> {
    /// Creates an empty map with the given case policy.
    #[must_use]
    pub fn new(case_sensitive: bool) -> Self {
        NameMap {
            entries: IndexMap::new(),
            case_sensitive,
        }
    }

    #[must_use]
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    fn fold(&self, name: &str) -> String {
        if self.case_sensitive {
            name.to_string()
        } else {
            name.to_lowercase()
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(&self.fold(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        let folded = self.fold(name);
        self.entries.get_mut(&folded)
    }

    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&T> {
        self.entries.get_index(index).map(|(_, item)| item)
    }

    pub fn get_index_mut(&mut self, index: usize) -> Option<&mut T> {
        self.entries.get_index_mut(index).map(|(_, item)| item)
    }

    /// Returns the position of the item with the given name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.get_index_of(&self.fold(name))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&self.fold(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the named item, inserting the one built by `make` at the end if missing.
    pub fn get_or_insert_with(&mut self, name: &str, make: impl FnOnce() -> T) -> &mut T {
        let folded = self.fold(name);
        self.entries.entry(folded).or_insert_with(make)
    }

    /// Inserts an item at the end, or replaces the item with the same name in place.
    ///
    /// Returns the position of the item and the replaced item, if any.
    pub fn insert(&mut self, item: T) -> (usize, Option<T>) {
        let folded = self.fold(item.name());
        self.entries.insert_full(folded, item)
    }

    /// Inserts an item at `index`, shifting later items. The index is clamped to the length.
    ///
    /// An item with the same name is replaced and moved to `index`.
    pub fn insert_at(&mut self, index: usize, item: T) -> Option<T> {
        let folded = self.fold(item.name());
        let index = index.min(self.entries.len());
        let previous = self.entries.shift_remove(&folded);
        let index = index.min(self.entries.len());
        self.entries.shift_insert(index, folded, item);
        previous
    }

    pub fn remove(&mut self, name: &str) -> Option<T> {
        let folded = self.fold(name);
        self.entries.shift_remove(&folded)
    }

    pub fn remove_index(&mut self, index: usize) -> Option<T> {
        self.entries.shift_remove_index(index).map(|(_, item)| item)
    }

    /// Renames the item at `index` in place. The caller resolves collisions first.
    pub(crate) fn rename_index(&mut self, index: usize, new_name: &str) {
        if let Some((_, mut item)) = self.entries.shift_remove_index(index) {
            item.set_name(new_name.to_string());
            let folded = self.fold(new_name);
            let index = index.min(self.entries.len());
            self.entries.shift_insert(index, folded, item);
        }
    }

    /// Switches the case policy and rebuilds the index.
    ///
    /// Items whose names collide under the new policy are merged: the later
    /// item replaces the earlier one at the earlier position.
    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        if self.case_sensitive == case_sensitive {
            return;
        }
        self.case_sensitive = case_sensitive;
        let items: Vec<T> = std::mem::take(&mut self.entries).into_values().collect();
        for item in items {
            self.insert(item);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.values()
    }

    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut T> + ExactSizeIterator {
        self.entries.values_mut()
    }
}

impl<T: PartialEq> PartialEq for NameMap<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.values().eq(other.entries.values())
    }
}

impl<T: Named> IntoIterator for NameMap<T> {
    type Item = T;
    type IntoIter = indexmap::map::IntoValues<String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

impl<'a, T: Named> IntoIterator for &'a NameMap<T> {
    type Item = &'a T;
    type IntoIter = indexmap::map::Values<'a, String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}
