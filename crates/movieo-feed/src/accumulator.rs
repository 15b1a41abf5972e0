//! Ordered, de-duplicated result sets.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use movieo_api::tmdb::{MediaItem, MediaKind};

/// Identity of a catalog item. IDs are only unique per media kind, so a
/// movie and a series may share a numeric ID.
pub type ItemId = (Option<MediaKind>, u64);

/// Items with a stable identity used for de-duplication.
pub trait Keyed {
    /// Identity type.
    type Id: Eq + Hash + Clone + fmt::Debug;

    /// Returns the identity of this item.
    fn id(&self) -> Self::Id;
}

impl Keyed for MediaItem {
    type Id = ItemId;

    fn id(&self) -> ItemId {
        (self.media_type, self.id)
    }
}

/// Appends the items of `incoming` that are not already present.
///
/// The order of `existing` is preserved and the first occurrence of an ID
/// wins, including duplicates inside `incoming` itself. Merging the same
/// batch twice gives the same result as merging it once.
#[must_use]
pub fn merge<T: Keyed + Clone>(existing: &[T], incoming: &[T]) -> Vec<T> {
    let mut acc = Accumulator::new();
    acc.extend(existing.iter().cloned());
    acc.extend(incoming.iter().cloned());
    acc.into_items()
}

/// Stateful form of [`merge`] that keeps a seen-ID set next to the items.
#[derive(Debug, Clone)]
pub struct Accumulator<T: Keyed> {
    items: Vec<T>,
    seen: HashSet<T::Id>,
}

impl<T: Keyed> Default for Accumulator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Keyed> Accumulator<T> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Appends unseen items and returns how many were added.
    pub fn extend(&mut self, incoming: impl IntoIterator<Item = T>) -> usize {
        let before = self.items.len();
        for item in incoming {
            if self.seen.insert(item.id()) {
                self.items.push(item);
            }
        }
        self.items.len().saturating_sub(before)
    }

    /// Drops every item.
    pub fn clear(&mut self) {
        self.items.clear();
        self.seen.clear();
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Returns `true` if an item with this ID is present.
    #[must_use]
    pub fn contains(&self, id: &T::Id) -> bool {
        self.seen.contains(id)
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when no item has been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the set and returns the items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
