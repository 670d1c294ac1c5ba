//! Shopping list for ingredients the fridge is missing.

/// An insertion-ordered set of ingredient names.
///
/// Item identity is exact string equality; "Eggs" and "eggs" are distinct
/// entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    items: Vec<String>,
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item at the end unless it is already on the list.
    /// Returns true if the list changed.
    pub fn add(&mut self, item: &str) -> bool {
        if self.items.iter().any(|existing| existing == item) {
            false
        } else {
            self.items.push(item.to_string());
            true
        }
    }

    /// Remove an item. Returns true if it was present.
    pub fn remove(&mut self, item: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|existing| existing != item);
        self.items.len() != before
    }

    /// Empty the list unconditionally.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
