use rustc_hash::FxHashSet;

/// Selection set for one kind of element (nodes or links). The editor keeps
/// one for each kind; the two never mix ids.
#[derive(Clone, Debug, Default)]
pub struct SelectionManager {
    selected: FxHashSet<i32>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a click on an item with or without the multi-select modifier.
    ///
    /// With the modifier the item toggles. Without it the selection
    /// collapses to just this item, except that re-clicking the sole
    /// selected item is a no-op.
    pub fn handle_interaction(&mut self, id: i32, toggle: bool) {
        if toggle {
            if !self.selected.remove(&id) {
                self.selected.insert(id);
            }
        } else {
            if self.selected.len() == 1 && self.selected.contains(&id) {
                return;
            }
            self.selected.clear();
            self.selected.insert(id);
        }
    }

    /// Programmatically add `id` to the selection.
    ///
    /// # Panics
    ///
    /// Panics when `id` is already selected.
    pub fn select(&mut self, id: i32) {
        assert!(self.selected.insert(id), "id {id} is already selected");
    }

    /// Programmatically remove `id` from the selection.
    ///
    /// # Panics
    ///
    /// Panics when `id` is not selected.
    pub fn deselect(&mut self, id: i32) {
        assert!(self.selected.remove(&id), "id {id} is not selected");
    }

    /// Clear the current selection
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Replace the current selection with a new set of IDs
    ///
    /// Used by box selection.
    pub fn replace_selection<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = i32>,
    {
        self.selected.clear();
        self.selected.extend(ids);
    }

    /// Toggle each of `ids` individually, used by box selection with the
    /// multi-select modifier held.
    pub fn toggle_all<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = i32>,
    {
        for id in ids {
            if !self.selected.remove(&id) {
                self.selected.insert(id);
            }
        }
    }

    /// Check if an ID is selected
    pub fn contains(&self, id: i32) -> bool {
        self.selected.contains(&id)
    }

    /// Get an iterator over the selected IDs
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.selected.iter().copied()
    }

    /// Collect the selected IDs into a vector, in no particular order.
    pub fn ids(&self) -> Vec<i32> {
        self.selected.iter().copied().collect()
    }

    /// Get the number of selected items
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if the selection is empty
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
