//! Ordered list of URLs waiting to be downloaded.
//!
//! Download order is queue order. Entries are not deduplicated or validated
//! beyond being non-empty after trimming.

/// The download queue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueStore {
    items: Vec<String>,
}

impl QueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends every non-empty trimmed line of `text`. Returns how many were added.
    pub fn add(&mut self, text: &str) -> usize {
        self.add_urls(text.lines())
    }

    /// Appends each non-empty trimmed entry, in order.
    pub fn add_urls<I, S>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.items.len();
        self.items.extend(
            urls.into_iter()
                .map(|url| url.as_ref().trim().to_owned())
                .filter(|url| !url.is_empty()),
        );
        self.items.len() - before
    }

    /// Swaps `index` with the item above it. Returns the item's new index,
    /// or `None` when it is already first or out of range.
    pub fn move_up(&mut self, index: usize) -> Option<usize> {
        if index == 0 || index >= self.items.len() {
            return None;
        }
        self.items.swap(index - 1, index);
        Some(index - 1)
    }

    /// Swaps `index` with the item below it. Returns the item's new index,
    /// or `None` when it is already last or out of range.
    pub fn move_down(&mut self, index: usize) -> Option<usize> {
        if index + 1 >= self.items.len() {
            return None;
        }
        self.items.swap(index, index + 1);
        Some(index + 1)
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

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

    /// Copy of the current order, handed to the worker at run start.
    pub fn snapshot(&self) -> Vec<String> {
        self.items.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(urls: &[&str]) -> QueueStore {
        let mut q = QueueStore::new();
        q.add_urls(urls);
        q
    }

    #[test]
    fn add_skips_blank_lines_and_keeps_order() {
        let mut q = QueueStore::new();
        let added = q.add("https://a.example\n\n  https://b.example  \nhttps://c.example\n");
        assert_eq!(added, 3);
        assert_eq!(
            q.items(),
            ["https://a.example", "https://b.example", "https://c.example"]
        );
    }

    #[test]
    fn add_does_not_deduplicate() {
        let mut q = QueueStore::new();
        q.add("x\nx");
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn move_up_at_top_is_noop() {
        let mut q = queue(&["a", "b", "c"]);
        assert_eq!(q.move_up(0), None);
        assert_eq!(q.items(), ["a", "b", "c"]);
    }

    #[test]
    fn move_down_at_bottom_is_noop() {
        let mut q = queue(&["a", "b", "c"]);
        assert_eq!(q.move_down(2), None);
        assert_eq!(q.items(), ["a", "b", "c"]);
    }

    #[test]
    fn moves_swap_adjacent_items_only() {
        let mut q = queue(&["a", "b", "c", "d"]);
        assert_eq!(q.move_up(2), Some(1));
        assert_eq!(q.items(), ["a", "c", "b", "d"]);
        assert_eq!(q.move_down(0), Some(1));
        assert_eq!(q.items(), ["c", "a", "b", "d"]);
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let mut q = queue(&["a"]);
        assert_eq!(q.move_up(5), None);
        assert_eq!(q.move_down(5), None);
        assert_eq!(q.remove(5), None);
        assert_eq!(q.items(), ["a"]);
    }

    #[test]
    fn remove_and_clear() {
        let mut q = queue(&["a", "b", "c"]);
        assert_eq!(q.remove(1).as_deref(), Some("b"));
        assert_eq!(q.items(), ["a", "c"]);
        q.clear();
        assert!(q.is_empty());
    }
}
