use std::collections::HashMap;

use crate::page::{Page, PageId, Pid};

/// Backing store. Slots have no order, pages are found by identity only.
#[derive(Debug)]
pub struct SwapSpace {
    slots: HashMap<PageId, Page>,
    capacity: usize,
}

impl SwapSpace {
    pub fn new(capacity: usize) -> Self {
        SwapSpace {
            slots: HashMap::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    pub fn contains(&self, id: PageId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Stores `page` as non-resident. The caller checks for room first.
    pub fn store(&mut self, page: Page) {
        debug_assert!(!self.is_full(), "swap overflow storing {}", page.id);

        let page = Page::swapped(page.id);
        self.slots.insert(page.id, page);
    }

    /// Removes `id` if present. Absent pages are not an error.
    pub fn take(&mut self, id: PageId) -> Option<Page> {
        self.slots.remove(&id)
    }

    pub fn release_process(&mut self, pid: Pid) -> usize {
        let before = self.slots.len();

        self.slots.retain(|id, _| id.pid != pid);

        before - self.slots.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.slots.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_marks_non_resident() {
        let mut swap = SwapSpace::new(1);
        swap.store(Page::resident(PageId::new(1, 3)));

        assert!(swap.is_full());
        assert!(swap.contains(PageId::new(1, 3)));
        assert!(swap.iter().all(|page| !page.resident));
    }

    #[test]
    fn test_take_is_idempotent() {
        let mut swap = SwapSpace::new(2);
        swap.store(Page::swapped(PageId::new(1, 0)));

        assert!(swap.take(PageId::new(1, 0)).is_some());
        assert!(swap.take(PageId::new(1, 0)).is_none());
        assert!(swap.is_empty());
    }

    #[test]
    fn test_release_process() {
        let mut swap = SwapSpace::new(3);
        swap.store(Page::swapped(PageId::new(1, 0)));
        swap.store(Page::swapped(PageId::new(2, 0)));
        swap.store(Page::swapped(PageId::new(1, 1)));

        assert_eq!(swap.release_process(1), 2);
        assert_eq!(swap.len(), 1);
        assert!(swap.contains(PageId::new(2, 0)));
    }
}
