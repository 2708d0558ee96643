use std::collections::VecDeque;

use crate::page::{Page, PageId, Pid};

/// Physical frame pool. Front of the queue is the page that arrived first.
#[derive(Debug)]
pub struct FrameTable {
    frames: VecDeque<Page>,
    capacity: usize,
}

impl FrameTable {
    pub fn new(capacity: usize) -> Self {
        FrameTable {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.frames.len() >= self.capacity
    }

    pub fn contains(&self, id: PageId) -> bool {
        self.frames.iter().any(|page| page.id == id)
    }

    /// Position of `id` in arrival order (0 = oldest).
    pub fn position(&self, id: PageId) -> Option<usize> {
        self.frames.iter().position(|page| page.id == id)
    }

    /// Loads `id` into the youngest frame. The caller makes room first.
    pub fn push(&mut self, id: PageId) {
        debug_assert!(!self.is_full(), "frame table overflow loading {}", id);

        self.frames.push_back(Page::resident(id));
    }

    pub fn remove_at(&mut self, position: usize) -> Option<Page> {
        self.frames.remove(position)
    }

    /// Drops every frame owned by `pid`, keeping the arrival order of the rest.
    pub fn release_process(&mut self, pid: Pid) -> usize {
        let before = self.frames.len();

        self.frames.retain(|page| page.owner() != pid);

        before - self.frames.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.frames.iter()
    }
}
