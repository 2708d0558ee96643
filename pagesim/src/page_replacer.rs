use crate::{frame_table::FrameTable, page::PageId};

pub enum PageEvent {
    Touched(PageId),
    Loaded(PageId),
}

pub trait PageReplacer {
    fn page_event(&mut self, _event: PageEvent) {}

    /// Position in `frames` of the page to evict, or `None` if nothing is resident.
    fn pick_replacement_page(&mut self, frames: &FrameTable) -> Option<usize>;
}

/// Evicts by arrival order only. The frame table already keeps pages in
/// arrival order, so the victim is always its front; touches are ignored.
#[derive(Debug, Default)]
pub struct FIFOPageReplacer;

impl FIFOPageReplacer {
    pub fn new() -> Self {
        FIFOPageReplacer
    }
}

impl PageReplacer for FIFOPageReplacer {
    fn pick_replacement_page(&mut self, frames: &FrameTable) -> Option<usize> {
        if frames.is_empty() {
            None
        } else {
            Some(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_picks_oldest() {
        let mut replacer = FIFOPageReplacer::new();
        let mut frames = FrameTable::new(3);

        assert_eq!(replacer.pick_replacement_page(&frames), None);

        frames.push(PageId::new(1, 0));
        frames.push(PageId::new(1, 1));
        frames.push(PageId::new(2, 0));

        assert_eq!(replacer.pick_replacement_page(&frames), Some(0));
    }

    #[test]
    fn test_fifo_ignores_touches() {
        let mut replacer = FIFOPageReplacer::new();
        let mut frames = FrameTable::new(2);
        frames.push(PageId::new(1, 0));
        frames.push(PageId::new(2, 0));

        replacer.page_event(PageEvent::Touched(PageId::new(1, 0)));
        replacer.page_event(PageEvent::Touched(PageId::new(1, 0)));

        let victim = replacer.pick_replacement_page(&frames).unwrap();
        assert_eq!(frames.iter().nth(victim).unwrap().id, PageId::new(1, 0));
    }
}
