use std::fmt;

/// Identifier of a simulated process. Assigned monotonically, never reused.
pub type Pid = u32;

/// System-wide identity of a page: owning process plus page index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId {
    pub pid: Pid,
    pub index: usize,
}

impl PageId {
    pub fn new(pid: Pid, index: usize) -> Self {
        PageId { pid, index }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}:{}", self.pid, self.index)
    }
}

/// Page table entry. `resident` is true while the page sits in a RAM frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub id: PageId,
    pub resident: bool,
}

impl Page {
    pub fn resident(id: PageId) -> Self {
        Page { id, resident: true }
    }

    pub fn swapped(id: PageId) -> Self {
        Page { id, resident: false }
    }

    pub fn owner(&self) -> Pid {
        self.id.pid
    }
}
