use crate::page::{PageId, Pid};

/// A synthetic process. Its pages are always `0..page_count`; where each one
/// lives is tracked by the frame table and the swap space, never here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Process {
    pub id: Pid,
    pub size: u64,
    pub page_count: usize,
    pub active: bool,
}

impl Process {
    pub fn new(id: Pid, size: u64, page_count: usize) -> Self {
        Process {
            id,
            size,
            page_count,
            active: true,
        }
    }

    pub fn page_ids(&self) -> impl Iterator<Item = PageId> + '_ {
        (0..self.page_count).map(move |index| PageId::new(self.id, index))
    }

    pub fn has_pages(&self) -> bool {
        self.page_count > 0
    }
}

/// Every process ever created, in creation order. Terminated processes stay
/// in the table but are never handed out by the selection helpers.
#[derive(Debug, Default)]
pub struct ProcessTable {
    processes: Vec<Process>,
    next_id: Pid,
}

impl ProcessTable {
    pub fn new() -> Self {
        ProcessTable::default()
    }

    /// Id the next created process will get. Ids start at 1.
    pub fn peek_next_id(&self) -> Pid {
        self.next_id + 1
    }

    pub fn spawn(&mut self, size: u64, page_count: usize) -> Pid {
        self.next_id += 1;

        let id = self.next_id;
        self.processes.push(Process::new(id, size, page_count));

        id
    }

    pub fn get(&self, pid: Pid) -> Option<&Process> {
        self.processes.iter().find(|p| p.id == pid)
    }

    fn get_mut(&mut self, pid: Pid) -> Option<&mut Process> {
        self.processes.iter_mut().find(|p| p.id == pid)
    }

    /// Marks `pid` inactive. Returns false if it was unknown or already inactive.
    pub fn deactivate(&mut self, pid: Pid) -> bool {
        match self.get_mut(pid) {
            Some(process) if process.active => {
                process.active = false;
                true
            }
            _ => false,
        }
    }

    pub fn all(&self) -> &[Process] {
        &self.processes
    }

    pub fn active(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter().filter(|p| p.active)
    }

    pub fn active_ids(&self) -> Vec<Pid> {
        self.active().map(|p| p.id).collect()
    }

    /// Active processes that own at least one page, i.e. the ones that can be accessed.
    pub fn accessible_ids(&self) -> Vec<Pid> {
        self.active().filter(|p| p.has_pages()).map(|p| p.id).collect()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}
