use std::fmt;

use crate::{
    error::FatalError,
    page::{PageId, Pid},
};

/// One line of the simulation log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    PhysicalMemory { size: u64, frames: usize },
    VirtualMemory { size: u64, slots: usize },
    Tick(u32),
    Created { pid: Pid, size: u64, page_count: usize },
    Access { pid: Pid, address: u64, page_index: usize, offset: u64 },
    Hit { page: PageId },
    PageFault { page: PageId },
    Replacement { victim: PageId },
    Terminated { pid: Pid },
    NoActiveProcesses,
    NoAccessibleProcesses,
    Fatal(FatalError),
    Finished { ticks: u32 },
}

impl Event {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::Fatal(_))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::PhysicalMemory { size, frames } => {
                write!(f, "Physical memory: {} MB ({} pages)", size, frames)
            }
            Event::VirtualMemory { size, slots } => {
                write!(f, "Virtual memory: {} MB ({} pages)", size, slots)
            }
            Event::Tick(t) => write!(f, "[t={}s] .", t),
            Event::Created { pid, size, page_count } => write!(
                f,
                "[CREATED] Process {} ({} MB, {} pages).",
                pid, size, page_count
            ),
            Event::Access { pid, address, page_index, offset } => write!(
                f,
                "[ACCESS] Process {}, virtual address = {} (page {}, offset {}).",
                pid, address, page_index, offset
            ),
            Event::Hit { .. } => write!(f, "[OK] Page found in RAM."),
            Event::PageFault { .. } => write!(f, "[PAGE FAULT] Page is not in RAM. Swapping."),
            Event::Replacement { victim } => write!(
                f,
                "[REPLACEMENT] Page of process {} (page {}) sent to SWAP.",
                victim.pid, victim.index
            ),
            Event::Terminated { pid } => write!(f, "[TERMINATED] Process {}.", pid),
            Event::NoActiveProcesses => write!(f, "[INFO] No active processes to terminate."),
            Event::NoAccessibleProcesses => {
                write!(f, "[INFO] No active processes with pages to access.")
            }
            Event::Fatal(err) => write!(f, "[ERROR] {}. END.", err),
            Event::Finished { .. } => write!(f, "[END] Simulation finished."),
        }
    }
}

/// Receives events in the order they happen.
pub trait EventSink {
    fn emit(&mut self, event: &Event);
}

impl<F> EventSink for F
where
    F: FnMut(&Event),
{
    fn emit(&mut self, event: &Event) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines() {
        assert_eq!(Event::Tick(4).to_string(), "[t=4s] .");
        assert_eq!(
            Event::Created { pid: 3, size: 5, page_count: 3 }.to_string(),
            "[CREATED] Process 3 (5 MB, 3 pages)."
        );
        assert_eq!(
            Event::Replacement { victim: PageId::new(1, 2) }.to_string(),
            "[REPLACEMENT] Page of process 1 (page 2) sent to SWAP."
        );
        assert_eq!(
            Event::Fatal(FatalError::SwapExhausted).to_string(),
            "[ERROR] no room left in SWAP for replacement. END."
        );
    }

    #[test]
    fn test_closure_sink() {
        let mut lines = Vec::new();
        let mut sink = |event: &Event| lines.push(event.to_string());

        sink.emit(&Event::NoActiveProcesses);
        sink.emit(&Event::Finished { ticks: 60 });

        assert_eq!(
            lines,
            vec!["[INFO] No active processes to terminate.", "[END] Simulation finished."]
        );
    }
}
