use std::{error::Error, fmt};

use crate::page::Pid;

/// Bad startup parameters. Raised before any simulation state exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    PhysicalSize(i64),
    PageSize(i64),
    PageLargerThanPhysical { page: u64, physical: u64 },
    MinProcSize(i64),
    MaxProcSize(i64),
    InvalidProcRange { min: u64, max: u64 },
    InvalidInput(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::PhysicalSize(n) => {
                write!(f, "physical memory size must be greater than 0 (got {})", n)
            }
            ConfigError::PageSize(n) => write!(f, "page size must be greater than 0 (got {})", n),
            ConfigError::PageLargerThanPhysical { page, physical } => write!(
                f,
                "page size ({} MB) cannot exceed physical memory size ({} MB)",
                page, physical
            ),
            ConfigError::MinProcSize(n) => {
                write!(f, "minimum process size must be greater than 0 (got {})", n)
            }
            ConfigError::MaxProcSize(n) => {
                write!(f, "maximum process size must be greater than 0 (got {})", n)
            }
            ConfigError::InvalidProcRange { min, max } => write!(
                f,
                "invalid process size range: minimum {} MB is larger than maximum {} MB",
                min, max
            ),
            ConfigError::InvalidInput(input) => write!(f, "invalid input: {:?}", input),
        }
    }
}

impl Error for ConfigError {}

/// Terminal exhaustion conditions. Each one ends the whole simulation; the
/// operation that raises it has not mutated anything yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FatalError {
    /// RAM and SWAP were both full while placing the pages of a new process.
    MemoryExhausted { pid: Pid, page_index: usize },
    /// RAM was saturated and SWAP had no slot for the evicted page.
    SwapExhausted,
    /// There are no physical frames at all.
    NoPhysicalFrames,
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalError::MemoryExhausted { pid, page_index } => write!(
                f,
                "RAM and SWAP full while creating process {} (page {})",
                pid, page_index
            ),
            FatalError::SwapExhausted => write!(f, "no room left in SWAP for replacement"),
            FatalError::NoPhysicalFrames => write!(f, "no physical frames available"),
        }
    }
}

impl Error for FatalError {}
