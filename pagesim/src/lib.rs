//! Discrete-event simulator of demand-paged virtual memory: a fixed frame
//! pool, a swap pool, synthetic processes and FIFO page replacement.

pub mod config;
pub mod error;
pub mod event;
pub mod frame_table;
pub mod memory_manager;
pub mod page;
pub mod page_replacer;
pub mod process;
pub mod simulation;
pub mod swap;

pub use config::SimConfig;
pub use error::{ConfigError, FatalError};
pub use event::{Event, EventSink};
pub use memory_manager::{AccessOutcome, MemoryManager, Stats};
pub use page::{Page, PageId, Pid};
pub use simulation::{SimOutcome, Simulation};
