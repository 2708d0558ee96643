use std::{collections::HashSet, fmt};

use log::{debug, info, trace, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    config::SimConfig,
    error::{ConfigError, FatalError},
    event::Event,
    frame_table::FrameTable,
    page::{Page, PageId, Pid},
    page_replacer::{FIFOPageReplacer, PageEvent, PageReplacer},
    process::{Process, ProcessTable},
    swap::SwapSpace,
};

/// Virtual memory is drawn once as `physical * factor`, factor in this range.
const VIRTUAL_FACTOR_MIN: f64 = 1.5;
const VIRTUAL_FACTOR_MAX: f64 = 4.5;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub created: u64,
    pub terminated: u64,
    pub accesses: u64,
    pub hits: u64,
    pub faults: u64,
    pub evictions: u64,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created={} terminated={} accesses={} hits={} faults={} evictions={}",
            self.created, self.terminated, self.accesses, self.hits, self.faults, self.evictions
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccessOutcome {
    Hit,
    /// The page was loaded; `evicted` is the page pushed out to make room, if any.
    Fault { evicted: Option<PageId> },
    /// Nothing to access.
    NoTarget,
}

pub struct MemoryManager<REPLACER: PageReplacer = FIFOPageReplacer> {
    config: SimConfig,
    seed: u64,
    virtual_size: u64,
    ram: FrameTable,
    swap: SwapSpace,
    processes: ProcessTable,
    replacer: REPLACER,
    rng: StdRng,
    events: Vec<Event>,
    stats: Stats,
}

impl MemoryManager<FIFOPageReplacer> {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        MemoryManager::with_replacer(config, FIFOPageReplacer::new())
    }
}

impl<REPLACER> MemoryManager<REPLACER>
where
    REPLACER: PageReplacer,
{
    pub fn with_replacer(config: SimConfig, replacer: REPLACER) -> Result<Self, ConfigError> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(clock_seed);
        let mut rng = StdRng::seed_from_u64(seed);

        let factor = rng.gen_range(VIRTUAL_FACTOR_MIN..VIRTUAL_FACTOR_MAX);
        let virtual_size = (config.physical_size as f64 * factor) as u64;

        let frames = (config.physical_size / config.page_size) as usize;
        let slots = ((virtual_size / config.page_size) as usize).max(1);

        info!(
            "memory manager: seed={} frames={} slots={} virtual_factor={:.3}",
            seed, frames, slots, factor
        );

        let events = vec![
            Event::PhysicalMemory { size: config.physical_size, frames },
            Event::VirtualMemory { size: virtual_size, slots },
        ];

        Ok(MemoryManager {
            config,
            seed,
            virtual_size,
            ram: FrameTable::new(frames),
            swap: SwapSpace::new(slots),
            processes: ProcessTable::new(),
            replacer,
            rng,
            events,
            stats: Stats::default(),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The seed actually used, so a clock-seeded run can be replayed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn virtual_size(&self) -> u64 {
        self.virtual_size
    }

    pub fn frames_capacity(&self) -> usize {
        self.ram.capacity()
    }

    pub fn slots_capacity(&self) -> usize {
        self.swap.capacity()
    }

    pub fn ram(&self) -> &FrameTable {
        &self.ram
    }

    pub fn swap(&self) -> &SwapSpace {
        &self.swap
    }

    pub fn processes(&self) -> &ProcessTable {
        &self.processes
    }

    pub fn process(&self, pid: Pid) -> Option<&Process> {
        self.processes.get(pid)
    }

    pub fn active_processes(&self) -> impl Iterator<Item = &Process> {
        self.processes.active()
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub(crate) fn record(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Drains the events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn page_count_for(&self, size: u64) -> usize {
        size.div_ceil(self.config.page_size) as usize
    }

    fn log_pools(&self, op: &str) {
        debug!(
            "memory manager: after {} ram={}/{} swap={}/{}",
            op,
            self.ram.len(),
            self.ram.capacity(),
            self.swap.len(),
            self.swap.capacity()
        );
    }

    /// Creates a process with a size drawn from `[min_proc_size, max_proc_size]`.
    pub fn create_process(&mut self) -> Result<Pid, FatalError> {
        let size = self
            .rng
            .gen_range(self.config.min_proc_size..=self.config.max_proc_size);

        self.create_process_sized(size)
    }

    /// Creates a process of `size` MB and places all of its pages, RAM first
    /// and SWAP once RAM is full. If the pages do not fit in both pools
    /// together, fails without creating anything.
    pub fn create_process_sized(&mut self, size: u64) -> Result<Pid, FatalError> {
        let page_count = self.page_count_for(size);

        let free_frames = self.ram.capacity() - self.ram.len();
        let free_slots = self.swap.capacity() - self.swap.len();

        if page_count > free_frames + free_slots {
            return Err(FatalError::MemoryExhausted {
                pid: self.processes.peek_next_id(),
                page_index: free_frames + free_slots,
            });
        }

        let pid = self.processes.spawn(size, page_count);

        for index in 0..page_count {
            let id = PageId::new(pid, index);

            if !self.ram.is_full() {
                self.ram.push(id);
                self.replacer.page_event(PageEvent::Loaded(id));
            } else {
                self.swap.store(Page::swapped(id));
            }
        }

        self.stats.created += 1;
        self.record(Event::Created { pid, size, page_count });
        self.log_pools("create");

        Ok(pid)
    }

    /// Terminates one active process picked uniformly at random.
    pub fn terminate_random_process(&mut self) -> Option<Pid> {
        let active = self.processes.active_ids();

        if active.is_empty() {
            self.record(Event::NoActiveProcesses);
            return None;
        }

        let pid = active[self.rng.gen_range(0..active.len())];
        self.terminate_process(pid);

        Some(pid)
    }

    /// Marks `pid` inactive and frees its pages from both pools. Returns false,
    /// touching nothing, if `pid` is unknown or already terminated.
    pub fn terminate_process(&mut self, pid: Pid) -> bool {
        if !self.processes.deactivate(pid) {
            warn!("memory manager: process {} is not active, not terminating", pid);
            return false;
        }

        let from_ram = self.ram.release_process(pid);
        let from_swap = self.swap.release_process(pid);

        debug!(
            "memory manager: process {} released {} frames, {} slots",
            pid, from_ram, from_swap
        );

        self.stats.terminated += 1;
        self.record(Event::Terminated { pid });
        self.log_pools("terminate");

        true
    }

    /// Accesses a random offset of a random page of a random active process
    /// that owns pages.
    pub fn access_random(&mut self) -> Result<AccessOutcome, FatalError> {
        let candidates = self.processes.accessible_ids();

        if candidates.is_empty() {
            self.record(Event::NoAccessibleProcesses);
            return Ok(AccessOutcome::NoTarget);
        }

        let pid = candidates[self.rng.gen_range(0..candidates.len())];
        let page_count = self.processes.get(pid).map_or(0, |p| p.page_count);

        let page_index = self.rng.gen_range(0..page_count);
        let offset = if self.config.page_size > 0 {
            self.rng.gen_range(0..self.config.page_size)
        } else {
            0
        };

        self.access_page(pid, page_index, offset)
    }

    /// Accesses `offset` within page `page_index` of `pid`, faulting the page
    /// in if it is not resident.
    pub fn access_page(
        &mut self,
        pid: Pid,
        page_index: usize,
        offset: u64,
    ) -> Result<AccessOutcome, FatalError> {
        let valid = self
            .processes
            .get(pid)
            .is_some_and(|p| p.active && page_index < p.page_count);

        if !valid {
            warn!(
                "memory manager: access to page {} of process {} rejected",
                page_index, pid
            );
            return Ok(AccessOutcome::NoTarget);
        }

        let id = PageId::new(pid, page_index);
        let address = page_index as u64 * self.config.page_size + offset;

        self.stats.accesses += 1;
        self.record(Event::Access { pid, address, page_index, offset });

        trace!("memory manager: looking up {} in ram", id);

        if self.ram.contains(id) {
            self.stats.hits += 1;
            self.replacer.page_event(PageEvent::Touched(id));
            self.record(Event::Hit { page: id });

            return Ok(AccessOutcome::Hit);
        }

        self.stats.faults += 1;
        self.record(Event::PageFault { page: id });

        let evicted = self.replace_page(id)?;

        Ok(AccessOutcome::Fault { evicted })
    }

    /// Brings `id` into RAM, evicting the replacer's victim into SWAP first if
    /// RAM is saturated. Returns the evicted page.
    pub fn replace_page(&mut self, id: PageId) -> Result<Option<PageId>, FatalError> {
        if self.ram.capacity() == 0 {
            return Err(FatalError::NoPhysicalFrames);
        }

        let mut evicted = None;

        if self.ram.is_full() {
            if self.swap.is_full() {
                return Err(FatalError::SwapExhausted);
            }

            let victim = self
                .replacer
                .pick_replacement_page(&self.ram)
                .and_then(|position| self.ram.remove_at(position))
                .ok_or(FatalError::NoPhysicalFrames)?;

            self.swap.store(victim);
            self.stats.evictions += 1;
            self.record(Event::Replacement { victim: victim.id });

            evicted = Some(victim.id);
        }

        self.ram.push(id);
        self.replacer.page_event(PageEvent::Loaded(id));
        self.swap.take(id);

        self.log_pools("replace");

        Ok(evicted)
    }

    /// Verifies pool bounds, page uniqueness and the ownership partition.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.ram.len() > self.ram.capacity() {
            return Err(format!("ram over capacity: {}/{}", self.ram.len(), self.ram.capacity()));
        }
        if self.swap.len() > self.swap.capacity() {
            return Err(format!(
                "swap over capacity: {}/{}",
                self.swap.len(),
                self.swap.capacity()
            ));
        }

        let mut seen = HashSet::new();

        for page in self.ram.iter() {
            if !page.resident {
                return Err(format!("{} is in ram but not marked resident", page.id));
            }
            if !seen.insert(page.id) {
                return Err(format!("{} appears twice in ram", page.id));
            }
        }

        for page in self.swap.iter() {
            if page.resident {
                return Err(format!("{} is in swap but marked resident", page.id));
            }
            if !seen.insert(page.id) {
                return Err(format!("{} is in both ram and swap", page.id));
            }
        }

        for id in &seen {
            match self.processes.get(id.pid) {
                Some(p) if p.active && id.index < p.page_count => {}
                Some(p) if !p.active => {
                    return Err(format!("{} belongs to terminated process", id));
                }
                _ => return Err(format!("{} has no owning process", id)),
            }
        }

        for process in self.processes.active() {
            if let Some(missing) = process.page_ids().find(|id| !seen.contains(id)) {
                return Err(format!("{} is in neither ram nor swap", missing));
            }
        }

        let mut last = 0;
        for process in self.processes.all() {
            if process.id <= last {
                return Err(format!("process id {} is not increasing", process.id));
            }
            last = process.id;
        }

        Ok(())
    }
}

fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
