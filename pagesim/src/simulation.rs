use std::{thread, time::Duration};

use log::{debug, info};

use crate::{
    config::SimConfig,
    error::{ConfigError, FatalError},
    event::{Event, EventSink},
    memory_manager::{MemoryManager, Stats},
    page_replacer::{FIFOPageReplacer, PageReplacer},
};

/// First tick at which accesses and terminations start.
pub const ACCESS_START_TICK: u32 = 30;
pub const CREATE_EVERY: u32 = 2;
pub const ACCESS_EVERY: u32 = 5;

/// What the driver does at a given tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TickPlan {
    pub create: bool,
    /// Access then terminate, in that order.
    pub access_and_terminate: bool,
}

impl TickPlan {
    pub fn at(tick: u32) -> Self {
        TickPlan {
            create: tick % CREATE_EVERY == 0,
            access_and_terminate: tick >= ACCESS_START_TICK && tick % ACCESS_EVERY == 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimOutcome {
    /// Ticks started, including the one a fatal condition stopped.
    pub ticks_run: u32,
    pub stats: Stats,
    pub fatal: Option<FatalError>,
}

impl SimOutcome {
    pub fn completed(&self) -> bool {
        self.fatal.is_none()
    }
}

pub struct Simulation<REPLACER: PageReplacer = FIFOPageReplacer> {
    manager: MemoryManager<REPLACER>,
    ticks: u32,
    tick_interval: Duration,
}

impl Simulation<FIFOPageReplacer> {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let ticks = config.ticks;
        let tick_interval = config.tick_interval;

        Ok(Simulation::from_manager(MemoryManager::new(config)?, ticks, tick_interval))
    }
}

impl<REPLACER> Simulation<REPLACER>
where
    REPLACER: PageReplacer,
{
    pub fn from_manager(
        manager: MemoryManager<REPLACER>,
        ticks: u32,
        tick_interval: Duration,
    ) -> Self {
        Simulation {
            manager,
            ticks,
            tick_interval,
        }
    }

    pub fn manager(&self) -> &MemoryManager<REPLACER> {
        &self.manager
    }

    pub fn into_manager(self) -> MemoryManager<REPLACER> {
        self.manager
    }

    /// Runs the schedule of one tick. Events stay in the manager's journal.
    pub fn step(&mut self, tick: u32) -> Result<(), FatalError> {
        let plan = TickPlan::at(tick);

        self.manager.record(Event::Tick(tick));

        if plan.create {
            self.manager.create_process()?;
        }

        if plan.access_and_terminate {
            self.manager.access_random()?;
            self.manager.terminate_random_process();
        }

        debug_assert_eq!(self.manager.check_invariants(), Ok(()));

        Ok(())
    }

    fn flush<S: EventSink>(&mut self, sink: &mut S) {
        for event in self.manager.take_events() {
            sink.emit(&event);
        }
    }

    /// Runs every tick, or until a fatal condition, forwarding events to `sink`.
    pub fn run<S: EventSink>(&mut self, sink: &mut S) -> SimOutcome {
        info!(
            "simulation: {} ticks, {:?} per tick, seed {}",
            self.ticks,
            self.tick_interval,
            self.manager.seed()
        );

        self.flush(sink);

        for tick in 0..self.ticks {
            let result = self.step(tick);
            self.flush(sink);

            if let Err(fatal) = result {
                info!("simulation: stopped at tick {}: {}", tick, fatal);

                sink.emit(&Event::Fatal(fatal.clone()));

                return SimOutcome {
                    ticks_run: tick + 1,
                    stats: self.manager.stats(),
                    fatal: Some(fatal),
                };
            }

            if !self.tick_interval.is_zero() {
                thread::sleep(self.tick_interval);
            }
        }

        sink.emit(&Event::Finished { ticks: self.ticks });
        debug!("simulation: finished, {}", self.manager.stats());

        SimOutcome {
            ticks_run: self.ticks,
            stats: self.manager.stats(),
            fatal: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(physical: i64, page: i64, min: i64, max: i64) -> SimConfig {
        SimConfig::new(physical, page, min, max)
            .unwrap()
            .with_tick_interval(Duration::ZERO)
            .with_seed(42)
    }

    fn run(config: SimConfig) -> (SimOutcome, Vec<Event>) {
        let mut events = Vec::new();
        let mut sim = Simulation::new(config).unwrap();
        let outcome = sim.run(&mut |event: &Event| events.push(event.clone()));

        (outcome, events)
    }

    #[test]
    fn test_tick_plan() {
        assert_eq!(TickPlan::at(0), TickPlan { create: true, access_and_terminate: false });
        assert_eq!(TickPlan::at(1), TickPlan { create: false, access_and_terminate: false });
        assert_eq!(TickPlan::at(25), TickPlan { create: false, access_and_terminate: false });
        assert_eq!(TickPlan::at(30), TickPlan { create: true, access_and_terminate: true });
        assert_eq!(TickPlan::at(35), TickPlan { create: false, access_and_terminate: true });
        assert_eq!(TickPlan::at(36), TickPlan { create: true, access_and_terminate: false });
    }

    #[test]
    fn test_full_run_schedule() {
        let (outcome, events) = run(config(1024, 4, 1, 8));

        assert!(outcome.completed());
        assert_eq!(outcome.ticks_run, 60);
        assert_eq!(outcome.stats.created, 30);
        assert_eq!(outcome.stats.accesses, 6);
        assert_eq!(outcome.stats.terminated, 6);

        let ticks = events.iter().filter(|e| matches!(e, Event::Tick(_))).count();
        assert_eq!(ticks, 60);
        assert!(matches!(events[0], Event::PhysicalMemory { size: 1024, frames: 256 }));
        assert!(matches!(events[1], Event::VirtualMemory { .. }));
        assert_eq!(events[2], Event::Tick(0));
        assert_eq!(events.last(), Some(&Event::Finished { ticks: 60 }));
    }

    #[test]
    fn test_access_precedes_terminate() {
        let (_, events) = run(config(1024, 4, 1, 8));

        let at_30 = events.iter().position(|e| *e == Event::Tick(30)).unwrap();
        let tick: Vec<&Event> = events[at_30 + 1..]
            .iter()
            .take_while(|e| !matches!(e, Event::Tick(_)))
            .collect();

        assert!(matches!(tick[0], Event::Created { .. }));
        assert!(matches!(tick[1], Event::Access { .. }));
        assert!(matches!(tick.last(), Some(Event::Terminated { .. })));
    }

    #[test]
    fn test_seeded_runs_replay() {
        let (a, events_a) = run(config(64, 2, 2, 10));
        let (b, events_b) = run(config(64, 2, 2, 10));

        assert_eq!(a, b);
        assert_eq!(events_a, events_b);
    }

    #[test]
    fn test_fatal_stops_run() {
        // 2 frames and fewer than 9 slots; each process needs 5 pages
        let (outcome, events) = run(config(2, 1, 5, 5));

        let fatal = outcome.fatal.clone().unwrap();
        assert!(matches!(fatal, FatalError::MemoryExhausted { .. }));
        assert!(outcome.ticks_run < 60);
        assert_eq!(events.last(), Some(&Event::Fatal(fatal)));
        assert!(!events.iter().any(|e| matches!(e, Event::Finished { .. })));
    }

    #[test]
    fn test_zero_ticks() {
        let (outcome, events) = run(config(8, 2, 1, 4).with_ticks(0));

        assert_eq!(outcome.ticks_run, 0);
        assert_eq!(outcome.stats, Stats::default());
        assert_eq!(events.len(), 3);
        assert_eq!(events[2], Event::Finished { ticks: 0 });
    }
}
