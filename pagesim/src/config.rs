use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_TICKS: u32 = 60;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Checks the memory geometry as entered: both sizes positive, and at least
/// one page fits in physical memory.
pub fn check_memory(physical: i64, page: i64) -> Result<(u64, u64), ConfigError> {
    if physical <= 0 {
        return Err(ConfigError::PhysicalSize(physical));
    }
    if page <= 0 {
        return Err(ConfigError::PageSize(page));
    }

    let (physical, page) = (physical as u64, page as u64);

    if page > physical {
        return Err(ConfigError::PageLargerThanPhysical { page, physical });
    }

    Ok((physical, page))
}

pub fn check_proc_range(min: i64, max: i64) -> Result<(u64, u64), ConfigError> {
    if min <= 0 {
        return Err(ConfigError::MinProcSize(min));
    }
    if max <= 0 {
        return Err(ConfigError::MaxProcSize(max));
    }

    let (min, max) = (min as u64, max as u64);

    if min > max {
        return Err(ConfigError::InvalidProcRange { min, max });
    }

    Ok((min, max))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimConfig {
    /// Physical memory size, in MB.
    pub physical_size: u64,
    /// Page (and frame) size, in MB.
    pub page_size: u64,
    pub min_proc_size: u64,
    pub max_proc_size: u64,
    /// Number of driver ticks.
    pub ticks: u32,
    /// Real-time pause between ticks. Pacing only.
    pub tick_interval: Duration,
    /// Seed for every random draw. `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl SimConfig {
    pub fn new(physical: i64, page: i64, min: i64, max: i64) -> Result<Self, ConfigError> {
        let (physical_size, page_size) = check_memory(physical, page)?;
        let (min_proc_size, max_proc_size) = check_proc_range(min, max)?;

        Ok(SimConfig {
            physical_size,
            page_size,
            min_proc_size,
            max_proc_size,
            ticks: DEFAULT_TICKS,
            tick_interval: DEFAULT_TICK_INTERVAL,
            seed: None,
        })
    }

    pub fn with_ticks(mut self, ticks: u32) -> Self {
        self.ticks = ticks;
        self
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Re-checks a config whose fields may have been edited after `new`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.physical_size == 0 {
            return Err(ConfigError::PhysicalSize(0));
        }
        if self.page_size == 0 {
            return Err(ConfigError::PageSize(0));
        }
        if self.page_size > self.physical_size {
            return Err(ConfigError::PageLargerThanPhysical {
                page: self.page_size,
                physical: self.physical_size,
            });
        }
        if self.min_proc_size == 0 {
            return Err(ConfigError::MinProcSize(0));
        }
        if self.max_proc_size == 0 {
            return Err(ConfigError::MaxProcSize(0));
        }
        if self.min_proc_size > self.max_proc_size {
            return Err(ConfigError::InvalidProcRange {
                min: self.min_proc_size,
                max: self.max_proc_size,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_checks_in_order() {
        assert_eq!(check_memory(0, 0), Err(ConfigError::PhysicalSize(0)));
        assert_eq!(check_memory(-4, 2), Err(ConfigError::PhysicalSize(-4)));
        assert_eq!(check_memory(8, 0), Err(ConfigError::PageSize(0)));
        assert_eq!(
            check_memory(2, 4),
            Err(ConfigError::PageLargerThanPhysical { page: 4, physical: 2 })
        );
        assert_eq!(check_memory(8, 8), Ok((8, 8)));
    }

    #[test]
    fn test_proc_range_checks_in_order() {
        assert_eq!(check_proc_range(0, 5), Err(ConfigError::MinProcSize(0)));
        assert_eq!(check_proc_range(3, -1), Err(ConfigError::MaxProcSize(-1)));
        assert_eq!(
            check_proc_range(6, 5),
            Err(ConfigError::InvalidProcRange { min: 6, max: 5 })
        );
        assert_eq!(check_proc_range(5, 5), Ok((5, 5)));
    }

    #[test]
    fn test_defaults_and_builders() {
        let config = SimConfig::new(8, 2, 1, 5).unwrap();

        assert_eq!(config.ticks, DEFAULT_TICKS);
        assert_eq!(config.tick_interval, DEFAULT_TICK_INTERVAL);
        assert_eq!(config.seed, None);

        let config = config
            .with_ticks(10)
            .with_tick_interval(Duration::ZERO)
            .with_seed(7);

        assert_eq!(config.ticks, 10);
        assert_eq!(config.tick_interval, Duration::ZERO);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_validate_catches_edited_fields() {
        let mut config = SimConfig::new(8, 2, 1, 5).unwrap();
        assert!(config.validate().is_ok());

        config.page_size = 16;
        assert_eq!(
            config.validate(),
            Err(ConfigError::PageLargerThanPhysical { page: 16, physical: 8 })
        );
    }
}
