use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use pagesim::config::DEFAULT_TICKS;

pub struct Args {
    /// Physical memory size (MB). Prompted for if absent.
    physical: Option<i64>,
    /// Page size (MB). Prompted for if absent.
    page: Option<i64>,
    /// Smallest process size (MB). Prompted for if absent.
    min: Option<i64>,
    /// Largest process size (MB). Prompted for if absent.
    max: Option<i64>,
    /// Number of simulation ticks
    ticks: u32,
    /// Real-time pause between ticks, in milliseconds
    tick_ms: u64,
    /// Seed for every random draw; clock-seeded when absent
    seed: Option<u64>,
    help: bool,
}

impl Args {
    const OPT_HELP: &'static str = "--help";
    const OPT_PHYSICAL: &'static str = "--physical";
    const OPT_PAGE: &'static str = "--page";
    const OPT_MIN: &'static str = "--min";
    const OPT_MAX: &'static str = "--max";
    const OPT_TICKS: &'static str = "--ticks";
    const OPT_TICK_MS: &'static str = "--tick-ms";
    const OPT_SEED: &'static str = "--seed";

    fn value<T: FromStr>(args: &[String], i: usize, opt: &str) -> Result<T> {
        let raw = args
            .get(i)
            .ok_or_else(|| anyhow!("missing value for {}", opt))?;

        raw.parse::<T>()
            .map_err(|_| anyhow!("invalid value {:?}", raw))
            .with_context(|| format!("while parsing {}", opt))
    }

    pub fn parse(args: Vec<String>) -> Result<Self> {
        let mut parsed = Args {
            physical: None,
            page: None,
            min: None,
            max: None,
            ticks: DEFAULT_TICKS,
            tick_ms: 1000,
            seed: None,
            help: false,
        };

        let mut i: usize = 1;
        while i < args.len() {
            match args[i].as_str() {
                Self::OPT_HELP => {
                    parsed.help = true;
                }
                Self::OPT_PHYSICAL => {
                    i += 1;
                    parsed.physical = Some(Self::value(&args, i, Self::OPT_PHYSICAL)?);
                }
                Self::OPT_PAGE => {
                    i += 1;
                    parsed.page = Some(Self::value(&args, i, Self::OPT_PAGE)?);
                }
                Self::OPT_MIN => {
                    i += 1;
                    parsed.min = Some(Self::value(&args, i, Self::OPT_MIN)?);
                }
                Self::OPT_MAX => {
                    i += 1;
                    parsed.max = Some(Self::value(&args, i, Self::OPT_MAX)?);
                }
                Self::OPT_TICKS => {
                    i += 1;
                    parsed.ticks = Self::value(&args, i, Self::OPT_TICKS)?;
                }
                Self::OPT_TICK_MS => {
                    i += 1;
                    parsed.tick_ms = Self::value(&args, i, Self::OPT_TICK_MS)?;
                }
                Self::OPT_SEED => {
                    i += 1;
                    parsed.seed = Some(Self::value(&args, i, Self::OPT_SEED)?);
                }
                other => {
                    return Err(anyhow!("invalid argument {:?}", other));
                }
            }

            i += 1;
        }

        Ok(parsed)
    }

    pub fn usage(program_name: &str) {
        println!(
            "Usage: {} [{} <MB>] [{} <MB>] [{} <MB>] [{} <MB>] [{} <n>] [{} <ms>] [{} <seed>]",
            program_name,
            Self::OPT_PHYSICAL,
            Self::OPT_PAGE,
            Self::OPT_MIN,
            Self::OPT_MAX,
            Self::OPT_TICKS,
            Self::OPT_TICK_MS,
            Self::OPT_SEED,
        );
        println!("Sizes left out are asked for on standard input.");
    }

    pub fn help(&self) -> bool {
        self.help
    }

    pub fn physical(&self) -> Option<i64> {
        self.physical
    }

    pub fn page(&self) -> Option<i64> {
        self.page
    }

    pub fn min(&self) -> Option<i64> {
        self.min
    }

    pub fn max(&self) -> Option<i64> {
        self.max
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn tick_ms(&self) -> u64 {
        self.tick_ms
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Args> {
        Args::parse(line.split_whitespace().map(String::from).collect())
    }

    #[test]
    fn test_defaults() {
        let args = parse("pagesim").unwrap();

        assert_eq!(args.physical(), None);
        assert_eq!(args.ticks(), DEFAULT_TICKS);
        assert_eq!(args.tick_ms(), 1000);
        assert_eq!(args.seed(), None);
        assert!(!args.help());
    }

    #[test]
    fn test_all_options() {
        let args = parse(
            "pagesim --physical 64 --page 4 --min 2 --max 16 --ticks 10 --tick-ms 0 --seed 7",
        )
        .unwrap();

        assert_eq!(args.physical(), Some(64));
        assert_eq!(args.page(), Some(4));
        assert_eq!(args.min(), Some(2));
        assert_eq!(args.max(), Some(16));
        assert_eq!(args.ticks(), 10);
        assert_eq!(args.tick_ms(), 0);
        assert_eq!(args.seed(), Some(7));
    }

    #[test]
    fn test_negative_sizes_parse() {
        // range checks belong to the config layer
        let args = parse("pagesim --physical -3").unwrap();
        assert_eq!(args.physical(), Some(-3));
    }

    #[test]
    fn test_errors() {
        assert!(parse("pagesim --bogus").is_err());
        assert!(parse("pagesim --page").is_err());
        assert!(parse("pagesim --page four").is_err());
        assert!(parse("pagesim --ticks -1").is_err());
    }
}
