use std::{
    io::{BufRead, Write},
    time::Duration,
};

use anyhow::Result;
use pagesim::{
    config::{check_memory, check_proc_range},
    ConfigError, SimConfig,
};

use crate::args::Args;

const ASK_PHYSICAL: &str = "Enter physical memory size (MB): ";
const ASK_PAGE: &str = "Enter page size (MB): ";
const ASK_MIN: &str = "Enter MINIMUM process size (MB): ";
const ASK_MAX: &str = "Enter MAXIMUM process size (MB): ";

/// Asks `question` and reads one integer from the next input line.
pub fn read_integer<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> Result<i64> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let answer = line.trim();
    let value = answer
        .parse::<i64>()
        .map_err(|_| ConfigError::InvalidInput(answer.to_string()))?;

    Ok(value)
}

fn given_or_ask<R: BufRead, W: Write>(
    given: Option<i64>,
    input: &mut R,
    output: &mut W,
    question: &str,
) -> Result<i64> {
    match given {
        Some(value) => Ok(value),
        None => read_integer(input, output, question),
    }
}

/// Builds the config from the command line, asking for any missing size.
/// Memory geometry is checked before the process range is asked for.
pub fn collect_config<R: BufRead, W: Write>(
    args: &Args,
    input: &mut R,
    output: &mut W,
) -> Result<SimConfig> {
    let physical = given_or_ask(args.physical(), input, output, ASK_PHYSICAL)?;
    let page = given_or_ask(args.page(), input, output, ASK_PAGE)?;
    check_memory(physical, page)?;

    let min = given_or_ask(args.min(), input, output, ASK_MIN)?;
    let max = given_or_ask(args.max(), input, output, ASK_MAX)?;
    check_proc_range(min, max)?;

    let mut config = SimConfig::new(physical, page, min, max)?
        .with_ticks(args.ticks())
        .with_tick_interval(Duration::from_millis(args.tick_ms()));

    if let Some(seed) = args.seed() {
        config = config.with_seed(seed);
    }

    Ok(config)
}
