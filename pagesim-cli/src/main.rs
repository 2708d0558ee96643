mod args;
mod prompt;

use std::{io, process};

use anyhow::Result;
use args::Args;
use log::info;
use pagesim::{Event, Simulation};

fn run() -> Result<()> {
    let argv: Vec<String> = std::env::args().collect();
    let args = Args::parse(argv.clone())?;

    if args.help() {
        Args::usage(argv.first().map_or("pagesim", String::as_str));
        return Ok(());
    }

    let stdin = io::stdin();
    let config = prompt::collect_config(&args, &mut stdin.lock(), &mut io::stdout())?;

    let mut sim = Simulation::new(config)?;
    let outcome = sim.run(&mut |event: &Event| println!("{}", event));

    info!(
        "pagesim: {} ticks run, seed {}, {}",
        outcome.ticks_run,
        sim.manager().seed(),
        if outcome.completed() { "completed" } else { "stopped on fatal condition" }
    );
    println!("[STATS] {}", outcome.stats);

    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        eprintln!("[ERROR] {:#}", err);
        process::exit(1);
    }
}
