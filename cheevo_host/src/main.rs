mod badges;
mod cli;
mod display;
mod engine;
mod fonts;
mod host;
mod locale;
mod runner;
mod script;

use anyhow::Result;
use clap::Parser;

use crate::cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::init();

    let report = runner::run(&args)?;

    println!(
        "Replayed {} unlocks over {} frames ({} ms simulated, {} mode)",
        report.unlocks,
        report.frames,
        report.simulated_ms,
        if report.threaded { "threaded" } else { "local" }
    );
    println!(
        "  popups: {} started, {} queued, {} dropped",
        report.pushes.started, report.pushes.queued, report.pushes.dropped
    );
    println!(
        "  badges: {} loaded, {} unloaded, {} missing, {} still resident",
        report.badges.loaded, report.badges.unloaded, report.badges.missing, report.badges.resident
    );
    if !report.finished_idle {
        println!("  warning: frame limit reached before the queue drained");
    }
    Ok(())
}
