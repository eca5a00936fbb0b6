
use bpred::*;
use std::env;
use std::error::Error;
use std::io;
use std::time::Instant;

const USAGE: &str = "usage: evaluate [--static|--gshare[:<g>]|--tournament[:<g>:<l>:<p>]|--tage] [trace file]";

/// Run a trace through an engine, recording hits and misses.
fn simulate(engine: &mut Engine,
    trace: impl Iterator<Item = Result<TraceRecord, TraceError>>)
    -> Result<BranchStats, TraceError>
{
    let mut stats = BranchStats::new();
    for record in trace {
        let record = record?;
        let predicted = Outcome::from_bool(engine.predict(record.pc));
        engine.train(record.pc, record.outcome.is_taken());
        stats.update(record.pc, predicted, record.outcome);
    }
    Ok(stats)
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut cfg = EngineConfig::default();
    let mut path = None;
    for arg in env::args().skip(1) {
        if arg.starts_with("--") {
            cfg = arg.parse()?;
        } else if path.is_none() {
            path = Some(arg);
        } else {
            return Err(USAGE.into());
        }
    }

    let mut engine = Engine::new(&cfg)?;
    println!("[*] Predictor: {}", engine.name());

    let start = Instant::now();
    let stats = match path {
        Some(path) => simulate(&mut engine, TraceReader::open(path)?)?,
        None => simulate(&mut engine, TraceReader::new(io::stdin().lock()))?,
    };
    let done = start.elapsed();
    println!("[*] Completed in {:.3?}", done);

    println!("Branches:           {:>10}", stats.global_brns());
    println!("Incorrect:          {:>10}", stats.global_miss());
    println!("Misprediction Rate: {:>10.3}", stats.miss_rate() * 100.0);

    if let Some(s) = engine.stats() {
        print!("{}", s);
    }

    println!("[*] Unique branches: {}", stats.num_unique_branches());
    for (pc, s) in stats.get_low_rate_branches(10) {
        println!("  {:08x}: {:>8} executions, {:.2}% correct",
            pc, s.occ, s.hit_rate() * 100.0
        );
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
