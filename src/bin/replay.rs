// Standalone replay tool for re-deciding logged turns
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay all turns
//   --turns <turn1,turn2>  Replay specific turns (comma-separated)
//   --validate <t:m,...>   Check logged moves against expectations
//   --verbose              Show detailed output for each turn
//   --config <path>        Path to Snake.toml (default: Snake.toml)
//   --profile              Print section timings (same as SNAKE_PROFILE=1)

use std::env;
use std::process;
use std::time::Instant;

use paranoid_snake::config::Config;
use paranoid_snake::replay::{LogEntry, ReplayEngine};
use paranoid_snake::simple_profiler;
use paranoid_snake::types::Direction;

const USAGE: &str = "\
Paranoid Snake Replay Tool

USAGE:
  replay <log_file> [OPTIONS]

OPTIONS:
  --all                   Replay all turns in the log
  --turns <T1,T2,...>     Replay specific turns (comma-separated)
  --validate <T:M,...>    Validate logged moves (turn:move, alternatives as up|left)
  --verbose               Show detailed output for each turn
  --config <path>         Path to Snake.toml (default: Snake.toml)
  --profile               Print section timings after the report
  --help                  Show this help message

EXAMPLES:
  replay snake_debug.jsonl --all
  replay snake_debug.jsonl --turns 5,10,15 --verbose
  replay snake_debug.jsonl --validate 5:up,10:right|down
";

enum Mode {
    All,
    Turns(Vec<i32>),
    Validate(Vec<(i32, Vec<Direction>)>),
}

struct Args {
    log_file: String,
    config_path: String,
    verbose: bool,
    profile: bool,
    mode: Mode,
}

fn parse_turns(s: &str) -> Result<Vec<i32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<i32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", t, e))
        })
        .collect()
}

fn parse_expected_moves(s: &str) -> Result<Vec<(i32, Vec<Direction>)>, String> {
    s.split(',')
        .map(|pair| {
            let (turn, moves) = pair
                .trim()
                .split_once(':')
                .ok_or_else(|| format!("Invalid format '{}'. Expected 'turn:move'", pair))?;
            let turn = turn
                .parse::<i32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", turn, e))?;
            let moves = moves
                .split('|')
                .map(|m| Direction::parse(m.trim()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((turn, moves))
        })
        .collect()
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let log_file = args
        .get(1)
        .filter(|arg| !arg.starts_with("--"))
        .cloned()
        .ok_or("Missing log file")?;

    let mut config_path = "Snake.toml".to_string();
    let mut verbose = false;
    let mut profile = false;
    let mut mode = None;

    let mut rest = args[2..].iter();
    while let Some(flag) = rest.next() {
        let mut value = || {
            rest.next()
                .cloned()
                .ok_or_else(|| format!("{} requires an argument", flag))
        };
        match flag.as_str() {
            "--all" => mode = Some(Mode::All),
            "--turns" => mode = Some(Mode::Turns(parse_turns(&value()?)?)),
            "--validate" => mode = Some(Mode::Validate(parse_expected_moves(&value()?)?)),
            "--config" => config_path = value()?,
            "--verbose" => verbose = true,
            "--profile" => profile = true,
            other => return Err(format!("Unknown option '{}'", other)),
        }
    }

    Ok(Args {
        log_file,
        config_path,
        verbose,
        profile,
        mode: mode.ok_or("Must specify --all, --turns, or --validate")?,
    })
}

fn run(args: Args) -> Result<(), String> {
    if args.profile {
        simple_profiler::set_enabled(true);
    }

    let config = Config::from_file(&args.config_path).unwrap_or_else(|e| {
        eprintln!("Warning: {} ({}), using default configuration", e, args.config_path);
        Config::default_hardcoded()
    });
    let engine = ReplayEngine::new(config, args.verbose);

    let entries: Vec<LogEntry> = engine.load_log_file(&args.log_file)?;
    if entries.is_empty() {
        return Err(format!("{} has no entries", args.log_file));
    }
    println!("Loaded {} log entries from {}\n", entries.len(), args.log_file);

    let started = Instant::now();
    match args.mode {
        Mode::All => {
            println!("Replaying all {} turns...", entries.len());
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        Mode::Turns(turns) => {
            println!("Replaying {} specific turn(s)...", turns.len());
            let results = engine.replay_turns(&entries, &turns)?;
            engine.print_report(&results);
        }
        Mode::Validate(expected) => {
            println!("Validating {} expected move(s)...", expected.len());
            engine.validate_expected_moves(&entries, &expected)?;
            println!("✓ All expected moves validated successfully!");
        }
    }
    simple_profiler::print_report(started.elapsed().as_millis() as u64);

    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "--help") {
        print!("{}", USAGE);
        return;
    }

    let outcome = parse_args(&args).and_then(run);
    if let Err(e) = outcome {
        eprintln!("Error: {}\n", e);
        eprint!("{}", USAGE);
        process::exit(1);
    }
}
