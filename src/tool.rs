// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! CLI tool for inspecting static tables

use clap::{ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};
use humansize::{SizeFormatter, BINARY};
use static_table::{
    BytesHash, Config, DuplicatePolicy, Fnv, Fnv64, Murmur, Murmur32, Plan, StaticTable, Xxh3,
};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    prelude::*,
    registry::Registry,
};

macro_rules! die {
    ($fmt:literal, $($arg:tt)*) => {{
        eprintln!($fmt, $($arg)*);
        std::process::exit(1);
    }};

    ($msg:literal) => {{
        eprintln!($msg);
        std::process::exit(1);
    }};

    () => {{
        eprintln!("Program terminated unexpectedly");
        std::process::exit(1);
    }};
}

#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};

pub fn init_tracing(quiet: bool, verbose: u8) -> (bool, LevelFilter) {
    let is_verbose = !quiet && verbose > 0;

    let level_filter = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    // Bridge log crate macros to tracing (for library code that uses log::*)
    tracing_log::LogTracer::init().expect("Failed to set log tracer");

    let registry = Registry::default();

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("STATIC_TABLE_LOG")
        .from_env_lossy();

    let subscriber = registry.with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .compact(),
    );

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        die!("INTERNAL ERROR: setting default tracing::subscriber failed");
    }

    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing_panic::panic_hook(info);
        prev_hook(info); // daisy-chain to old panic hook
    }));

    (is_verbose, level_filter)
}

/// Hash function used for string keys
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum HashKind {
    Fnv,
    #[value(name = "fnv64")]
    Fnv64,
    Murmur,
    #[value(name = "murmur32")]
    Murmur32,
    Xxh3,
}

/// Which occurrence of a repeated key is kept
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum Keep {
    Last,
    First,
}

impl From<Keep> for DuplicatePolicy {
    fn from(value: Keep) -> Self {
        match value {
            Keep::Last => Self::LastWins,
            Keep::First => Self::FirstWins,
        }
    }
}

/// CLI tool for inspecting static tables
#[derive(Parser, Debug)]
#[command(name = "static-table")]
#[command(about = "CLI tool for inspecting static tables")]
struct ToolArgs {
    /// Suppress all output except for errors. This overrides the -v flag.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Turn on verbose output. Supply -v multiple times to increase verbosity.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Input file with one key/value pair per line, separated by a tab ("-" reads stdin)
    input: PathBuf,

    /// Live pairs per bucket the bucket count search starts from
    #[arg(short, long, default_value_t = 1.0)]
    load_factor: f64,

    /// Load factor below which collisions are accepted
    #[arg(short, long, default_value_t = 0.5)]
    min_load_factor: f64,

    /// Hash function for keys
    #[arg(long, value_enum, default_value_t = HashKind::Fnv)]
    hash: HashKind,

    /// Which occurrence of a repeated key is kept
    #[arg(long, value_enum, default_value_t = Keep::Last)]
    keep: Keep,

    /// Command to run
    #[command(subcommand)]
    command: ToolCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum ToolCommand {
    /// Print layout statistics
    Stats,

    /// Look up one or more keys
    Get {
        /// Keys to look up
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Print every slot in layout order
    Dump,
}

fn read_input(path: &Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
    }
}

/// Splits the input into pairs, borrowing keys and values from it.
fn parse_pairs(text: &str) -> Vec<(&str, &str)> {
    text.lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|line| {
            if let Some(pair) = line.split_once('\t') {
                pair
            } else if let Some((key, value)) = line.split_once(char::is_whitespace) {
                (key, value.trim_start())
            } else {
                (line, "")
            }
        })
        .collect()
}

fn print_stats<H>(table: &StaticTable<&str, &str, H>, plan: &Plan<H>) {
    let footprint = table.slot_count() * std::mem::size_of::<Option<(&str, &str)>>();

    println!("pairs: {}", plan.len());
    println!("live: {}", plan.element_count());
    println!("duplicates: {}", plan.duplicate_count());
    println!("bucket count: {}", table.bucket_count());
    println!("bucket size: {}", table.bucket_size());
    println!("slots: {}", table.slot_count());
    println!("load factor: {:.2}", table.load_factor());
    println!("footprint: {}", SizeFormatter::new(footprint, BINARY));
}

fn run<H: BytesHash>(pairs: Vec<(&str, &str)>, config: &Config, command: &ToolCommand) {
    let plan = match Plan::<H>::new(&pairs, config) {
        Ok(plan) => plan,
        Err(e) => die!("Invalid tuning: {}", e),
    };

    let table = StaticTable::build(pairs, &plan);

    match command {
        ToolCommand::Stats => print_stats(&table, &plan),
        ToolCommand::Get { keys } => {
            for key in keys {
                match table.get(key.as_str()) {
                    Some(value) => println!("{key}\t{value}"),
                    None => println!("{key}\t(not found)"),
                }
            }
        }
        ToolCommand::Dump => {
            for (bucket_idx, slot_idx, entry) in table.slots() {
                match entry {
                    Some((key, value)) => println!("{bucket_idx}\t{slot_idx}\t{key}\t{value}"),
                    None => println!("{bucket_idx}\t{slot_idx}\t-\t-"),
                }
            }
        }
    }
}

fn main() {
    let args = ToolArgs::parse();
    let (verbose, level_filter) = init_tracing(args.quiet, args.verbose);

    let cmd = ToolArgs::command();

    info!(
        "starting {} ({} {}), log level: {level_filter}",
        cmd.get_name(),
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let text = match read_input(&args.input) {
        Ok(text) => text,
        Err(e) => {
            let note = if verbose {
                ""
            } else {
                ". Note: Use -v (one or multiple times) for more information"
            };
            die!("Error reading {}: {}{}", args.input.display(), e, note);
        }
    };

    let pairs = parse_pairs(&text);
    debug!("Read {} pairs from {}", pairs.len(), args.input.display());

    let config = Config::new()
        .load_factor(args.load_factor)
        .min_load_factor(args.min_load_factor)
        .duplicate_policy(args.keep.into());

    match args.hash {
        HashKind::Fnv => run::<Fnv>(pairs, &config, &args.command),
        HashKind::Fnv64 => run::<Fnv64>(pairs, &config, &args.command),
        HashKind::Murmur => run::<Murmur>(pairs, &config, &args.command),
        HashKind::Murmur32 => run::<Murmur32>(pairs, &config, &args.command),
        HashKind::Xxh3 => run::<Xxh3>(pairs, &config, &args.command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_parse_pairs() {
        let text = "# comment\nbsd\t1\n\nholy 2\nempty\nspaced\tvalue with spaces\n";

        assert_eq!(
            vec![
                ("bsd", "1"),
                ("holy", "2"),
                ("empty", ""),
                ("spaced", "value with spaces"),
            ],
            parse_pairs(text),
        );
    }

    #[test]
    fn tool_args_verify() {
        ToolArgs::command().debug_assert();
    }
}
