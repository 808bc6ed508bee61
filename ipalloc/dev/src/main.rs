mod config;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ipalloc::{IpAlloc, IpRange};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{PoolConfig, PoolKind};

/// Run allocation commands against an address pool
#[derive(Parser, Debug)]
struct Options {
    /// Pool document (TOML)
    #[arg(short, long)]
    config: PathBuf,

    /// Which pool to seed the allocator from
    #[arg(short, long, value_enum, default_value_t = PoolKind::Pod)]
    pool: PoolKind,

    /// Log every free list mutation
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Allocate single addresses
    Ips { count: usize },
    /// Allocate 256-address chunks
    Chunks { count: usize },
    /// Take a range out of the pool, e.g. `10.2.0.2-10.2.0.9`
    Reserve { range: IpRange },
    /// Print the free list
    Show,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(alloc: &IpAlloc, command: &Command, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Command::Ips { count } => {
            for _ in 0..*count {
                let ip = alloc.get_ip().context("allocating ip")?;
                writeln!(out, "{}", ip)?;
            }
        }
        Command::Chunks { count } => {
            for _ in 0..*count {
                let chunk = alloc.get_ip_chunk().context("allocating chunk")?;
                let chunk: Vec<String> = chunk.iter().map(|r| r.to_string()).collect();
                writeln!(out, "{}", chunk.join(" "))?;
            }
        }
        Command::Reserve { range } => {
            if !alloc.remove_range(range.start, range.end) {
                anyhow::bail!("{} is not free", range);
            }
        }
        Command::Show => {
            for range in alloc.free_list() {
                writeln!(out, "{}", range)?;
            }
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let options = Options::parse();
    init_logging(options.verbose);
    let config = PoolConfig::load(&options.config)?;
    let ranges = config.ranges(options.pool)?;
    let alloc = IpAlloc::new();
    alloc
        .add_ranges(ranges)
        .with_context(|| format!("seeding {:?} pool", options.pool))?;
    info!(
        pool = ?options.pool,
        free = alloc.free_addresses_up_to(u64::MAX),
        "seeded"
    );
    run(&alloc, &options.command, &mut io::stdout().lock())?;
    info!(
        free = alloc.free_addresses_up_to(u64::MAX),
        ranges = alloc.free_list().len(),
        "done"
    );
    if cfg!(feature = "stat") {
        eprintln!("{}", alloc.stats());
    }
    Ok(())
}
