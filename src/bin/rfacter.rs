//! rfacter - print facts about the local host.
//!
//! Resolves the facts named on the command line (or every core fact when
//! none are given) and prints them.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{Level, debug, error};
use tracing_subscriber::EnvFilter;

use rfacter::facts::{FactCatalog, FactValue, InternalFactManager, ManagerOptions, ResolvedFact};
use rfacter::resolver::{ResolveOptions, ResolverRegistry};
use rfacter::source::Sources;

/// Collect and display facts about the current system.
#[derive(Parser)]
#[command(name = "rfacter", about = "Collect and display facts about the current system", version)]
struct Args {
    /// Facts to resolve, as dotted queries (e.g. `mountpoints./.filesystem`).
    queries: Vec<String>,

    /// Log the call stack along with resolver errors.
    #[arg(long)]
    trace: bool,

    /// Include legacy fact names when listing all facts.
    #[arg(long)]
    show_legacy: bool,

    /// Timeout in seconds for external commands.
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Path to /proc filesystem.
    #[arg(long, default_value = Sources::DEFAULT_PROC_PATH)]
    proc_path: String,

    /// Path to /sys filesystem.
    #[arg(long, default_value = Sources::DEFAULT_SYS_PATH)]
    sys_path: String,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is warn level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    match format!("rfacter={}", level).parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("invalid log directive: {}", e),
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Renders a fact value for display; absent values print as nothing.
fn render(value: Option<&FactValue>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

fn print_facts(out: &mut impl Write, facts: &[ResolvedFact], single: bool) -> io::Result<()> {
    if single {
        if let Some(fact) = facts.first() {
            writeln!(out, "{}", render(fact.value.as_ref()))?;
        }
        return Ok(());
    }

    for fact in facts {
        writeln!(out, "{} => {}", fact.name, render(fact.value.as_ref()))?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    debug!(
        "rfacter {}: proc={}, sys={}, timeout={}s",
        env!("CARGO_PKG_VERSION"),
        args.proc_path,
        args.sys_path,
        args.timeout
    );

    let timeout = Duration::from_secs(args.timeout);
    let sources = Sources::system(&args.proc_path, &args.sys_path, timeout);
    let registry = Arc::new(ResolverRegistry::new(sources));
    let manager = InternalFactManager::new(
        registry.clone(),
        ManagerOptions {
            trace: args.trace,
            resolve: ResolveOptions {
                timeout: Some(timeout),
            },
        },
    );

    let searched = FactCatalog::default().search(args.queries.as_slice(), args.show_legacy);
    let facts = manager.resolve_facts(&searched);
    registry.log_stats();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = print_facts(&mut out, &facts, args.queries.len() == 1) {
        error!("failed to write facts: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
