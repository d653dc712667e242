//! `slots` CLI - generate bookable slots from a JSON availability request.
//!
//! ## Usage
//!
//! ```sh
//! # Generate slots (stdin → stdout)
//! cat request.json | slots generate
//!
//! # From file to file, pretty-printed
//! slots generate -i request.json -o slots.json --pretty
//!
//! # Override request options
//! slots generate -i request.json --merge-ranges --index sorted --dst-policy shift-forward
//!
//! # Per-day slot counts
//! slots summary -i request.json
//!
//! # Debug logging (or set RUST_LOG)
//! slots -vv generate -i request.json
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use slot_engine::{CalendarDate, DstPolicy, IndexKind, Slot, SlotRequest};
use std::io::{self, Read};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Bookable slot generation from weekly availability"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate slots and write them as JSON
    Generate {
        /// Input request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
        #[command(flatten)]
        overrides: OptionOverrides,
    },
    /// Print per-day slot counts
    Summary {
        /// Input request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        #[command(flatten)]
        overrides: OptionOverrides,
    },
}

/// Flags that override the request's `options` object.
#[derive(Args)]
struct OptionOverrides {
    /// Merge overlapping availability ranges before slicing
    #[arg(long)]
    merge_ranges: bool,
    /// Conflict index to use
    #[arg(long, value_enum)]
    index: Option<IndexArg>,
    /// How range boundaries inside a DST gap are resolved
    #[arg(long, value_enum)]
    dst_policy: Option<DstPolicyArg>,
    /// Reject windows longer than this many days
    #[arg(long, conflicts_with = "unbounded")]
    max_window_days: Option<u32>,
    /// Accept windows of any length
    #[arg(long)]
    unbounded: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum IndexArg {
    Linear,
    Sorted,
}

#[derive(Clone, Copy, ValueEnum)]
enum DstPolicyArg {
    Skip,
    ShiftForward,
    WallClock,
}

impl From<IndexArg> for IndexKind {
    fn from(arg: IndexArg) -> Self {
        match arg {
            IndexArg::Linear => IndexKind::Linear,
            IndexArg::Sorted => IndexKind::Sorted,
        }
    }
}

impl From<DstPolicyArg> for DstPolicy {
    fn from(arg: DstPolicyArg) -> Self {
        match arg {
            DstPolicyArg::Skip => DstPolicy::Skip,
            DstPolicyArg::ShiftForward => DstPolicy::ShiftForward,
            DstPolicyArg::WallClock => DstPolicy::WallClock,
        }
    }
}

impl OptionOverrides {
    fn apply(&self, request: &mut SlotRequest) {
        let options = &mut request.options;
        if self.merge_ranges {
            options.merge_ranges = true;
        }
        if let Some(index) = self.index {
            options.index = index.into();
        }
        if let Some(policy) = self.dst_policy {
            options.dst_policy = policy.into();
        }
        if self.unbounded {
            options.max_window_days = None;
        } else if let Some(max) = self.max_window_days {
            options.max_window_days = Some(max);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            input,
            output,
            pretty,
            overrides,
        } => {
            let request = load_request(input.as_deref(), &overrides)?;
            let response = request.generate().context("Slot request rejected")?;
            info!(slots = response.slots.len(), "generation finished");

            let json = if pretty {
                response.to_json_pretty()?
            } else {
                response.to_json()?
            };
            write_output(output.as_deref(), &json)?;
        }
        Commands::Summary { input, overrides } => {
            let request = load_request(input.as_deref(), &overrides)?;
            let response = request.generate().context("Slot request rejected")?;

            println!("Timezone:  {}", response.timezone);
            for (date, slots) in group_by_date(&response.slots) {
                let first = slots.first().map(|s| s.time.to_string()).unwrap_or_default();
                let last = slots.last().map(|s| s.time.to_string()).unwrap_or_default();
                println!("{}  {:>3} slots  {} - {}", date, slots.len(), first, last);
            }
            println!("Total:     {} slots", response.slots.len());
        }
    }

    Ok(())
}

/// Install a stderr `fmt` subscriber. `RUST_LOG` wins over `-v` flags.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_request(input: Option<&str>, overrides: &OptionOverrides) -> Result<SlotRequest> {
    let json = read_input(input)?;
    let mut request = SlotRequest::from_json(&json).context("Failed to parse slot request")?;
    overrides.apply(&mut request);
    info!(
        timezone = %request.timezone,
        ranges = request.availability.len(),
        bookings = request.bookings.len(),
        offers = request.offers.len(),
        "loaded slot request"
    );
    Ok(request)
}

/// Consecutive slots sharing a date. Slots arrive ordered by date.
fn group_by_date(slots: &[Slot]) -> Vec<(CalendarDate, &[Slot])> {
    let mut groups = Vec::new();
    let mut rest = slots;
    while let Some(first) = rest.first() {
        let len = rest.iter().take_while(|s| s.date == first.date).count();
        let (group, tail) = rest.split_at(len);
        groups.push((first.date, group));
        rest = tail;
    }
    groups
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
