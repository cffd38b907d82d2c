//! RV64I listing CLI.
//!
//! This binary sweeps a code image and prints what the decoder and lifter make of it. It performs:
//! 1. **Load:** Read an ELF executable (every code section) or a raw binary at a base address.
//! 2. **Sweep:** Decode every 4-byte word, rendering text, control-flow edges and optional IL.
//! 3. **Report:** Print a text listing or JSON Lines, and an optional summary of the sweep.

use std::error::Error;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rvlift_core::config::{Config, OutputFormat};
use rvlift_core::lift::BranchKind;
use rvlift_core::loader::{self, CodeRegion};
use rvlift_core::sweep::{ListingEntry, Sweep, SweepStats};

#[derive(Parser, Debug)]
#[command(
    name = "rvlift",
    author,
    version,
    about = "RV64I disassembler and IL lifter",
    long_about = "Decode an RV64I image word by word and print the instruction text, control-flow edges and lifted IL.\n\nELF inputs are swept section by section; anything else is treated as a raw image loaded at --base.\n\nExamples:\n  rvlift a.out\n  rvlift --il --stats firmware.bin --base 0x80000000\n  rvlift --json a.out > listing.jsonl"
)]
struct Cli {
    /// ELF executable or raw binary to sweep.
    file: PathBuf,

    /// JSON configuration file; command-line flags override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Load address for raw (non-ELF) images, decimal or 0x-prefixed hex.
    #[arg(short, long, value_parser = parse_address)]
    base: Option<u64>,

    /// Sweep at most this many bytes of each region.
    #[arg(long)]
    max_len: Option<usize>,

    /// Stop at the first undecodable word instead of skipping it.
    #[arg(long)]
    stop_on_error: bool,

    /// Emit one JSON object per line instead of text.
    #[arg(long)]
    json: bool,

    /// Print lifted IL under each instruction.
    #[arg(long)]
    il: bool,

    /// Omit control-flow edges.
    #[arg(long)]
    no_branches: bool,

    /// Print a summary after the listing.
    #[arg(long)]
    stats: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Region header emitted in JSON mode.
#[derive(Serialize)]
struct RegionHeader<'a> {
    section: &'a str,
    address: u64,
    size: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("rvlift: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Loads the configuration, applies command-line overrides, and sweeps every region.
fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    apply_overrides(&mut config, cli);
    init_tracing(cli.verbose, config.general.trace_instructions);

    let regions = loader::load_image(&cli.file, config.general.base_address)?;
    info!(file = %cli.file.display(), regions = regions.len(), "loaded image");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut stats = SweepStats::default();

    for region in &regions {
        print_header(&mut out, &config, region)?;
        let sweep = Sweep::new(&region.bytes, region.address)
            .max_len(config.sweep.max_len)
            .stop_on_error(config.sweep.stop_on_error);
        for entry in sweep {
            stats.record(&entry);
            print_entry(&mut out, &config, &entry)?;
        }
    }

    if config.output.show_stats {
        print_stats(&mut out, &config, &stats)?;
    }
    out.flush()?;
    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(base) = cli.base {
        config.general.base_address = base;
    }
    if cli.max_len.is_some() {
        config.sweep.max_len = cli.max_len;
    }
    config.sweep.stop_on_error |= cli.stop_on_error;
    if cli.json {
        config.output.format = OutputFormat::Json;
    }
    config.output.show_il |= cli.il;
    if cli.no_branches {
        config.output.show_branches = false;
    }
    config.output.show_stats |= cli.stats;
}

/// Installs the stderr log subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8, trace_instructions: bool) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let mut directives = level.to_string();
    if trace_instructions {
        directives.push_str(",rvlift_core::lift=trace");
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_address(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse(),
    };
    parsed.map_err(|e| format!("invalid address '{s}': {e}"))
}

fn branch_label(kind: BranchKind) -> &'static str {
    match kind {
        BranchKind::TrueBranch => "true",
        BranchKind::FalseBranch => "false",
        BranchKind::UnconditionalBranch => "jump",
        BranchKind::Call => "call",
        BranchKind::FunctionReturn => "return",
    }
}

fn print_header(out: &mut impl Write, config: &Config, region: &CodeRegion) -> io::Result<()> {
    match config.output.format {
        OutputFormat::Text => writeln!(
            out,
            "; {} @ {:#x} ({} bytes)",
            region.name,
            region.address,
            region.bytes.len()
        ),
        OutputFormat::Json => {
            let header = RegionHeader {
                section: &region.name,
                address: region.address,
                size: region.bytes.len(),
            };
            writeln!(out, "{}", serde_json::to_string(&header)?)
        }
    }
}

fn print_entry(out: &mut impl Write, config: &Config, entry: &ListingEntry) -> io::Result<()> {
    if config.output.format == OutputFormat::Json {
        return writeln!(out, "{}", serde_json::to_string(entry)?);
    }

    let raw = entry
        .raw
        .map_or_else(|| "--------".to_string(), |w| format!("{w:08x}"));
    match &entry.result {
        Ok(_) => writeln!(out, "{:#010x}:  {raw}  {}", entry.address, entry.text)?,
        Err(e) => writeln!(out, "{:#010x}:  {raw}  ; {e}", entry.address)?,
    }

    if config.output.show_branches {
        for branch in &entry.branches {
            match branch.target {
                Some(target) => writeln!(out, "{:14}-> {} {target:#x}", "", branch_label(branch.kind))?,
                None => writeln!(out, "{:14}-> {} <indirect>", "", branch_label(branch.kind))?,
            }
        }
    }
    if config.output.show_il {
        for stmt in &entry.il {
            writeln!(out, "{:14}|  {stmt}", "")?;
        }
    }
    Ok(())
}

fn print_stats(out: &mut impl Write, config: &Config, stats: &SweepStats) -> io::Result<()> {
    if config.output.format == OutputFormat::Json {
        return writeln!(out, "{}", serde_json::to_string(stats)?);
    }

    writeln!(out)?;
    writeln!(out, "; decoded:      {}", stats.decoded)?;
    writeln!(out, "; undecodable:  {}", stats.undecodable)?;
    writeln!(out, "; branches:     {}", stats.conditional_branches)?;
    writeln!(out, "; jumps:        {}", stats.jumps)?;
    writeln!(out, "; calls:        {}", stats.calls)?;
    writeln!(out, "; returns:      {}", stats.returns)?;
    writeln!(out, "; pseudo:       {}", stats.pseudo)?;
    for (format, count) in &stats.by_format {
        writeln!(out, "; {:<14}{count}", format!("format {format}:"))?;
    }
    Ok(())
}
