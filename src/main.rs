use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufWriter, Write};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use auditlog::readers::{open_input, EntryBatcher};
use auditlog::{ParserRegistry, RunStats};

mod cli;

use cli::Cli;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    if let Err(err) = run(&cli) {
        eprintln!("auditlog: {:#}", err);
        std::process::exit(1);
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.parser_config()?;
    let registry = ParserRegistry::with_defaults();
    let parser = registry.create(&config)?;
    debug!(
        parser = parser.name(),
        parser_type = parser.parser_type(),
        threads = parser.parallelism(),
        "parser ready"
    );

    let stdout = io::stdout();
    let mut output = BufWriter::new(stdout.lock());
    let mut totals = RunStats::new();
    let mut entries_read = 0usize;
    let batch_size = usize::try_from(cli.batch_size).unwrap_or(usize::MAX);

    for input in cli.inputs() {
        let reader = open_input(&input)?;
        for batch in EntryBatcher::new(reader, batch_size, !cli.no_join) {
            let batch = batch.with_context(|| format!("Failed to read {}", input))?;
            let (records, stats) = parser.parse_with_stats(&batch);

            if stats.errors > 0 {
                warn!(
                    input = %input,
                    errors = stats.errors,
                    last_error = %stats.last_error,
                    "batch contained lines without usable data"
                );
            }

            for record in &records {
                serde_json::to_writer(&mut output, record)?;
                output.write_all(b"\n")?;
            }

            totals.merge(&stats, entries_read);
            entries_read += batch.len();
        }
    }
    output.flush().context("Failed to flush output")?;

    if cli.stats {
        eprintln!("{}", totals.format_stats(entries_read));
    }
    Ok(())
}
