use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

use auditlog::ParserConfig;

#[derive(Parser, Debug)]
#[command(name = "auditlog")]
#[command(version)]
#[command(about = "Parse Linux audit logs into JSON lines")]
#[command(
    long_about = "Parse Linux audit logs into JSON lines\n\nEach audit entry becomes one JSON object. msg=audit(<ts>:<id>) headers are split into\nmsg_timestamp and msg_id, quoted sub-messages become nested objects, and repeated keys\nare stored as key_1, key_2, ..."
)]
pub struct Cli {
    /// Input files, gzip or zstd compressed files included (stdin when none or `-`)
    pub files: Vec<String>,

    /// JSON parser config file; command-line flags override its values
    #[arg(short = 'c', long = "config", help_heading = "Parser Options")]
    pub config: Option<PathBuf>,

    /// Parser name reported in logs
    #[arg(long = "name", help_heading = "Parser Options")]
    pub name: Option<String>,

    /// Attach the original line to every record as raw_data
    #[arg(long = "keep-raw", help_heading = "Parser Options")]
    pub keep_raw: bool,

    /// Drop failing lines instead of emitting them under pandora_stash
    #[arg(long = "no-error-data", help_heading = "Parser Options")]
    pub no_error_data: bool,

    /// Treat every physical line as its own entry, even when indented
    #[arg(long = "no-join", help_heading = "Input Options")]
    pub no_join: bool,

    /// Worker threads per batch (0 = one per CPU)
    #[arg(long = "threads", default_value_t = 0, help_heading = "Performance Options")]
    pub threads: usize,

    /// Entries parsed per batch
    #[arg(long = "batch-size", default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..), help_heading = "Performance Options")]
    pub batch_size: u64,

    /// Print a processing summary to stderr when done
    #[arg(short = 's', long = "stats", help_heading = "Output Options")]
    pub stats: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, help_heading = "Output Options")]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose", help_heading = "Output Options")]
    pub quiet: bool,
}

impl Cli {
    /// Merge the optional config file with command-line flags
    pub fn parser_config(&self) -> Result<ParserConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                ParserConfig::from_json(&text)
                    .with_context(|| format!("Failed to load config {}", path.display()))?
            }
            None => ParserConfig::default(),
        };

        if let Some(name) = &self.name {
            config.name.clone_from(name);
        }
        config.keep_raw_data |= self.keep_raw;
        config.disable_record_err_data |= self.no_error_data;
        if self.threads > 0 {
            config.parallelism = Some(self.threads);
        }
        Ok(config)
    }

    pub fn inputs(&self) -> Vec<String> {
        if self.files.is_empty() {
            vec!["-".to_string()]
        } else {
            self.files.clone()
        }
    }

    /// Default log filter when RUST_LOG is unset
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}
