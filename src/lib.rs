// Core library for the auditlog parser
//
// Turns Linux audit lines (`type=SYSCALL msg=audit(1364481363.243:24287): ...`)
// into structured records, batch by batch, on a bounded worker pool.

pub mod aggregate;
pub mod batch;
pub mod config;
pub mod decompression;
pub mod multiline;
pub mod parallel;
pub mod parsers;
pub mod readers;
pub mod record;
pub mod stats;
pub mod timestamp;

pub use batch::BatchParser;
pub use config::{BatchOptions, ConfigError, ParserConfig};
pub use parsers::{AuditParser, LineParser, ParseError, ParserRegistry};
pub use record::{Record, Value};
pub use stats::{RunStats, StatsError};
