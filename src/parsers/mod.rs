pub mod audit;

pub use audit::AuditParser;

use indexmap::IndexMap;
use thiserror::Error;

use crate::batch::BatchParser;
use crate::config::{ConfigError, ParserConfig, TYPE_LINUX_AUDIT};
use crate::record::Record;

/// Turns a single logical line into a record.
///
/// Implementations must be pure: the dispatcher calls them from several
/// worker threads at once.
pub trait LineParser: Send + Sync {
    fn parse_line(&self, line: &str) -> Result<Record, ParseError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("sub-message nesting exceeds {max} levels")]
    NestingTooDeep { max: usize },
    #[error("{0}")]
    Invalid(String),
}

/// Builds the line parser for a registered type
pub type ParserFactory = fn(&ParserConfig) -> Box<dyn LineParser>;

/// Maps parser type names to their constructors.
///
/// The host fills the registry at startup; nothing registers itself.
#[derive(Debug, Clone, Default)]
pub struct ParserRegistry {
    factories: IndexMap<String, ParserFactory>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every parser this crate ships
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(TYPE_LINUX_AUDIT, audit_factory);
        registry
    }

    /// Register a factory, replacing any previous one for the same type
    pub fn register(&mut self, parser_type: impl Into<String>, factory: ParserFactory) {
        self.factories.insert(parser_type.into(), factory);
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn create(&self, config: &ParserConfig) -> Result<BatchParser, ConfigError> {
        let factory = self
            .factories
            .get(&config.parser_type)
            .ok_or_else(|| ConfigError::UnknownParserType(config.parser_type.clone()))?;
        Ok(BatchParser::new(config, factory(config)))
    }
}

fn audit_factory(_config: &ParserConfig) -> Box<dyn LineParser> {
    Box::new(AuditParser::new())
}
