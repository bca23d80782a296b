use serde::Deserialize;
use thiserror::Error;

/// Type name under which the Linux audit parser is registered
pub const TYPE_LINUX_AUDIT: &str = "linuxaudit";

/// Field that holds the text of a line the parser could not handle
pub const KEY_PANDORA_STASH: &str = "pandora_stash";

/// Field that holds the original line when raw data is kept
pub const KEY_RAW_DATA: &str = "raw_data";

/// Parser settings supplied by the host
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub parser_type: String,
    /// Drop the text of failing lines instead of stashing it
    pub disable_record_err_data: bool,
    /// Attach the original line to every output record
    pub keep_raw_data: bool,
    /// Worker count; `None` means one per available CPU
    pub parallelism: Option<usize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            parser_type: TYPE_LINUX_AUDIT.to_string(),
            disable_record_err_data: false,
            keep_raw_data: false,
            parallelism: None,
        }
    }
}

impl ParserConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Worker count to use, never less than one
    pub fn effective_parallelism(&self) -> usize {
        self.parallelism
            .filter(|&n| n > 0)
            .unwrap_or_else(num_cpus::get)
            .max(1)
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            disable_record_err_data: self.disable_record_err_data,
            keep_raw_data: self.keep_raw_data,
        }
    }
}

/// Keep/skip policy flags applied when aggregating a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    pub disable_record_err_data: bool,
    pub keep_raw_data: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown parser type '{0}'")]
    UnknownParserType(String),
    #[error("invalid parser config: {0}")]
    Invalid(#[from] serde_json::Error),
}
