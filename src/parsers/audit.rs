use tracing::warn;

use crate::parsers::{LineParser, ParseError};
use crate::record::Record;
use crate::timestamp::{format_canonical, parse_numeric_timestamp};

/// Deepest sub-message recursion accepted before a quoted value is dropped
pub const MAX_NESTING_DEPTH: usize = 8;

const MSG_KEY: &str = "msg";
const MSG_HEADER_PREFIX: &str = "audit(";

/// Scanner state for the audit tokenizer.
///
/// | state         | char       | action                                         | next          |
/// |---------------|------------|------------------------------------------------|---------------|
/// | Default       | `'`        | sub-message hook, reset token and key          | InSingleQuote |
/// | InSingleQuote | `'`        | reset, keep the quote as token text            | Default       |
/// | InSingleQuote | other      | ignored                                        | InSingleQuote |
/// | Default       | `"`        | stripped                                       | Default       |
/// | Default       | `=`        | token becomes the pending key                  | Default       |
/// | Default       | whitespace | complete the pending field, reset token and key | Default       |
/// | Default       | other      | appended to token                              | Default       |
///
/// Double quotes are stripped rather than tracked, so whitespace inside them
/// still ends a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Default,
    InSingleQuote,
}

/// Tokenizer for Linux audit lines such as
/// `type=SYSCALL msg=audit(1364481363.243:24287): arch=c000003e`.
///
/// Produces a flat record of `key=value` pairs. Single-quoted sub-messages
/// (`msg='op=PAM:secret res=success'`) become nested records, and an
/// `audit(<timestamp>:<id>)` header under `msg` is replaced by the
/// `msg_timestamp` and `msg_id` fields. Malformed input yields partial or
/// empty records rather than errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditParser;

impl AuditParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_at_depth(&self, line: &str, depth: usize) -> Result<Record, ParseError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep {
                max: MAX_NESTING_DEPTH,
            });
        }

        let mut record = Record::new();
        let mut token = String::new();
        let mut key = String::new();
        let mut state = ScanState::Default;

        for (idx, c) in line.char_indices() {
            if c == '\'' {
                state = match state {
                    ScanState::Default => {
                        let rest = &line[idx + c.len_utf8()..];
                        self.complete_sub_message(&key, &token, rest, &mut record, depth);
                        token.clear();
                        key.clear();
                        ScanState::InSingleQuote
                    }
                    ScanState::InSingleQuote => {
                        token.clear();
                        key.clear();
                        token.push(c);
                        ScanState::Default
                    }
                };
                continue;
            }

            if state == ScanState::InSingleQuote || c == '"' {
                continue;
            }

            match c {
                '=' => key = std::mem::take(&mut token),
                c if c.is_whitespace() => {
                    complete_field(&key, &token, &mut record);
                    token.clear();
                    key.clear();
                }
                c => token.push(c),
            }
        }

        if !key.is_empty() && !token.is_empty() {
            record.set_field(&key, strip_colon(&token));
        }

        Ok(record)
    }

    /// Handle the value that starts at an opening single quote.
    ///
    /// With text already in `token` the quote just terminates that value.
    /// Otherwise everything up to and including the next quote is parsed as
    /// a nested record and stored under `key`.
    fn complete_sub_message(
        &self,
        key: &str,
        token: &str,
        rest: &str,
        record: &mut Record,
        depth: usize,
    ) {
        if key.is_empty() {
            return;
        }

        if !token.is_empty() {
            record.set_field(key, strip_colon(token));
            return;
        }

        let Some(end) = rest.find('\'') else {
            return;
        };
        let inner = &rest[..=end];
        match self.parse_at_depth(inner, depth + 1) {
            Ok(nested) => record.set_field(key, nested),
            Err(err) => warn!(key, sub_message = inner, error = %err, "dropping sub-message"),
        }
    }
}

impl LineParser for AuditParser {
    fn parse_line(&self, line: &str) -> Result<Record, ParseError> {
        self.parse_at_depth(line, 0)
    }
}

/// Store a `key=value` pair closed by whitespace
fn complete_field(key: &str, value: &str, record: &mut Record) {
    if key.is_empty() {
        return;
    }

    let value = strip_colon(value);
    if key == MSG_KEY && value.starts_with(MSG_HEADER_PREFIX) && extract_msg_header(value, record)
    {
        return;
    }

    record.set_field(key, strip_colon(value));
}

/// Split `audit(<timestamp>:<id>)` into `msg_timestamp` and `msg_id`.
///
/// Returns false when there is no `:` separator, leaving the record untouched.
/// A timestamp the time parser rejects is kept verbatim.
fn extract_msg_header(value: &str, record: &mut Record) -> bool {
    let inner = value.strip_prefix(MSG_HEADER_PREFIX).unwrap_or(value);
    let inner = inner.strip_suffix(')').unwrap_or(inner);
    let Some((ts_part, id_part)) = inner.split_once(':') else {
        return false;
    };

    // `1364481363.243` carries milliseconds after the dot
    let numeric = match ts_part.find('.') {
        Some(dot) => format!("{}{}", &ts_part[..dot], &ts_part[dot + 1..]),
        None => ts_part.trim().to_string(),
    };

    let timestamp = match parse_numeric_timestamp(&numeric) {
        Ok(ts) => format_canonical(&ts),
        Err(err) => {
            warn!(timestamp = %numeric, error = %err, "failed to parse msg timestamp");
            ts_part.trim().to_string()
        }
    };

    record.insert("msg_timestamp", timestamp);
    record.insert("msg_id", id_part.trim());
    true
}

fn strip_colon(value: &str) -> &str {
    value.strip_suffix(':').unwrap_or(value)
}
