#![no_main]

use auditlog::{AuditParser, LineParser};
use libfuzzer_sys::fuzz_target;

const MAX_LINE_LEN: usize = 4096;

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_LINE_LEN {
        return;
    }
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(record) = AuditParser::new().parse_line(line) {
        let _ = record.to_json().to_string();
    }
});
