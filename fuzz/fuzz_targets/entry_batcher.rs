#![no_main]

use std::io::Cursor;

use auditlog::readers::EntryBatcher;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let batch_size = (data[0] as usize % 16) + 1;
    let join = data[1] & 0x1 == 0x1;
    let text = String::from_utf8_lossy(&data[2..]).into_owned();

    let physical = text.lines().count();
    let mut entries = 0;
    for batch in EntryBatcher::new(Cursor::new(text.as_bytes()), batch_size, join) {
        let Ok(batch) = batch else {
            return;
        };
        assert!(!batch.is_empty() && batch.len() <= batch_size);
        entries += batch.len();
    }

    if !join {
        assert_eq!(entries, physical);
    }
});
