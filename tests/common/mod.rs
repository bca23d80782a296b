// tests/common/mod.rs
// Shared test utilities for integration tests
#![allow(dead_code)]

use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::NamedTempFile;

pub const SYSCALL_LINE: &str = "type=SYSCALL msg=audit(1364481363.243:24287): arch=c000003e syscall=2 success=no exit=-13 a0=7fffd19c5592 a1=0    a2=7fffd19c4b50";
pub const CWD_LINE: &str = "type=CWD msg='op=PAM:secret test1=\"a\" res=success'";
pub const CWD_CONTINUATION: &str = "\t\t\t\t\tcwd=\"/home/shadowman\" ";
pub const PATH_LINE: &str = "type=PATH msg=audit(1364481363.243:24287): item=0 name=\"/etc/ssh/sshd_config\" inode=409248 dev=fd:00 dev=system_u:object_r:etc_t:s0";

fn binary_path() -> &'static str {
    env!("CARGO_BIN_EXE_auditlog")
}

/// Run auditlog with given arguments and input via stdin
pub fn run_auditlog_with_input(args: &[&str], input: &str) -> (String, String, i32) {
    let mut cmd = Command::new(binary_path())
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start auditlog");

    if let Some(mut stdin) = cmd.stdin.take() {
        // The binary may exit before reading stdin (e.g. on a config error).
        if let Err(e) = stdin.write_all(input.as_bytes()) {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                panic!("Failed to write to stdin: {e:?}");
            }
        }
    }

    let output = cmd.wait_with_output().expect("Failed to read output");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Run auditlog with a temporary input file holding `file_content`
pub fn run_auditlog_with_file(args: &[&str], file_content: &[u8]) -> (String, String, i32) {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file
        .write_all(file_content)
        .expect("Failed to write to temp file");
    temp_file.flush().expect("Failed to flush temp file");

    let mut full_args = args.to_vec();
    full_args.push(temp_file.path().to_str().unwrap());
    run_auditlog_with_input(&full_args, "")
}

/// Parse stdout as JSON lines
pub fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("Output line should be valid JSON"))
        .collect()
}

/// Extract a counter such as "parsed" or "skipped" from the --stats summary
pub fn extract_stat(stderr: &str, label: &str) -> Option<usize> {
    let line = stderr.lines().find(|line| line.contains("Lines processed:"))?;
    line.split(", ").find_map(|part| {
        let part = part.trim_start_matches("Lines processed: ");
        let (count, rest) = part.split_once(' ')?;
        rest.starts_with(label).then(|| count.parse().ok()).flatten()
    })
}
