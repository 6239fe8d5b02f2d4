//! A tiny stand-in hook binary, built only with `--features test-fakes`.
//!
//! Reads its behavior from environment variables rather than arguments,
//! since the executor invokes hooks with a fixed argv built from the
//! catalog: `FAKE_HOOK_STDOUT`, `FAKE_HOOK_STDERR`, `FAKE_HOOK_EXIT_CODE`,
//! `FAKE_HOOK_SLEEP_MS` (to exercise the timeout path).

use std::io::Write as _;

fn main() {
    if let Ok(millis) = std::env::var("FAKE_HOOK_SLEEP_MS") {
        if let Ok(millis) = millis.parse::<u64>() {
            std::thread::sleep(std::time::Duration::from_millis(millis));
        }
    }

    if let Ok(stdout) = std::env::var("FAKE_HOOK_STDOUT") {
        print!("{stdout}");
        let _ = std::io::stdout().flush();
    }
    if let Ok(stderr) = std::env::var("FAKE_HOOK_STDERR") {
        eprint!("{stderr}");
        let _ = std::io::stderr().flush();
    }

    let exit_code = std::env::var("FAKE_HOOK_EXIT_CODE").ok().and_then(|v| v.parse::<i32>().ok()).unwrap_or(0);
    std::process::exit(exit_code);
}
