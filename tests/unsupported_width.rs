//! Width-erased calls with a bad length must take the process down.
//!
//! The abort can't be observed in-process, so the test re-runs its own binary
//! with the offending call selected through an environment variable.
#![cfg(not(loom))]

use core::sync::atomic::AtomicU64;
use std::env;
use std::process::{Command, Stdio};

const CHILD_ENV: &str = "CONDSWAP_UNSUPPORTED_WIDTH_CHILD";

fn run_child_case(case: &str) {
    let (op, len) = case.split_once(':').expect("case is op:len");
    let len: usize = len.parse().expect("len is a number");

    let slot = AtomicU64::new(0);
    let addr = slot.as_ptr().cast::<u8>();
    unsafe {
        match op {
            "exchange" => condswap::raw::exchange(addr, 1, len),
            "compare_exchange" => condswap::raw::compare_exchange(addr, 0, 1, len),
            "add_return" => condswap::raw::add_return(addr, 1, len),
            other => panic!("unknown op {other}"),
        };
    }
}

fn spawn_case(case: &str) -> std::process::ExitStatus {
    Command::new(env::current_exe().expect("test binary path"))
        .args(["--exact", "unsupported_width_aborts", "--test-threads=1", "--nocapture"])
        .env(CHILD_ENV, case)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("failed to re-run test binary")
}

#[test]
fn unsupported_width_aborts() {
    if let Ok(case) = env::var(CHILD_ENV) {
        run_child_case(&case);
        // Reaching this point means the call went through; exit cleanly so the
        // parent sees a success and fails the assertion below.
        return;
    }

    for case in [
        "exchange:1",
        "exchange:2",
        "compare_exchange:3",
        "compare_exchange:16",
        "add_return:0",
        "add_return:6",
    ] {
        let status = spawn_case(case);
        assert!(!status.success(), "{case} returned instead of aborting");

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            const SIGABRT: i32 = 6;
            assert_eq!(status.signal(), Some(SIGABRT), "{case} did not abort: {status}");
        }
    }
}

#[test]
fn supported_widths_do_not_abort() {
    if env::var_os(CHILD_ENV).is_some() {
        return;
    }
    let slot = AtomicU64::new(0);
    let addr = slot.as_ptr().cast::<u8>();
    unsafe {
        assert_eq!(condswap::raw::add_return(addr, 3, 8), 3);
        assert_eq!(condswap::raw::exchange(addr, 9, 8), 3);
    }
    assert_eq!(condswap::Width::from_bytes(16).unwrap_err().bytes(), 16);
}
