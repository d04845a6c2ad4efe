#![no_main]

use std::time::{Duration, Instant};

use libfuzzer_sys::fuzz_target;

const SECONDS_PER_HOUR: u64 = 60 * 60;

/// Splits the input on the first `;` into interval hours and timeout seconds.
fn split_input(data: &[u8]) -> Option<(&str, &str)> {
    std::str::from_utf8(data).ok()?.split_once(';')
}

fuzz_target!(|data: &[u8]| {
    let Some((hours, timeout)) = split_input(data) else {
        return;
    };
    if let Ok((interval, benchmark_timeout)) =
        nodebench::fuzzing::agent_timings_input(hours, timeout)
    {
        assert!(interval >= Duration::from_secs(SECONDS_PER_HOUR));
        assert_eq!(interval.as_secs() % SECONDS_PER_HOUR, 0);
        assert!(Instant::now().checked_add(interval).is_some());
        assert!(benchmark_timeout >= Duration::from_secs(1));
    }
});
