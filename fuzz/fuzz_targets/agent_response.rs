#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(entries) = nodebench::fuzzing::merge_agent_response_input(data) {
        debug_assert!(entries < usize::MAX);
    }
});
