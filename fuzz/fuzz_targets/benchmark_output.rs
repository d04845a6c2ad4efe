#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = nodebench::fuzzing::parse_benchmark_output_input(data);
});
