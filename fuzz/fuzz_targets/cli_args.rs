#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let mut args = Vec::new();
        args.push("nodebench".to_owned());
        for token in input.split_whitespace().take(64) {
            args.push(token.to_owned());
        }
        let _ = nodebench::fuzzing::parse_cli_args_input(args);
    }
});
