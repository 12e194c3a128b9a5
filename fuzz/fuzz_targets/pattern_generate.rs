#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(pattern) = std::str::from_utf8(data) {
        if let Some(generated) = barrage::fuzzing::compile_and_generate_input(pattern) {
            if let Ok(matcher) = regex::Regex::new(&format!("^(?:{pattern})$")) {
                debug_assert!(matcher.is_match(&generated));
            }
        }
    }
});
