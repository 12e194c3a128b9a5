#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(parsed) = barrage::fuzzing::parse_key_val_input(input) {
            debug_assert!(!parsed.is_empty());
            for (key, value) in &parsed {
                debug_assert_eq!(key, key.trim());
                debug_assert_eq!(value, value.trim());
                debug_assert!(!key.is_empty());
                debug_assert!(!value.is_empty());
            }
        }
    }
});
