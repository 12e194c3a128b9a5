//! Thin wrappers exposing internal grammars to the fuzz targets. Only
//! compiled with the `fuzzing` feature; never part of the normal build.
use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::parse_duration_value;
use crate::error::{AppError, AppResult, KeyValError};
use crate::keyval::parse_key_val_string;
use crate::pattern::CompiledPattern;

/// Parses a key-value string with the header delimiters (`,` / `:`).
///
/// # Errors
///
/// Returns an error when the input does not satisfy the grammar.
pub fn parse_key_val_input(input: &str) -> Result<BTreeMap<String, String>, KeyValError> {
    parse_key_val_string(input, ',', ':')
}

/// Parses a duration value such as `10s` or `500ms`.
///
/// # Errors
///
/// Returns an error when the duration is invalid.
pub fn parse_duration_input(input: &str) -> AppResult<Duration> {
    parse_duration_value(input).map_err(AppError::validation)
}

/// Compiles a pattern and, when it compiles, generates one matching
/// string from it.
#[must_use]
pub fn compile_and_generate_input(pattern: &str) -> Option<String> {
    CompiledPattern::compile(pattern)
        .ok()
        .map(|compiled| compiled.generate(&mut rand::thread_rng()))
}
