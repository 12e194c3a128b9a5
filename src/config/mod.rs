//! Target configuration: types, duration grammar, validation, file loading.
mod loader;
mod parse;
pub mod types;
mod validate;


pub use loader::load_config;
pub use validate::{MIN_TIMEOUT, validate};

#[cfg(test)]
pub(crate) use loader::load_config_file;
pub(crate) use parse::parse_duration_value;
