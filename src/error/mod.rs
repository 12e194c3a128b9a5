mod app;
mod build;
mod config;
mod keyval;
mod pattern;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use build::BuildError;
pub use config::ConfigError;
pub use keyval::{KeyValError, KeyValErrorKind};
pub use pattern::PatternError;
pub use validation::{TargetViolation, ValidationError};
