use thiserror::Error;

/// One rule violation found while validating a target, tagged with the
/// position and URL of the offending target.
#[derive(Debug, Error, Clone)]
#[error("target {index} '{url}': {reason}")]
pub struct TargetViolation {
    pub index: usize,
    pub url: String,
    #[source]
    pub reason: ValidationError,
}

#[derive(Debug, Error, Clone)]
pub enum ValidationError {
    #[error("No targets to test.")]
    NoTargets,
    #[error("Count must be >= 1.")]
    CountZero,
    #[error("Concurrency must be >= 1.")]
    ConcurrencyZero,
    #[error("Concurrency ({concurrency}) must not exceed count ({count}).")]
    ConcurrencyExceedsCount { concurrency: u64, count: u64 },
    #[error("Method must not be empty.")]
    MethodEmpty,
    #[error("Timeout '{value}' is below the one-second minimum.")]
    TimeoutBelowMinimum { value: String },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("{}", render_violations(.0))]
    InvalidTargets(Vec<TargetViolation>),
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}

fn render_violations(violations: &[TargetViolation]) -> String {
    let mut lines = Vec::with_capacity(violations.len().saturating_add(1));
    lines.push(format!("{} invalid target value(s):", violations.len()));
    for violation in violations {
        lines.push(format!("  - {violation}"));
    }
    lines.join("\n")
}
