use std::time::Duration;

use crate::error::{TargetViolation, ValidationError};

use super::parse::parse_duration_value;
use super::types::{StressConfig, Target};

/// Floor for per-request timeouts. Anything shorter is rejected as
/// meaningless for an HTTP round trip.
pub const MIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Checks every structural rule across the whole target list, collecting
/// all violations instead of stopping at the first. Runs to completion
/// before any traffic is sent; a failure here aborts the run.
///
/// # Errors
///
/// Returns [`ValidationError::NoTargets`] for an empty list, or
/// [`ValidationError::InvalidTargets`] carrying one entry per violated
/// rule with the offending target's position and URL.
pub fn validate(config: &StressConfig) -> Result<(), ValidationError> {
    if config.targets.is_empty() {
        return Err(ValidationError::NoTargets);
    }

    let mut violations = Vec::new();
    for (index, target) in config.targets.iter().enumerate() {
        collect_target_violations(index, target, &mut violations);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::InvalidTargets(violations))
    }
}

fn collect_target_violations(
    index: usize,
    target: &Target,
    violations: &mut Vec<TargetViolation>,
) {
    let mut push = |reason: ValidationError| {
        violations.push(TargetViolation {
            index,
            url: target.url.clone(),
            reason,
        });
    };

    if target.count == 0 {
        push(ValidationError::CountZero);
    }
    if target.concurrency == 0 {
        push(ValidationError::ConcurrencyZero);
    }
    if target.concurrency > target.count {
        push(ValidationError::ConcurrencyExceedsCount {
            concurrency: target.concurrency,
            count: target.count,
        });
    }
    if target.method.is_empty() {
        push(ValidationError::MethodEmpty);
    }
    if !target.timeout.is_empty() {
        match parse_duration_value(&target.timeout) {
            Ok(timeout) if timeout < MIN_TIMEOUT => {
                push(ValidationError::TimeoutBelowMinimum {
                    value: target.timeout.clone(),
                });
            }
            Ok(_) => {}
            Err(reason) => push(reason),
        }
    }
}
