use std::sync::atomic::{AtomicU64, Ordering};

/// Shared unit-of-work countdown for one target's worker pool.
///
/// Claiming is a single compare-exchange loop, so a unit is never handed
/// out twice and the pool issues exactly the configured number of
/// attempts no matter how many workers race on it.
#[derive(Debug)]
pub struct RemainingCounter {
    remaining: AtomicU64,
}

impl RemainingCounter {
    #[must_use]
    pub const fn new(count: u64) -> Self {
        Self {
            remaining: AtomicU64::new(count),
        }
    }

    /// Claims one unit of work. Returns `false` once the count is
    /// exhausted.
    pub fn claim(&self) -> bool {
        loop {
            let current = self.remaining.load(Ordering::Relaxed);
            let Some(next) = current.checked_sub(1) else {
                return false;
            };
            if self
                .remaining
                .compare_exchange(current, next, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                return true;
            }
        }
    }

    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.remaining.load(Ordering::Relaxed)
    }
}
