//! Candidate id source for the registration flow.
//!
//! Injected so the generate→check→insert retry loop in
//! [`crate::domain::AccountService`] is deterministic under test.

#[cfg(test)]
use mockall::automock;
use rand::Rng;

use crate::domain::user::{GENERATED_ID_MAX, GENERATED_ID_MIN};

/// Source of candidate user ids.
#[cfg_attr(test, automock)]
pub trait UserIdSampler: Send + Sync {
    /// Draw one candidate id in the eight-digit range.
    fn sample(&self) -> i32;
}

/// Thread-rng backed sampler used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngUserIdSampler;

impl UserIdSampler for ThreadRngUserIdSampler {
    fn sample(&self) -> i32 {
        rand::thread_rng().gen_range(GENERATED_ID_MIN..=GENERATED_ID_MAX)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn samples_stay_in_the_eight_digit_range() {
        let sampler = ThreadRngUserIdSampler;
        for _ in 0..64 {
            let candidate = sampler.sample();
            assert!((GENERATED_ID_MIN..=GENERATED_ID_MAX).contains(&candidate));
        }
    }
}
