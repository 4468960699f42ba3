//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Calculate the delay before the next attempt: base * 2^(attempt-1),
/// capped, with up to 10% jitter added.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    // Apply jitter (0 to 10% of the delay)
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let b1 = calculate_backoff(1, 1000, 8000);
        assert!(b1.as_millis() >= 1000);

        let b2 = calculate_backoff(2, 1000, 8000);
        assert!(b2.as_millis() >= 2000);

        let b3 = calculate_backoff(3, 1000, 8000);
        assert!(b3.as_millis() >= 4000);
    }

    #[test]
    fn test_backoff_capped_at_max() {
        let capped = calculate_backoff(10, 1000, 8000);
        assert!(capped.as_millis() >= 8000);
        assert!(capped.as_millis() < 8000 + 800 + 1);
    }

    #[test]
    fn test_zero_attempt_is_immediate() {
        assert_eq!(calculate_backoff(0, 1000, 8000), Duration::from_millis(0));
    }
}
