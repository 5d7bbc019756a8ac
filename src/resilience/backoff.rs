//! Cooldown and retry-pause arithmetic.

use std::time::Duration;

/// Upper bound for the cooldown multiplier.
pub const MAX_PENALTY_MULTIPLIER: u32 = 5;

/// Pause between attempts after a transport failure.
pub const DEFAULT_TRANSPORT_RETRY_DELAY: Duration = Duration::from_millis(400);

/// Linear backoff: `base * min(penalties, MAX_PENALTY_MULTIPLIER)`.
///
/// A penalty count of zero is treated as one so a fresh entry never gets an
/// empty cooldown.
pub fn cooldown_for(base: Duration, penalties: u32) -> Duration {
    base.saturating_mul(penalties.clamp(1, MAX_PENALTY_MULTIPLIER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_calculation() {
        let base = Duration::from_millis(10_000);

        assert_eq!(cooldown_for(base, 0), base);
        assert_eq!(cooldown_for(base, 1), base);
        assert_eq!(cooldown_for(base, 2), Duration::from_millis(20_000));
        assert_eq!(cooldown_for(base, 4), Duration::from_millis(40_000));
        assert_eq!(cooldown_for(base, 5), Duration::from_millis(50_000));
        assert_eq!(cooldown_for(base, 6), Duration::from_millis(50_000));
        assert_eq!(cooldown_for(base, u32::MAX), Duration::from_millis(50_000));
    }

    #[test]
    fn test_cooldown_saturates() {
        assert_eq!(cooldown_for(Duration::MAX, 5), Duration::MAX);
    }
}
