// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed reconnect backoff schedule.
//!
//! The schedule favors fast recovery from transient blips (immediate first
//! retry) while bounding resource use under prolonged outages (the final
//! delay repeats indefinitely).

use std::time::Duration;

/// Delays between reconnect attempts, in milliseconds. The last entry
/// repeats for every attempt beyond the schedule.
pub const RECONNECT_DELAYS_MS: [u64; 5] = [0, 2000, 5000, 10000, 30000];

/// Delay to wait before reconnect attempt `attempt` (zero-based).
pub fn reconnect_delay(attempt: u32) -> Duration {
    let idx = (attempt as usize).min(RECONNECT_DELAYS_MS.len() - 1);
    Duration::from_millis(RECONNECT_DELAYS_MS[idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_matches_expected_sequence() {
        let expected = [0u64, 2000, 5000, 10000, 30000];
        for (attempt, ms) in expected.iter().enumerate() {
            assert_eq!(
                reconnect_delay(attempt as u32),
                Duration::from_millis(*ms),
                "attempt {attempt}"
            );
        }
    }

    #[test]
    fn final_delay_repeats() {
        assert_eq!(reconnect_delay(5), Duration::from_millis(30000));
        assert_eq!(reconnect_delay(17), Duration::from_millis(30000));
        assert_eq!(reconnect_delay(u32::MAX), Duration::from_millis(30000));
    }
}
