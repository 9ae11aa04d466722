//! Health-driven phase state machine.

use smallvec::SmallVec;

/// Tracks the current phase against descending health-fraction thresholds.
///
/// Advances at most one phase per [`PhaseTracker::check`] call, so a hit that
/// crosses several thresholds resolves over consecutive ticks.
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    phase: u8,
    max_phases: u8,
    thresholds: SmallVec<[f32; 4]>,
}

impl PhaseTracker {
    pub fn new(max_phases: u8, thresholds: &[f32]) -> Self {
        Self {
            phase: 1,
            max_phases: max_phases.max(1),
            thresholds: SmallVec::from_slice(thresholds),
        }
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }

    pub fn max_phases(&self) -> u8 {
        self.max_phases
    }

    pub fn thresholds(&self) -> &[f32] {
        &self.thresholds
    }

    pub fn is_final(&self) -> bool {
        self.phase >= self.max_phases
    }

    /// Threshold that ends the current phase, if any.
    pub fn next_threshold(&self) -> Option<f32> {
        if self.is_final() {
            return None;
        }
        self.thresholds.get(usize::from(self.phase - 1)).copied()
    }

    /// Compare `health_fraction` against the next threshold and advance by one
    /// phase if it has been reached. Returns the new phase on transition.
    pub fn check(&mut self, health_fraction: f32) -> Option<u8> {
        let threshold = self.next_threshold()?;
        if health_fraction <= threshold {
            self.phase += 1;
            Some(self.phase)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_check_advances_one_phase() {
        let mut tracker = PhaseTracker::new(3, &[0.7, 0.4]);
        // 30% in one go crosses both thresholds, but only one phase per check
        assert_eq!(tracker.check(0.3), Some(2));
        assert_eq!(tracker.phase(), 2);
        assert_eq!(tracker.check(0.3), Some(3));
        assert_eq!(tracker.check(0.0), None);
        assert_eq!(tracker.phase(), 3);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut tracker = PhaseTracker::new(3, &[0.7, 0.4]);
        assert_eq!(tracker.check(0.71), None);
        assert_eq!(tracker.check(0.7), Some(2));
    }

    #[test]
    fn test_phase_never_exceeds_max() {
        let mut tracker = PhaseTracker::new(2, &[0.5]);
        for _ in 0..10 {
            tracker.check(0.0);
        }
        assert_eq!(tracker.phase(), 2);
        assert!(tracker.is_final());
        assert_eq!(tracker.next_threshold(), None);
    }

    #[test]
    fn test_missing_thresholds_hold_phase() {
        // Malformed input: more phases than thresholds. Stays put instead of panicking.
        let mut tracker = PhaseTracker::new(3, &[0.5]);
        assert_eq!(tracker.check(0.1), Some(2));
        assert_eq!(tracker.check(0.0), None);
        assert_eq!(tracker.phase(), 2);
    }
}
