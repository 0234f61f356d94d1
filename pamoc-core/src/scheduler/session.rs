//! Breathing session scheduler
//!
//! Tracks time within the current phase and drives the guidance state
//! machine. The caller decides how time passes: the blocking runner waits
//! for exactly [`BreathingSession::remaining_ms`], the async runner may
//! tick in smaller slices.

use crate::config::BreathingProtocol;
use crate::state::{BreathingCycle, GuidanceEvent, GuidanceState, Phase};

/// Breathing session scheduler
#[derive(Debug, Clone)]
pub struct BreathingSession {
    protocol: BreathingProtocol,
    state: GuidanceState,
    /// Time spent in the current phase (ms)
    phase_elapsed_ms: u32,
}

impl BreathingSession {
    /// Create an idle scheduler
    pub fn new(protocol: BreathingProtocol) -> Self {
        Self {
            protocol,
            state: GuidanceState::Idle,
            phase_elapsed_ms: 0,
        }
    }

    /// Current guidance state
    pub fn state(&self) -> GuidanceState {
        self.state
    }

    /// Check if a session is running
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Current position, if running
    pub fn cycle(&self) -> Option<BreathingCycle> {
        self.state.cycle()
    }

    /// Current phase, if running
    pub fn phase(&self) -> Option<Phase> {
        self.cycle().map(|c| c.phase)
    }

    /// Whether the motor should be on right now
    pub fn motor_command(&self) -> bool {
        self.state.motor_allowed()
    }

    /// Time left in the current phase (ms), 0 when idle
    pub fn remaining_ms(&self) -> u32 {
        self.phase()
            .map(|p| p.duration_ms(&self.protocol).saturating_sub(self.phase_elapsed_ms))
            .unwrap_or(0)
    }

    /// Start a session
    ///
    /// Returns the first cycle, or None if a session is already running
    /// or the protocol has no repetitions.
    pub fn start(&mut self) -> Option<BreathingCycle> {
        if self.state.is_active() {
            return None;
        }

        self.apply(GuidanceEvent::RateExceeded);
        self.phase_elapsed_ms = 0;
        self.cycle()
    }

    /// Abort the running session
    ///
    /// Returns true if a session was running.
    pub fn cancel(&mut self) -> bool {
        if !self.state.is_active() {
            return false;
        }
        self.apply(GuidanceEvent::Cancel);
        self.phase_elapsed_ms = 0;
        true
    }

    /// Update with elapsed time
    ///
    /// Advances at most one phase per call; time past the phase end is
    /// carried into the next phase. Returns the event applied, if any.
    pub fn tick(&mut self, elapsed_ms: u32) -> Option<GuidanceEvent> {
        let phase = self.phase()?;

        self.phase_elapsed_ms = self.phase_elapsed_ms.saturating_add(elapsed_ms);

        let duration = phase.duration_ms(&self.protocol);
        if self.phase_elapsed_ms < duration {
            return None;
        }

        self.phase_elapsed_ms -= duration;
        self.apply(GuidanceEvent::PhaseElapsed);
        if !self.state.is_active() {
            self.phase_elapsed_ms = 0;
        }
        Some(GuidanceEvent::PhaseElapsed)
    }

    fn apply(&mut self, event: GuidanceEvent) {
        self.state = self.state.transition(event, self.protocol.repetitions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn session() -> BreathingSession {
        BreathingSession::new(BreathingProtocol::default())
    }

    #[test]
    fn test_idle_by_default() {
        let sched = session();
        assert!(!sched.is_active());
        assert!(!sched.motor_command());
        assert_eq!(sched.remaining_ms(), 0);
    }

    #[test]
    fn test_start() {
        let mut sched = session();
        assert_eq!(sched.start(), Some(BreathingCycle::first()));
        assert!(sched.motor_command());
        assert_eq!(sched.remaining_ms(), 4000);

        // No re-entry while running
        assert_eq!(sched.start(), None);
    }

    #[test]
    fn test_tick_within_phase() {
        let mut sched = session();
        sched.start();

        assert_eq!(sched.tick(1500), None);
        assert_eq!(sched.remaining_ms(), 2500);
        assert_eq!(sched.phase(), Some(Phase::Inhale));
    }

    #[test]
    fn test_phase_boundary() {
        let mut sched = session();
        sched.start();

        assert_eq!(sched.tick(4000), Some(GuidanceEvent::PhaseElapsed));
        assert_eq!(sched.phase(), Some(Phase::Hold1));
        assert!(!sched.motor_command());
        assert_eq!(sched.remaining_ms(), 2000);
    }

    #[test]
    fn test_overshoot_carries() {
        let mut sched = session();
        sched.start();

        sched.tick(4500);
        assert_eq!(sched.phase(), Some(Phase::Hold1));
        assert_eq!(sched.remaining_ms(), 1500);
    }

    #[test]
    fn test_full_session_timing() {
        let mut sched = session();
        sched.start();

        let mut phases = 0;
        let mut total = 0;
        while sched.is_active() {
            let wait = sched.remaining_ms();
            assert!(wait > 0);
            sched.tick(wait);
            phases += 1;
            total += wait;
        }

        assert_eq!(phases, 40);
        assert_eq!(total, 120_000);
        assert_eq!(total, sched.protocol.session_ms());
        assert!(!sched.motor_command());
    }

    #[test]
    fn test_cancel() {
        let mut sched = session();
        assert!(!sched.cancel());

        sched.start();
        sched.tick(1000);
        assert!(sched.cancel());
        assert!(!sched.is_active());
        assert_eq!(sched.tick(5000), None);

        // A new session starts from the first repetition
        assert_eq!(sched.start(), Some(BreathingCycle::first()));
        assert_eq!(sched.remaining_ms(), 4000);
    }

    proptest! {
        #[test]
        fn prop_motor_follows_phase(ticks in proptest::collection::vec(1u32..3000, 1..200)) {
            let mut sched = session();
            sched.start();

            for t in ticks {
                sched.tick(t);
                let expected = matches!(sched.phase(), Some(Phase::Inhale | Phase::Exhale));
                prop_assert_eq!(sched.motor_command(), expected);
                if let Some(cycle) = sched.cycle() {
                    prop_assert!(cycle.repetition < 10);
                }
            }
        }
    }
}
