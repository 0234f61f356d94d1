//! State machine definition
//!
//! Motor output and the displayed instruction are a function of the
//! current state alone.

use super::events::GuidanceEvent;
use crate::config::BreathingProtocol;

/// One timed step of a repetition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Breathe in, motor on
    Inhale,
    /// Hold after inhaling, motor off
    Hold1,
    /// Breathe out, motor on
    Exhale,
    /// Hold after exhaling, motor off
    Hold2,
}

impl Phase {
    /// Phases of one repetition, in execution order
    pub const SEQUENCE: [Phase; 4] = [Phase::Inhale, Phase::Hold1, Phase::Exhale, Phase::Hold2];

    /// Following phase within the same repetition
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Inhale => Some(Phase::Hold1),
            Phase::Hold1 => Some(Phase::Exhale),
            Phase::Exhale => Some(Phase::Hold2),
            Phase::Hold2 => None,
        }
    }

    /// Whether the motor vibrates during this phase
    pub fn motor_on(self) -> bool {
        matches!(self, Phase::Inhale | Phase::Exhale)
    }

    /// Instruction shown to the wearer
    pub fn label(self) -> &'static str {
        match self {
            Phase::Inhale => "Inhale",
            Phase::Hold1 | Phase::Hold2 => "Hold",
            Phase::Exhale => "Exhale",
        }
    }

    /// Phase duration under a protocol (ms)
    pub fn duration_ms(self, protocol: &BreathingProtocol) -> u32 {
        match self {
            Phase::Inhale => protocol.inhale_ms,
            Phase::Hold1 | Phase::Hold2 => protocol.hold_ms,
            Phase::Exhale => protocol.exhale_ms,
        }
    }
}

/// Position within an active session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BreathingCycle {
    /// Current phase
    pub phase: Phase,
    /// Repetition index, 0-based
    pub repetition: u8,
}

impl BreathingCycle {
    /// First phase of a fresh session
    pub const fn first() -> Self {
        Self {
            phase: Phase::Inhale,
            repetition: 0,
        }
    }
}

/// Guidance states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GuidanceState {
    /// No session; sensors are polled normally
    #[default]
    Idle,
    /// Session in progress
    Active(BreathingCycle),
}

impl GuidanceState {
    /// Check if a session is running
    pub fn is_active(&self) -> bool {
        matches!(self, GuidanceState::Active(_))
    }

    /// Check if this state drives the motor
    pub fn motor_allowed(&self) -> bool {
        match self {
            GuidanceState::Active(cycle) => cycle.phase.motor_on(),
            GuidanceState::Idle => false,
        }
    }

    /// Current cycle position, if active
    pub fn cycle(&self) -> Option<BreathingCycle> {
        match self {
            GuidanceState::Active(cycle) => Some(*cycle),
            GuidanceState::Idle => None,
        }
    }

    /// Process an event and return the next state
    ///
    /// `repetitions` is the session length; after the last `Hold2` the
    /// machine returns to `Idle`.
    pub fn transition(self, event: GuidanceEvent, repetitions: u8) -> Self {
        use GuidanceEvent::*;
        use GuidanceState::*;

        match (self, event) {
            // Entry: repetition index always restarts at 0
            (Idle, RateExceeded) if repetitions > 0 => Active(BreathingCycle::first()),

            (Active(cycle), PhaseElapsed) => match cycle.phase.next() {
                Some(phase) => Active(BreathingCycle { phase, ..cycle }),
                None if cycle.repetition + 1 < repetitions => Active(BreathingCycle {
                    phase: Phase::Inhale,
                    repetition: cycle.repetition + 1,
                }),
                None => Idle,
            },

            (Active(_), Cancel) => Idle,

            // Default: stay in current state (no re-entry while active)
            _ => self,
        }
    }
}
