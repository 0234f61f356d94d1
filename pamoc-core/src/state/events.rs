//! Events that trigger guidance state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GuidanceEvent {
    /// Heart rate observed above the threshold at the top of an iteration
    RateExceeded,
    /// The armed phase duration has been consumed
    PhaseElapsed,
    /// Session abort requested (only issued under a cancellable policy)
    Cancel,
}
