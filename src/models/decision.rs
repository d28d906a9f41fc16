//! Structured decision events emitted during route construction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a site was admitted to the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Skip,
}

/// Why a site passed or was skipped.
///
/// Rendered reasons come from a fixed vocabulary so consumers can match on
/// them: `"pass"`, `"gate failure"`, `"time-window failure"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionReason {
    /// Admission and feasibility both succeeded.
    Pass,
    /// The tail bound exceeded capacity.
    GateFailure,
    /// No insertion position satisfied every time window.
    TimeWindowFailure,
}

impl DecisionReason {
    /// The fixed vocabulary string for this reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionReason::Pass => "pass",
            DecisionReason::GateFailure => "gate failure",
            DecisionReason::TimeWindowFailure => "time-window failure",
        }
    }
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One per-site construction decision.
///
/// These events are the engine's only structured log output; consumers
/// render or assert on them.
///
/// # Examples
///
/// ```
/// use risk_routing::models::{DecisionEvent, DecisionReason, Verdict};
///
/// let event = DecisionEvent::new(3, Verdict::Skip, DecisionReason::GateFailure,
///     "bound 21.40 exceeds capacity 20.00".into());
/// assert_eq!(event.reason.as_str(), "gate failure");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionEvent {
    /// Site the decision concerns.
    pub site_id: usize,
    /// Pass or skip.
    pub verdict: Verdict,
    /// Fixed-vocabulary reason.
    pub reason: DecisionReason,
    /// Human-readable detail (bound vs. capacity, marginal distance, ...).
    pub detail: String,
}

impl DecisionEvent {
    /// Creates a new decision event.
    pub fn new(site_id: usize, verdict: Verdict, reason: DecisionReason, detail: String) -> Self {
        Self {
            site_id,
            verdict,
            reason,
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_vocabulary() {
        assert_eq!(DecisionReason::Pass.as_str(), "pass");
        assert_eq!(DecisionReason::GateFailure.as_str(), "gate failure");
        assert_eq!(DecisionReason::TimeWindowFailure.as_str(), "time-window failure");
    }

    #[test]
    fn test_reason_display_matches_vocabulary() {
        assert_eq!(DecisionReason::GateFailure.to_string(), "gate failure");
    }

    #[test]
    fn test_event_fields() {
        let event = DecisionEvent::new(1, Verdict::Pass, DecisionReason::Pass, "ok".into());
        assert_eq!(event.site_id, 1);
        assert_eq!(event.verdict, Verdict::Pass);
        assert_eq!(event.clone(), event);
    }
}
