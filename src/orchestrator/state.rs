//! Suite run state machine.
//!
//! The run lifecycle is an explicit state object owned by the orchestrator
//! instance, not a module-level flag. Transitions are validated so that a
//! bug in phase sequencing surfaces as an error instead of a silently
//! inconsistent state.

use serde::{Deserialize, Serialize};

/// Discrete states of a benchmark suite run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuiteState {
    /// No run started yet.
    Idle,
    /// Phases executing.
    Running,
    /// Run finished; a summary (possibly partial) exists.
    Completed,
    /// Unrecoverable orchestration error; no summary exists.
    Failed,
}

impl SuiteState {
    /// Human-readable state name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SuiteState::Idle => "idle",
            SuiteState::Running => "running",
            SuiteState::Completed => "completed",
            SuiteState::Failed => "failed",
        }
    }

    /// Valid transitions FROM this state. Completed and Failed allow a
    /// restart: the orchestrator instance is reusable between runs.
    pub fn valid_next_states(&self) -> &'static [SuiteState] {
        match self {
            SuiteState::Idle => &[SuiteState::Running],
            SuiteState::Running => &[SuiteState::Completed, SuiteState::Failed],
            SuiteState::Completed => &[SuiteState::Running],
            SuiteState::Failed => &[SuiteState::Running],
        }
    }

    /// Check whether a transition to `next` is legal.
    pub fn can_transition_to(&self, next: SuiteState) -> bool {
        self.valid_next_states().contains(&next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(SuiteState::Idle.can_transition_to(SuiteState::Running));
        assert!(SuiteState::Running.can_transition_to(SuiteState::Completed));
        assert!(SuiteState::Running.can_transition_to(SuiteState::Failed));
    }

    #[test]
    fn test_restart_transitions() {
        assert!(SuiteState::Completed.can_transition_to(SuiteState::Running));
        assert!(SuiteState::Failed.can_transition_to(SuiteState::Running));
    }

    #[test]
    fn test_illegal_transitions_rejected() {
        assert!(!SuiteState::Idle.can_transition_to(SuiteState::Completed));
        assert!(!SuiteState::Idle.can_transition_to(SuiteState::Failed));
        assert!(!SuiteState::Completed.can_transition_to(SuiteState::Failed));
        assert!(!SuiteState::Running.can_transition_to(SuiteState::Running));
    }

    #[test]
    fn test_state_names() {
        assert_eq!(SuiteState::Running.as_str(), "running");
        assert_eq!(SuiteState::Failed.as_str(), "failed");
    }
}
