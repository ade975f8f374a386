//! Run-state machine for the top-level orchestrator
//!
//! One bulk operation at a time: a new operation is rejected while another
//! is running, enforced centrally rather than per call site.

use crate::errors::ConsoleError;

/// Orchestrator run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
}

impl RunState {
    /// Transition `Idle -> Running`; rejects while already running
    pub fn begin(&mut self) -> Result<(), ConsoleError> {
        match self {
            RunState::Idle => {
                *self = RunState::Running;
                Ok(())
            }
            RunState::Running => Err(ConsoleError::Busy),
        }
    }

    /// Transition back to `Idle`
    pub fn finish(&mut self) {
        *self = RunState::Idle;
    }

    pub fn is_running(&self) -> bool {
        *self == RunState::Running
    }
}
