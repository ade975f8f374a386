//! Orchestration of the managed entities

pub mod demo;
pub mod group;
pub mod runstate;
pub mod top;

use std::time::Duration;

/// Where an operation was triggered from. Direct operator actions get the
/// per-entity busy guard; steps of a bulk operation skip it because the
/// bulk operation already holds exclusive control of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    UserInitiated,
    Orchestrated,
}

impl Origin {
    pub fn is_user(&self) -> bool {
        matches!(self, Origin::UserInitiated)
    }
}

/// Timing knobs for the orchestrators
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Delay before classifying statuses, letting in-flight state settle
    pub settle_delay: Duration,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(500),
        }
    }
}

impl OrchestratorOptions {
    /// Zero delays, for tests
    pub fn immediate() -> Self {
        Self {
            settle_delay: Duration::ZERO,
        }
    }
}
