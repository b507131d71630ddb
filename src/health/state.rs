//! Node health state machine.
//!
//! # States
//! - Available: node is handed out by selection
//! - Broken: node is excluded from selection until a probe succeeds
//!
//! # State Transitions
//! ```text
//! Available → Broken: probe fails during a health cycle
//! Broken → Available: probe succeeds during a health cycle
//! ```
//!
//! There is no hysteresis: every cycle judges each node on its latest probe
//! alone, so a flapping node moves on every cycle it flips.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    Available,
    Broken,
}

impl NodeState {
    /// The state a node ends up in after a probe with the given outcome.
    pub fn after_probe(reachable: bool) -> Self {
        if reachable {
            NodeState::Available
        } else {
            NodeState::Broken
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeState::Available => "available",
            NodeState::Broken => "broken",
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
