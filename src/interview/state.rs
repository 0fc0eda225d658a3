//! Interview session state — which flow, where in it, what was answered.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The user's recorded choices, keyed by question id.
///
/// Exactly one entry per question passed through; re-answering a question
/// overwrites its entry.
pub type AnswerSet = HashMap<String, String>;

/// Where a session is in its flow.
///
/// `InProgress` self-loops on answer/back; the final answer moves to
/// `Complete`, and nothing leaves `Complete` except starting a new flow.
/// "Not started" is the absence of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewPhase {
    InProgress,
    Complete,
}

/// A user's position in one flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSession {
    /// Which flow is active.
    pub flow_id: String,
    /// Current question index, 0-based, always within the flow's bounds.
    pub index: usize,
    /// Choices recorded so far.
    pub answers: AnswerSet,
    pub phase: InterviewPhase,
}

impl InterviewSession {
    /// Fresh session at the first question with nothing answered.
    pub fn new(flow_id: impl Into<String>) -> Self {
        Self {
            flow_id: flow_id.into(),
            index: 0,
            answers: AnswerSet::new(),
            phase: InterviewPhase::InProgress,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase == InterviewPhase::Complete
    }
}
