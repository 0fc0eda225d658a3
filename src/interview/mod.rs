//! Guided interview — session state and the flow engine.
//!
//! The engine walks a user through one flow's questions in order, records
//! their choices, and reports completion. It is pure over an
//! `InterviewSession` value so the whole state machine is testable without
//! I/O; persistence and HTTP live elsewhere.

pub mod engine;
pub mod state;

pub use engine::{AnswerOutcome, BackOutcome, FlowEngine};
pub use state::{AnswerSet, InterviewPhase, InterviewSession};
