//! Session layer — per-user state, orchestration, and the HTTP surface.

pub mod manager;
pub mod routes;

pub use manager::{AnswerAdvance, BackNav, FlowSummary, QuestionView, SessionManager, UserSession};
pub use routes::session_routes;
