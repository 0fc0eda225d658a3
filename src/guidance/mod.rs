//! Guidance — the request/response contract with the generation service.
//!
//! The core never generates content itself: it packages a completed answer
//! set into a `GuidanceRequest`, and validates whatever comes back into a
//! `GuidanceResult`. Responses are consumed whole or rejected whole.

pub mod model;
pub mod request;

pub use model::{GuidanceResult, OfficialLink};
pub use request::GuidanceRequest;
