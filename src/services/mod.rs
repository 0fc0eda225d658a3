//! External collaborators — generation and speech, behind trait seams.
//!
//! Both services are opaque request/response contracts over HTTP. The
//! traits exist so the session manager and tests never depend on the wire;
//! the `Http*` implementations are the only code that does.

pub mod generation;
pub mod speech;

pub use generation::{GenerationService, HttpGenerationService};
pub use speech::{HttpSpeechService, SpeechService};
