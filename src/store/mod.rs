//! Persistence layer — the durable session boundary.
//!
//! Only three fields survive page transitions: the chosen language, the
//! active flow id, and the final guidance result. Everything else (the
//! in-interview position, artifacts in flight, the active tab) is
//! per-process state that is rebuilt or restarted.

pub mod libsql_backend;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlStore;
pub use traits::{PersistedSession, SessionStore};
