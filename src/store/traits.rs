//! `SessionStore` trait — load/save/clear for the durable session fields.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Language;
use crate::error::DatabaseError;
use crate::guidance::GuidanceResult;

/// The durable slice of a session.
///
/// Read back verbatim; the core attaches no meaning beyond routing. A
/// missing record means "no active session", never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub language: Language,
    pub flow_id: Option<String>,
    pub guidance: Option<GuidanceResult>,
}

impl PersistedSession {
    /// A fresh session that has only chosen a language.
    pub fn new(language: Language) -> Self {
        Self {
            language,
            flow_id: None,
            guidance: None,
        }
    }
}

/// Backend-agnostic session persistence.
///
/// Created when a session begins, updated at flow selection and guidance
/// delivery, cleared at restart.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, session_id: Uuid) -> Result<Option<PersistedSession>, DatabaseError>;

    async fn save(
        &self,
        session_id: Uuid,
        session: &PersistedSession,
    ) -> Result<(), DatabaseError>;

    async fn clear(&self, session_id: Uuid) -> Result<(), DatabaseError>;
}
