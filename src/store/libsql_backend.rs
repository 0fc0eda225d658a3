//! libSQL backend — async `SessionStore` implementation.
//!
//! Supports local file and in-memory databases. Guidance results are
//! stored as a JSON column; a row that fails to decode is treated as lost
//! state ("no active session"), never as a fatal error.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::Language;
use crate::error::DatabaseError;
use crate::guidance::GuidanceResult;
use crate::store::migrations;
use crate::store::traits::{PersistedSession, SessionStore};

/// libSQL session store.
///
/// Holds a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlStore {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlStore {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let store = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run_migrations(&store.conn).await?;
        info!(path = %path.display(), "Session database opened");
        Ok(store)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let store = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run_migrations(&store.conn).await?;
        Ok(store)
    }
}

#[async_trait]
impl SessionStore for LibSqlStore {
    async fn load(&self, session_id: Uuid) -> Result<Option<PersistedSession>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT language, flow_id, guidance FROM sessions WHERE id = ?1",
                params![session_id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("load: {e}")))?;

        let row = match rows.next().await {
            Ok(Some(row)) => row,
            Ok(None) => return Ok(None),
            Err(e) => return Err(DatabaseError::Query(format!("load: {e}"))),
        };

        let language_str: String = row
            .get(0)
            .map_err(|e| DatabaseError::Query(format!("load language: {e}")))?;
        let Some(language) = Language::parse(&language_str) else {
            // An unreadable row is lost state, not a crash.
            warn!(session_id = %session_id, language = %language_str, "Dropping session with unknown language");
            return Ok(None);
        };

        // NULL columns read back as errors; both are optional fields.
        let flow_id: Option<String> = row.get(1).ok();

        let guidance_str: Option<String> = row.get(2).ok();
        let guidance = match guidance_str {
            Some(json) => match serde_json::from_str::<GuidanceResult>(&json) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!(session_id = %session_id, error = %e, "Dropping undecodable guidance result");
                    None
                }
            },
            None => None,
        };

        Ok(Some(PersistedSession {
            language,
            flow_id,
            guidance,
        }))
    }

    async fn save(
        &self,
        session_id: Uuid,
        session: &PersistedSession,
    ) -> Result<(), DatabaseError> {
        let guidance = match &session.guidance {
            Some(result) => Some(
                serde_json::to_string(result)
                    .map_err(|e| DatabaseError::Serialization(e.to_string()))?,
            ),
            None => None,
        };
        let now = Utc::now().to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO sessions (id, language, flow_id, guidance, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                     language = excluded.language,
                     flow_id = excluded.flow_id,
                     guidance = excluded.guidance,
                     updated_at = excluded.updated_at",
                params![
                    session_id.to_string(),
                    session.language.code(),
                    session.flow_id.clone(),
                    guidance,
                    now
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("save: {e}")))?;

        debug!(session_id = %session_id, "Session persisted");
        Ok(())
    }

    async fn clear(&self, session_id: Uuid) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "DELETE FROM sessions WHERE id = ?1",
                params![session_id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("clear: {e}")))?;

        debug!(session_id = %session_id, "Session cleared");
        Ok(())
    }
}
