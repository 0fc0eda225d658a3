//! Configuration types.

/// Service configuration.
///
/// Defaults suit local development; `main` overrides fields from
/// `CLEARPATH_*` environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address the HTTP server binds.
    pub bind_addr: String,
    /// Generation service endpoint.
    pub generation_url: String,
    /// Speech service endpoint.
    pub speech_url: String,
    /// Path of the session database.
    pub db_path: String,
    /// Catalog file override; the bundled catalog is used when unset.
    pub catalog_path: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            generation_url: "http://127.0.0.1:9100/api/generate-output".to_string(),
            speech_url: "http://127.0.0.1:9100/api/text-to-speech".to_string(),
            db_path: "./data/clearpath.db".to_string(),
            catalog_path: None,
        }
    }
}
