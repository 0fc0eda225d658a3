use std::path::Path;
use std::sync::Arc;

use clearpath::catalog::Catalog;
use clearpath::config::ServiceConfig;
use clearpath::services::{HttpGenerationService, HttpSpeechService};
use clearpath::session::manager::SessionManager;
use clearpath::session::routes::{SessionRouteState, session_routes};
use clearpath::store::{LibSqlStore, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut config = ServiceConfig::default();
    if let Ok(bind) = std::env::var("CLEARPATH_BIND") {
        config.bind_addr = bind;
    }
    if let Ok(url) = std::env::var("CLEARPATH_GENERATION_URL") {
        config.generation_url = url;
    }
    if let Ok(url) = std::env::var("CLEARPATH_SPEECH_URL") {
        config.speech_url = url;
    }
    if let Ok(path) = std::env::var("CLEARPATH_DB_PATH") {
        config.db_path = path;
    }
    if let Ok(path) = std::env::var("CLEARPATH_CATALOG_PATH") {
        config.catalog_path = Some(path);
    }
    let service_token = std::env::var("CLEARPATH_SERVICE_TOKEN")
        .ok()
        .map(secrecy::SecretString::from);

    eprintln!("🧭 ClearPath v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://{}/api/sessions", config.bind_addr);
    eprintln!("   Generation: {}", config.generation_url);
    eprintln!("   Speech: {}", config.speech_url);

    // ── Catalog ─────────────────────────────────────────────────────────
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_file(Path::new(path)),
        None => Catalog::bundled(),
    }
    .unwrap_or_else(|e| {
        eprintln!("Error: Invalid flow catalog: {e}");
        std::process::exit(1);
    });
    eprintln!(
        "   Catalog: {} ({} flows)",
        config.catalog_path.as_deref().unwrap_or("bundled"),
        catalog.flows().len()
    );

    // ── Database ────────────────────────────────────────────────────────
    let store: Arc<dyn SessionStore> = Arc::new(
        LibSqlStore::new_local(Path::new(&config.db_path))
            .await
            .unwrap_or_else(|e| {
                eprintln!("Error: Failed to open database at {}: {}", config.db_path, e);
                std::process::exit(1);
            }),
    );
    eprintln!("   Database: {}", config.db_path);

    // ── External services ───────────────────────────────────────────────
    let generation = Arc::new(HttpGenerationService::new(
        config.generation_url.clone(),
        service_token.clone(),
    ));
    let speech = Arc::new(HttpSpeechService::new(
        config.speech_url.clone(),
        service_token,
    ));

    let manager = Arc::new(SessionManager::new(
        Arc::new(catalog),
        store,
        generation,
        speech,
    ));

    let app = session_routes(SessionRouteState { manager })
        .layer(tower_http::cors::CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "ClearPath listening");
    axum::serve(listener, app).await?;

    Ok(())
}
