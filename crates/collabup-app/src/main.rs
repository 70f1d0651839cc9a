use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use collabup_app::app::{Collaborators, service};
use collabup_core::config::{DocumentBackend, Settings, load_config};
use collabup_db::db::DocumentStore;
use collabup_db::db::connection::{create_pool, run_migrations};
use collabup_db::db::memory::MemoryDocumentStore;
use collabup_db::db::postgres::PgDocumentStore;
use collabup_service::auth::{PathPolicy, build_identity_verifier};
use collabup_service::mail::build_mailer;
use collabup_service::storage::V4Signer;
use salvo::Listener;
use salvo::conn::TcpListener;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

async fn build_store(settings: &Settings) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match settings.database.backend {
        DocumentBackend::Postgres => {
            let url = settings
                .database
                .url
                .as_ref()
                .context("database.url is required for the postgres backend")?;

            run_migrations(url.expose()).await?;
            let pool = create_pool(
                url.expose(),
                u32::from(settings.database.max_connections),
            )
            .await?;

            tracing::info!("Database connection pool created.");
            Ok(Arc::new(PgDocumentStore::new(pool)))
        }
        DocumentBackend::Memory => {
            tracing::warn!("Using the in-memory document store; data is lost on restart");
            Ok(Arc::new(MemoryDocumentStore::new()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting CollabUp backend");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

    let collaborators = Collaborators {
        store: build_store(&config).await?,
        verifier: build_identity_verifier(&config.identity, http.clone())?,
        mailer: build_mailer(&config.mail, http)?,
        signer: Arc::new(V4Signer::from_config(&config.storage)?),
        policy: Arc::new(PathPolicy::default()),
    };

    let bind_addr = config.server.bind_addr();
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let service = service(Arc::new(config), collaborators);

    tracing::info!("Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(service).await;

    Ok(())
}
