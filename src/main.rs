use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use archiva::{
    api::{create_router, AppState},
    application::{
        ledger::ContainerLedger,
        ports::{BlobStore, ContainerRepository, DocumentRepository},
        sweep::OrphanSweeper,
        use_cases::{
            CreateContainerUseCase, CreateDocumentUseCase, GetContainerUseCase,
            GetDocumentUseCase, PurgeDocumentUseCase, RestoreDocumentUseCase,
            ServeDocumentUseCase, TrashDocumentUseCase, UpdateContainerUseCase,
            UpdateDocumentUseCase,
        },
    },
    infrastructure::{
        persistence::{PostgresContainerRepository, PostgresDocumentRepository},
        storage::LocalBlobStore,
    },
    Config,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(true)
        .init();

    info!("Starting archiva document registry");

    let config = Config::from_env();
    config.validate()?;
    info!("Configuration loaded and validated");

    info!("Connecting to database");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            e
        })?;

    info!("Running database migrations");
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Infrastructure layer
    let documents: Arc<dyn DocumentRepository> =
        Arc::new(PostgresDocumentRepository::new(pool.clone()));
    let containers: Arc<dyn ContainerRepository> =
        Arc::new(PostgresContainerRepository::new(pool.clone()));

    let store = LocalBlobStore::new(config.storage_root.clone());
    store.init().await?;
    let blob_store: Arc<dyn BlobStore> = Arc::new(store);
    info!("Blob storage initialized at {:?}", config.storage_root);

    // Application layer
    let ledger = Arc::new(ContainerLedger::new(
        Arc::clone(&containers),
        config.capacity_max,
    ));

    let state = AppState {
        pool: Arc::new(pool),
        create_document: Arc::new(CreateDocumentUseCase::new(
            Arc::clone(&documents),
            Arc::clone(&ledger),
            Arc::clone(&blob_store),
        )),
        get_document: Arc::new(GetDocumentUseCase::new(Arc::clone(&documents))),
        update_document: Arc::new(UpdateDocumentUseCase::new(
            Arc::clone(&documents),
            Arc::clone(&ledger),
            Arc::clone(&blob_store),
        )),
        trash_document: Arc::new(TrashDocumentUseCase::new(
            Arc::clone(&documents),
            Arc::clone(&ledger),
        )),
        restore_document: Arc::new(RestoreDocumentUseCase::new(
            Arc::clone(&documents),
            Arc::clone(&ledger),
        )),
        purge_document: Arc::new(PurgeDocumentUseCase::new(
            Arc::clone(&documents),
            Arc::clone(&ledger),
            Arc::clone(&blob_store),
        )),
        serve_document: Arc::new(ServeDocumentUseCase::new(
            Arc::clone(&documents),
            Arc::clone(&blob_store),
        )),
        create_container: Arc::new(CreateContainerUseCase::new(
            Arc::clone(&containers),
            Arc::clone(&ledger),
        )),
        get_container: Arc::new(GetContainerUseCase::new(Arc::clone(&ledger))),
        update_container: Arc::new(UpdateContainerUseCase::new(
            Arc::clone(&containers),
            Arc::clone(&ledger),
        )),
        max_upload_bytes: config.max_upload_bytes,
    };

    // Background orphan sweep
    let sweeper = Arc::new(OrphanSweeper::new(
        Arc::clone(&documents),
        Arc::clone(&blob_store),
        Duration::from_secs(config.sweep_min_age_secs),
    ));
    sweeper.spawn(Duration::from_secs(config.sweep_interval_secs));
    info!(
        "Orphan sweep scheduled every {}s (min age {}s)",
        config.sweep_interval_secs, config.sweep_min_age_secs
    );

    let router = create_router(state);

    info!("Listening on {}", config.listen_addr);
    let listener = TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
