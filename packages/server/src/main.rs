use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{Level, info};

use tradepost_common::storage::filesystem::FilesystemBlobStore;
use tradepost_common::storage::memory::MemoryBlobStore;
use tradepost_common::storage::BlobStore;
use tradepost_server::config::{AppConfig, StorageBackend};
use tradepost_server::state::AppState;
use tradepost_server::{build_router, database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = database::init_db(&config.database.url).await?;

    let blob_store: Arc<dyn BlobStore> = match config.storage.backend {
        StorageBackend::Filesystem => Arc::new(
            FilesystemBlobStore::new(
                config.storage.root_dir.clone(),
                &config.storage.public_base_url,
            )
            .await?,
        ),
        StorageBackend::Memory => Arc::new(MemoryBlobStore::new(&config.storage.public_base_url)),
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = AppState {
        db,
        blob_store,
        config,
    };
    let app = build_router(state);

    info!("Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
