//! qualeval - sequential image-rating survey server
//!
//! Builds the evaluation catalog once from the image directory, wires the
//! configured record store, and serves navigation, submission, and
//! diagnostic endpoints.

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use qualeval::catalog::{self, Catalog};
use qualeval::config::{Args, StorageConfig};
use qualeval::{build_router, store, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting qualeval v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let items = catalog::build_catalog(
        &args.image_dir,
        &catalog::default_abbreviations(),
        &args.image_base_url,
    );
    let catalog = Catalog::new(items);
    if catalog.is_empty() {
        warn!(
            "No evaluation items found under {}; the survey will report an empty catalog",
            args.image_dir.display()
        );
    }

    let storage = StorageConfig::resolve(args.sqlite_path.as_deref());
    let record_store = store::connect(&storage).await?;

    let state = AppState::new(catalog, record_store);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    info!("qualeval listening on http://{}", args.listen);

    axum::serve(listener, app).await?;

    Ok(())
}
