//! oruko-rv (Review) - contributor batch review service
//!
//! HTTP backend for the internal review tool: batch listing and claiming,
//! per-submission review actions, and the externally-triggered lease sweeper.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use oruko_common::api::auth::load_shared_secret;
use oruko_common::config::{RootFolderInitializer, RootFolderResolver};
use oruko_common::db::init_database;
use oruko_rv::{build_router, AppState};

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "oruko-rv", about = "Oruko contributor review service")]
struct Args {
    /// Root folder holding the database and stored audio
    #[arg(long, env = "ORUKO_ROOT_FOLDER")]
    root_folder: Option<String>,

    /// Port to listen on
    #[arg(long, default_value_t = 5726)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Startup banner before any database work so failures are attributable
    info!("Starting Oruko Review (oruko-rv) v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let resolver =
        RootFolderResolver::new("review").with_cli_arg(args.root_folder.as_deref());
    let root_folder = resolver.resolve();

    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    // Shared secret guards the sweeper trigger and session minting
    let shared_secret = load_shared_secret(&pool).await?;
    if shared_secret == 0 {
        info!("Job authentication disabled (shared_secret = 0)");
    } else {
        info!("Loaded shared secret for job authentication");
    }

    let state = AppState::new(pool, shared_secret, initializer.audio_folder());
    let app = build_router(state);

    let addr = format!("127.0.0.1:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("oruko-rv listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
