//! `catalogod`: the vehicle catalogue server.
//!
//! Usage:
//!   catalogod -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/catalogo/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use catalogo_core::{Module, PageDefaults};
use clap::Parser;
use tracing::info;

use config::ServerConfig;

/// Vehicle catalogue server.
#[derive(Parser, Debug)]
#[command(name = "catalogod", about = "Vehicle catalogue server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides `[server] listen`).
    #[arg(long = "listen")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    bootstrap::verify_config(&server_config)?;

    let core_config = catalogo_core::ServiceConfig {
        data_dir: (!server_config.storage.data_dir.is_empty())
            .then(|| PathBuf::from(&server_config.storage.data_dir)),
        sqlite_path: server_config.storage.sqlite.as_ref().map(PathBuf::from),
        listen: cli.listen.unwrap_or_else(|| server_config.server.listen.clone()),
    };

    let sqlite_path = core_config.resolve_sqlite_path();
    if let Some(parent) = sqlite_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let sql: Arc<dyn catalogo_sql::SQLStore> = Arc::new(
        catalogo_sql::SqliteStore::open(&sqlite_path)
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );
    info!("SQLite database at {}", sqlite_path.display());

    let service = vehiculos::service::CatalogoService::new(sql)
        .map_err(|e| anyhow::anyhow!("failed to initialize catalogo service: {}", e))?;
    let settings = vehiculos::ApiSettings {
        app_name: server_config.app.name.clone(),
        page: PageDefaults {
            size: server_config.pagination.default_size,
            max_size: server_config.pagination.max_size,
        },
    };
    let vehiculos_module = vehiculos::VehiculosModule::new(service, settings);
    info!("Vehiculos module initialized, mounted at {}", vehiculos_module.mount_path());

    let module_routes = vec![(vehiculos_module.mount_path(), vehiculos_module.routes())];
    let app = routes::build_router(module_routes);

    let listener = tokio::net::TcpListener::bind(&core_config.listen).await?;
    info!("catalogod listening on {}", core_config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
