//! Elidune Desk - console library management

use std::io;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use elidune_desk::{config::AppConfig, console::Console, Library};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Logs go to stderr so they do not interleave with the menus
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("elidune_desk={}", config.logging.level).into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }

    tracing::info!("Starting Elidune Desk v{}", env!("CARGO_PKG_VERSION"));

    let backend = config.storage.backend();
    let mut library = Library::open(&backend).context("Failed to open storage")?;
    tracing::info!("Using {:?} storage", backend);

    if config.bootstrap.enabled {
        library
            .ensure_admin(&config.bootstrap.admin_login, &config.bootstrap.admin_password)
            .context("Failed to create administrator account")?;
    }

    let stdin = io::stdin();
    Console::new(&mut library, stdin.lock(), io::stdout()).run()?;

    Ok(())
}
