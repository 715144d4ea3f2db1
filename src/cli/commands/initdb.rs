use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use std::path::Path;
use tracing::{debug, error, info, trace};

/// SQLite URLs get `mode=rwc` so the file is created on first use, and the
/// parent directory of the file is created. Other URLs are returned as-is.
fn prepare_database_url(database_url: &str) -> Result<String> {
    let Some(path) = database_url.strip_prefix("sqlite://") else {
        return Ok(database_url.to_string());
    };
    if path.contains('?') || path.contains(":memory:") {
        return Ok(database_url.to_string());
    }

    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        debug!("Creating database directory {}", parent.display());
        std::fs::create_dir_all(parent)?;
    }
    Ok(format!("{}?mode=rwc", database_url))
}

pub async fn init_database(database_url: &str) -> Result<()> {
    trace!("Entering init_database function");
    info!("Initializing database");
    debug!("Database URL: {}", database_url);

    let url = prepare_database_url(database_url)?;
    let db: DatabaseConnection = match Database::connect(&url).await {
        Ok(connection) => {
            info!("Successfully connected to database");
            connection
        }
        Err(e) => {
            error!("Failed to connect to database '{}': {}", database_url, e);
            return Err(e.into());
        }
    };

    info!("Running database migrations");
    match Migrator::up(&db, None).await {
        Ok(_) => {
            info!("Database migrations completed successfully");
        }
        Err(e) => {
            error!("Failed to run database migrations: {}", e);
            return Err(e.into());
        }
    }

    info!("Database initialization completed successfully!");
    Ok(())
}
