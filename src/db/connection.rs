use rusqlite::Connection;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use crate::db::migrations::MigrationManager;

/// Name of the per-user data directory
const DATA_DIR: &str = ".mmboard";

/// Database connection manager
pub struct DbConnection;

impl DbConnection {
    /// Home directory, preferring `dirs` and falling back to `$HOME`
    fn home_dir() -> PathBuf {
        dirs::home_dir()
            .or_else(|| std::env::var_os("HOME").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the default database path
    pub fn default_path() -> PathBuf {
        Self::home_dir().join(DATA_DIR).join("board.db")
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        Self::home_dir().join(DATA_DIR).join("rc")
    }

    /// Get database path from configuration file or default
    pub fn resolve_path() -> Result<PathBuf> {
        let config_path = Self::config_path();
        Ok(Self::location_from_config(&config_path)?.unwrap_or_else(Self::default_path))
    }

    /// Read `data.location=` from an rc file.
    /// Relative paths resolve against the rc file's directory.
    pub fn location_from_config(config_path: &Path) -> Result<Option<PathBuf>> {
        if !config_path.exists() {
            return Ok(None);
        }

        let config = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        for line in config.lines() {
            let line = line.trim();
            if let Some(path_str) = line.strip_prefix("data.location=") {
                let path = PathBuf::from(path_str.trim());
                if path.is_relative() {
                    let base = config_path.parent().unwrap_or_else(|| Path::new("."));
                    return Ok(Some(base.join(path)));
                }
                return Ok(Some(path));
            }
        }

        Ok(None)
    }

    /// Connect to the database, creating it and parent directories if needed
    pub fn connect() -> Result<Connection> {
        let db_path = Self::resolve_path()?;
        Self::connect_at(&db_path)
    }

    /// Connect to a database file at an explicit path
    pub fn connect_at(db_path: &Path) -> Result<Connection> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database: {}", db_path.display()))?;
        log::debug!("opened board database at {}", db_path.display());

        MigrationManager::initialize(&conn)
            .context("Failed to initialize database schema")?;

        Ok(conn)
    }

    /// Connect to an in-memory database (for testing)
    pub fn connect_in_memory() -> Result<Connection> {
        let conn = Connection::open_in_memory()
            .context("Failed to open in-memory database")?;

        MigrationManager::initialize(&conn)
            .context("Failed to initialize database schema")?;

        Ok(conn)
    }
}
