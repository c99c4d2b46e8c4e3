//! Utility functions

use std::path::PathBuf;

/// App data directory (settings, logs)
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Categorias CRUD")
}

/// Cache directory for downloaded category images
pub fn get_cache_dir() -> PathBuf {
    get_data_dir().join("cache")
}
