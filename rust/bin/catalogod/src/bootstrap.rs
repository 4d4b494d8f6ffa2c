//! Bootstrap: refuse to start on a configuration that cannot work.

use crate::config::ServerConfig;

/// Verify server configuration before opening any storage.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.storage.data_dir.is_empty() && config.storage.sqlite.is_none() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    let name = &config.app.name;
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        anyhow::bail!(
            "App name '{}' must be non-empty and use only letters, digits, '-' or '_'.",
            name
        );
    }
    let page = &config.pagination;
    if page.default_size == 0 || page.max_size == 0 {
        anyhow::bail!("Pagination sizes must be positive.");
    }
    if page.default_size > page.max_size {
        anyhow::bail!(
            "Pagination default_size {} exceeds max_size {}.",
            page.default_size,
            page.max_size
        );
    }
    Ok(())
}
