use dnsforward_domain::{ConfigError, OverrideTable};
use std::path::Path;
use tracing::info;

/// Read a hosts-style override file. A missing or unreadable file is fatal.
pub fn load_override_file(path: impl AsRef<Path>) -> Result<OverrideTable, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::OverrideFile(path.display().to_string(), e.to_string()))?;

    let table = OverrideTable::parse(&text);
    info!(path = %path.display(), entries = table.len(), "Loaded local overrides");
    Ok(table)
}
