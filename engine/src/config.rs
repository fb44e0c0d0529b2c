use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Settings types check their own invariants before they are accepted
/// from or written to disk.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Loads a YAML config from `path`. A missing file yields the validated
/// default; an unreadable or invalid file is an error.
pub fn load_config<T>(path: &Path) -> Result<T, String>
where
    T: DeserializeOwned + Default + Validate,
{
    if !path.exists() {
        let config = T::default();
        config.validate()?;
        return Ok(config);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
    let config: T = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("Failed to deserialize config: {}", e))?;
    config
        .validate()
        .map_err(|e| format!("Config validation error: {}", e))?;
    Ok(config)
}

pub fn save_config<T>(path: &Path, config: &T) -> Result<(), String>
where
    T: Serialize + Validate,
{
    config
        .validate()
        .map_err(|e| format!("Config validation error: {}", e))?;
    let content = serde_yaml_ng::to_string(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(path, content)
        .map_err(|e| format!("Failed to write config {}: {}", path.display(), e))
}
