use std::path::Path;

use ospfx_core::AnalysisConfig;

/// Load config from a TOML file, falling back to defaults for missing fields.
pub fn load(path: &Path) -> anyhow::Result<AnalysisConfig> {
    if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        let config: AnalysisConfig = toml::from_str(&contents)?;
        Ok(config)
    } else {
        Ok(AnalysisConfig::default())
    }
}

/// Save a config to a TOML file.
pub fn save(config: &AnalysisConfig, path: &Path) -> anyhow::Result<()> {
    let contents = toml::to_string_pretty(config)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}
