use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use shared::config::client::Config;

/// Writes a default configuration file in the specified format.
///
/// # Arguments
/// * `format` - The format of the configuration file ("yaml" or "json").
/// * `dir` - Directory the file is written into.
///
/// # Errors
/// Returns an error if the format is unsupported or if writing the file fails.
pub fn generate_config(format: &str, dir: &Path) -> Result<()> {
    let config = Config::with_defaults();
    let (file_name, serialized) = match format {
        "yaml" => ("config.yaml", serde_yml::to_string(&config)?),
        "json" => ("config.json", serde_json::to_string_pretty(&config)?),
        _ => bail!("Unsupported format. Use 'yaml' or 'json'."),
    };

    let path = dir.join(file_name);
    let mut file = fs::File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(serialized.as_bytes())?;

    println!("Configuration file '{}' generated successfully.", path.display());
    Ok(())
}
