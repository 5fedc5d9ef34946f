//! Generic configuration parsing utilities.
//!
//! Reads a TOML file into any deserializable type, attaching the file path to
//! read and parse failures.
//!
//! Example error output:
//! ```text
//! Failed to parse config file: /etc/site/display.toml
//! Caused by:
//!     unknown variant `tokenized_label`, expected one of `reference`, `string`, `text`, `text_summary`
//! ```

use anyhow::{Context, Result};
use std::path::Path;

/// Parse a TOML configuration file into the specified type.
///
/// # Examples
///
/// ```rust,no_run
/// use token_formatters::config::{DisplayConfig, parse_config};
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let config: DisplayConfig = parse_config(Path::new("display.toml"))?;
/// println!("{} fields configured", config.fields.len());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, or does
/// not match the structure of `T`. Both cases carry the file path as context.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: T = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}
