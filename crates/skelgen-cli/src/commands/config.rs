//! `skelgen config`: read and write configuration values.

use std::path::{Path, PathBuf};

use crate::{
    cli::ConfigCommands,
    config::{AppConfig, KEYS},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Keys holding booleans; everything else is stored as a string.
const BOOL_KEYS: &[&str] = &["generation.force", "output.no_color"];

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    config_file: Option<PathBuf>,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let path = AppConfig::target_path(config_file.as_ref());

    match cmd {
        ConfigCommands::Get { key } => {
            let value = config.get(&key).ok_or_else(|| unknown_key(&key))?;
            output.emit(&format!("{value}\n"))?;
        }

        ConfigCommands::Set { key, value } => {
            set_value(&path, &key, &value)?;
            output.success(&format!("Set {key} = {value} in {}", path.display()))?;
        }

        ConfigCommands::List => {
            if output.is_json() {
                output.json(&config)?;
            } else {
                let serialised = toml::to_string_pretty(&config)
                    .with_cli_context(|| "Failed to serialise config")?;
                output.header("Current Configuration:")?;
                output.print(&serialised)?;
            }
        }

        ConfigCommands::Path => {
            output.emit(&format!("{}\n", path.display()))?;
        }

        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::AlreadyExists { path });
            }
            let text = toml::to_string_pretty(&AppConfig::default())
                .with_cli_context(|| "Failed to serialise default config")?;
            write(&path, &text)?;
            output.success(&format!("Configuration created at {}", path.display()))?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn unknown_key(key: &str) -> CliError {
    CliError::ConfigError {
        message: format!("Unknown config key: '{key}'"),
        source: None,
    }
}

/// Update one key in the file at `path`, keeping everything else.
fn set_value(path: &Path, key: &str, value: &str) -> CliResult<()> {
    if !KEYS.contains(&key) {
        return Err(unknown_key(key));
    }

    let mut document: toml::Table = if path.exists() {
        let text = std::fs::read_to_string(path)
            .with_cli_context(|| format!("Failed to read {}", path.display()))?;
        text.parse().map_err(|e: toml::de::Error| CliError::ConfigError {
            message: format!("{} is not valid TOML", path.display()),
            source: Some(Box::new(e)),
        })?
    } else {
        toml::Table::new()
    };

    let value = parse_value(key, value)?;
    let (section, field) = key.split_once('.').ok_or_else(|| unknown_key(key))?;
    let table = document
        .entry(section)
        .or_insert(toml::Value::Table(toml::Table::new()));
    let toml::Value::Table(table) = table else {
        return Err(CliError::ConfigError {
            message: format!("'{section}' in {} is not a table", path.display()),
            source: None,
        });
    };
    table.insert(field.to_string(), value);

    let text = toml::to_string_pretty(&document)
        .with_cli_context(|| "Failed to serialise config")?;
    write(path, &text)
}

fn parse_value(key: &str, value: &str) -> CliResult<toml::Value> {
    if !BOOL_KEYS.contains(&key) {
        return Ok(toml::Value::String(value.to_string()));
    }
    value
        .parse::<bool>()
        .map(toml::Value::Boolean)
        .map_err(|_| CliError::ConfigError {
            message: format!("'{key}' expects true or false, got '{value}'"),
            source: None,
        })
}

fn write(path: &Path, text: &str) -> CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, text).with_cli_context(|| format!("Failed to write {}", path.display()))
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_creates_file_and_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        set_value(&path, "generation.force", "true").unwrap();
        set_value(&path, "templates.dir", "/opt/skeletons").unwrap();

        let table: toml::Table = std::fs::read_to_string(&path).unwrap().parse().unwrap();
        assert_eq!(table["generation"]["force"].as_bool(), Some(true));
        assert_eq!(table["templates"]["dir"].as_str(), Some("/opt/skeletons"));
    }

    #[test]
    fn set_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[output]\nformat = \"plain\"\n").unwrap();

        set_value(&path, "output.no_color", "true").unwrap();

        let table: toml::Table = std::fs::read_to_string(&path).unwrap().parse().unwrap();
        assert_eq!(table["output"]["format"].as_str(), Some("plain"));
        assert_eq!(table["output"]["no_color"].as_bool(), Some(true));
    }

    #[test]
    fn set_unknown_key_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = set_value(&dir.path().join("c.toml"), "defaults.lang", "rust").unwrap_err();
        assert!(matches!(err, CliError::ConfigError { .. }));
        assert!(!dir.path().join("c.toml").exists());
    }

    #[test]
    fn bool_keys_reject_other_values() {
        assert!(parse_value("generation.force", "yes").is_err());
        assert_eq!(
            parse_value("output.format", "json").unwrap(),
            toml::Value::String("json".into())
        );
    }
}
