//! packsize config - Show or edit configuration

use std::path::Path;

use clap::Args;

use crate::app::AppContext;
use crate::cli::output;
use crate::config::Config;
use crate::error::{PackError, Result};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Configuration key to get/set (e.g. `search.time_limit_ms`)
    pub key: Option<String>,

    /// Value to set
    pub value: Option<String>,

    /// Remove the key from the config file
    #[arg(long)]
    pub unset: bool,
}

pub fn run(ctx: &AppContext, args: &ConfigArgs) -> Result<()> {
    let Some(key) = args.key.as_deref() else {
        return emit_config(ctx);
    };

    if args.unset {
        if args.value.is_some() {
            return Err(PackError::Config("cannot use --unset with a value".to_string()));
        }
        return edit_file(&ctx.config_path, |doc| unset_path(doc, key));
    }

    match args.value.as_deref() {
        Some(raw) => {
            let value = parse_value(raw)?;
            edit_file(&ctx.config_path, |doc| set_path(doc, key, value))
        }
        None => get_key(ctx, key),
    }
}

fn emit_config(ctx: &AppContext) -> Result<()> {
    if ctx.machine_mode {
        return output::emit_json(&output::machine_ok(&ctx.config));
    }

    let rendered = toml::to_string_pretty(&ctx.config)
        .map_err(|err| PackError::Config(format!("render config: {err}")))?;
    println!("{rendered}");
    Ok(())
}

fn get_key(ctx: &AppContext, key: &str) -> Result<()> {
    let value = config_value_at(&ctx.config, key)?;
    if ctx.machine_mode {
        return output::emit_json(&output::machine_ok(&value));
    }
    println!("{}", format_value(&value));
    Ok(())
}

/// Apply `change` to the TOML file at `path`, refusing results that no
/// longer load.
fn edit_file(path: &Path, change: impl FnOnce(&mut toml::Value) -> Result<()>) -> Result<()> {
    let mut doc = load_config_doc(path)?;
    change(&mut doc)?;
    let rendered = toml::to_string_pretty(&doc)
        .map_err(|err| PackError::Config(format!("render config: {err}")))?;
    check_rendered(&rendered)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| PackError::Config(format!("create config dir: {err}")))?;
    }
    std::fs::write(path, rendered)
        .map_err(|err| PackError::Config(format!("write config: {err}")))?;
    Ok(())
}

fn check_rendered(rendered: &str) -> Result<()> {
    let config: Config = toml::from_str(rendered)
        .map_err(|err| PackError::Config(format!("invalid config after edit: {err}")))?;
    config.validate()
}

fn load_config_doc(path: &Path) -> Result<toml::Value> {
    if !path.exists() {
        return Ok(toml::Value::Table(toml::map::Map::new()));
    }
    let raw = std::fs::read_to_string(path)
        .map_err(|err| PackError::Config(format!("read config: {err}")))?;
    toml::from_str(&raw).map_err(|err| PackError::Config(format!("parse config: {err}")))
}

fn parse_value(raw: &str) -> Result<toml::Value> {
    let direct = format!("value = {raw}");
    if let Ok(value) = toml::from_str::<toml::Value>(&direct) {
        if let Some(parsed) = value.get("value") {
            return Ok(parsed.clone());
        }
    }
    Ok(toml::Value::String(raw.to_string()))
}

fn config_value_at(config: &Config, key: &str) -> Result<toml::Value> {
    let doc = toml::Value::try_from(config)
        .map_err(|err| PackError::Config(format!("serialize config: {err}")))?;
    let mut current = &doc;
    for part in key.split('.') {
        current = current
            .get(part)
            .ok_or_else(|| PackError::Config(format!("unknown key: {key}")))?;
    }
    Ok(current.clone())
}

fn split_key(key: &str) -> Result<(Vec<&str>, &str)> {
    let mut parts: Vec<&str> = key.split('.').collect();
    match parts.pop() {
        Some(leaf) if !leaf.is_empty() => Ok((parts, leaf)),
        _ => Err(PackError::Config("empty key".to_string())),
    }
}

fn set_path(doc: &mut toml::Value, key: &str, value: toml::Value) -> Result<()> {
    let (sections, leaf) = split_key(key)?;
    let mut current = doc;
    for part in sections {
        current = as_table(current)?
            .entry(part.to_string())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }
    as_table(current)?.insert(leaf.to_string(), value);
    Ok(())
}

fn unset_path(doc: &mut toml::Value, key: &str) -> Result<()> {
    let (sections, leaf) = split_key(key)?;
    let mut current = doc;
    for part in sections {
        current = as_table(current)?
            .get_mut(part)
            .ok_or_else(|| PackError::Config(format!("unknown key: {key}")))?;
    }
    as_table(current)?.remove(leaf);
    Ok(())
}

fn as_table(value: &mut toml::Value) -> Result<&mut toml::map::Map<String, toml::Value>> {
    value
        .as_table_mut()
        .ok_or_else(|| PackError::Config("config path is not a table".to_string()))
}

fn format_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_value_keeps_types() {
        assert_eq!(parse_value("250").unwrap(), toml::Value::Integer(250));
        assert_eq!(
            parse_value("[5, 3]").unwrap(),
            toml::Value::Array(vec![toml::Value::Integer(5), toml::Value::Integer(3)])
        );
        assert_eq!(parse_value("memory").unwrap(), toml::Value::String("memory".into()));
    }

    #[test]
    fn config_value_at_reads_nested_keys() {
        let config = Config::default();
        assert_eq!(
            config_value_at(&config, "search.clock_check_mask").unwrap(),
            toml::Value::Integer(0x3FFF)
        );
        assert!(config_value_at(&config, "search.missing").is_err());
    }

    #[test]
    fn set_then_unset_round_trips_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        edit_file(&path, |doc| set_path(doc, "search.time_limit_ms", toml::Value::Integer(50)))
            .unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("time_limit_ms = 50"));

        edit_file(&path, |doc| unset_path(doc, "search.time_limit_ms")).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("time_limit_ms"));
    }

    #[test]
    fn edits_producing_invalid_config_are_refused() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let result = edit_file(&path, |doc| {
            set_path(doc, "output.format", toml::Value::String("yaml".into()))
        });
        assert!(matches!(result, Err(PackError::Config(_))));
        assert!(!path.exists());
    }
}
