use crate::error::{RankError, Result};
use crate::types::config::RankConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "riskrank.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".riskrank/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/riskrank/config.toml";
/// Dataset names tried, in order, when `project.dataset` is unset.
pub const DEFAULT_DATASET_FILES: [&str; 2] = ["dataset.json", "dataset.csv"];

pub fn load_config(root: &Path) -> Result<Option<RankConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

/// Config layers for `root`, lowest precedence first.
fn layers(root: &Path, global_path: Option<&Path>) -> Vec<PathBuf> {
    global_path
        .map(Path::to_path_buf)
        .into_iter()
        .chain([root.join(DEFAULT_CONFIG_FILE), root.join(DEFAULT_LOCAL_FILE)])
        .collect()
}

/// Merges every existing layer and validates the result. A directory without
/// `riskrank.toml` has no config, whatever the other layers hold.
pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<Option<RankConfig>> {
    let project_file = root.join(DEFAULT_CONFIG_FILE);
    if !project_file.exists() {
        return Ok(None);
    }

    let mut merged = Value::Table(Map::new());
    let mut sources = Vec::new();
    for path in layers(root, global_path) {
        if !path.exists() {
            continue;
        }
        merge_toml(&mut merged, read_toml_value(&path)?);
        sources.push(path.display().to_string());
    }

    let in_project = |message: String| {
        RankError::ConfigParse(format!("{}: {message}", project_file.display()))
    };
    let cfg: RankConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| in_project(e.to_string()))?;
    cfg.validate().map_err(|e| match e {
        RankError::ConfigParse(message) => in_project(message),
        other => other,
    })?;

    debug!(project = %cfg.project.name, layers = ?sources, "config loaded");
    Ok(Some(cfg))
}

/// Dataset file for a project directory: `project.dataset` relative to `root` when set,
/// otherwise the first of [`DEFAULT_DATASET_FILES`] that exists. When none exists the
/// first default is returned so the load error names it.
pub fn dataset_path(root: &Path, cfg: &RankConfig) -> PathBuf {
    if let Some(file) = &cfg.project.dataset {
        return root.join(file);
    }
    DEFAULT_DATASET_FILES
        .iter()
        .map(|file| root.join(file))
        .find(|path| path.exists())
        .unwrap_or_else(|| root.join(DEFAULT_DATASET_FILES[0]))
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| RankError::ConfigParse(format!("{}: {}", path.display(), e)))
}

/// Tables merge key by key; any other value in `overlay` replaces the base value,
/// so arrays such as `topsis.alternatives` are replaced wholesale.
fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}
