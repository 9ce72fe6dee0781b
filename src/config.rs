//! Layered YAML configuration.
//!
//! A run is configured from three documents read in order: system defaults,
//! user overrides and the job file. Keys in later documents replace keys in
//! earlier ones.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::debug;

use crate::error::{Error, Result};

/// System-wide defaults, read first.
pub const SYSTEM_CONFIG_PATH: &str = "configs/system_config.yml";
/// Per-user overrides, read second.
pub const USER_CONFIG_PATH: &str = "configs/user_config.yml";
/// Job file used when none is given on the command line.
pub const DEFAULT_ANALYSIS_CONFIG_PATH: &str = "configs/analysis_config.yml";

/// Keys every run needs, checked when building an [`AnalysisConfig`].
pub const REQUIRED_KEYS: [&str; 6] = [
    "token",
    "selected_feature",
    "selected_number_lines",
    "title_corp",
    "title_analisys",
    "plot_color",
];

/// An untyped key/value configuration layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigMap {
    entries: BTreeMap<String, Value>,
}

impl ConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one YAML document. An empty document is an empty layer.
    pub fn from_yaml_str(source: &str, path: &Path) -> Result<Self> {
        let parse_error = |details: String| Error::ConfigParse {
            path: path.to_path_buf(),
            details,
        };

        let document: Value =
            serde_yaml::from_str(source).map_err(|e| parse_error(e.to_string()))?;

        let mapping = match document {
            Value::Null => return Ok(Self::new()),
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(parse_error(format!(
                    "top level must be a mapping, found {}",
                    yaml_kind(&other)
                )))
            }
        };

        let mut entries = BTreeMap::new();
        for (key, value) in mapping {
            let key = match key {
                Value::String(key) => key,
                other => {
                    return Err(parse_error(format!(
                        "keys must be strings, found {}",
                        yaml_kind(&other)
                    )))
                }
            };
            entries.insert(key, value);
        }
        Ok(Self { entries })
    }

    /// Read and parse one configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|source| Error::ConfigNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&source, path)
    }

    /// Overlay `other` on top of `self`, returning the combined layer.
    pub fn merge(mut self, other: ConfigMap) -> ConfigMap {
        self.entries.extend(other.entries);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scalar value of `key` rendered as a string.
    fn required_string(&self, key: &str) -> Result<String> {
        let value = self
            .get(key)
            .ok_or_else(|| Error::MissingConfigKey(key.to_string()))?;
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Null => Err(Error::MissingConfigKey(key.to_string())),
            other => Err(Error::ConfigParse {
                path: PathBuf::from("<merged configuration>"),
                details: format!("'{key}' must be a scalar, found {}", yaml_kind(other)),
            }),
        }
    }
}

fn yaml_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Read every layer in order and merge them.
pub fn load_layers<P: AsRef<Path>>(paths: &[P]) -> Result<ConfigMap> {
    paths.iter().try_fold(ConfigMap::new(), |merged, path| {
        let path = path.as_ref();
        let layer = ConfigMap::from_file(path)?;
        debug!(path = %path.display(), keys = layer.len(), "loaded configuration layer");
        Ok(merged.merge(layer))
    })
}

/// The standard layer order ending with the given job file.
pub fn default_layer_paths(analysis_config: impl Into<PathBuf>) -> Vec<PathBuf> {
    vec![
        PathBuf::from(SYSTEM_CONFIG_PATH),
        PathBuf::from(USER_CONFIG_PATH),
        analysis_config.into(),
    ]
}

/// Fully merged configuration of one analysis run.
///
/// The feature and row count are kept as written; they are validated by
/// [`crate::types::Selection::parse`] so that errors name the raw value.
#[derive(Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub token: String,
    pub selected_feature: String,
    pub selected_number_lines: String,
    pub title_corp: String,
    pub title_analisys: String,
    pub plot_color: String,
}

impl AnalysisConfig {
    /// Build from a merged map, failing on the first missing required key.
    pub fn from_map(map: &ConfigMap) -> Result<Self> {
        Ok(Self {
            token: map.required_string("token")?,
            selected_feature: map.required_string("selected_feature")?,
            selected_number_lines: map.required_string("selected_number_lines")?,
            title_corp: map.required_string("title_corp")?,
            title_analisys: map.required_string("title_analisys")?,
            plot_color: map.required_string("plot_color")?,
        })
    }

    /// Load and merge `paths`, then build the configuration.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        Self::from_map(&load_layers(paths)?)
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("token", &"[REDACTED]")
            .field("selected_feature", &self.selected_feature)
            .field("selected_number_lines", &self.selected_number_lines)
            .field("title_corp", &self.title_corp)
            .field("title_analisys", &self.title_analisys)
            .field("plot_color", &self.plot_color)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn full_layers(dir: &TempDir) -> Vec<PathBuf> {
        vec![
            write(
                dir,
                "system_config.yml",
                "title_corp: Acme Corp\ntitle_analisys: Top 100 Most Popular Git Repos Analisys\nplot_color: blue\nselected_number_lines: 10\n",
            ),
            write(dir, "user_config.yml", "token: 'ghp_secret'\nplot_color: red\n"),
            write(
                dir,
                "analysis_config.yml",
                "selected_feature: Forks_Qty\nselected_number_lines: '5'\n",
            ),
        ]
    }

    #[test]
    fn test_later_layers_win() {
        let dir = TempDir::new().unwrap();
        let config = AnalysisConfig::load(&full_layers(&dir)).unwrap();

        assert_eq!(config.plot_color, "red");
        assert_eq!(config.selected_number_lines, "5");
        assert_eq!(config.title_corp, "Acme Corp");
        assert_eq!(config.token, "ghp_secret");
        assert_eq!(config.selected_feature, "Forks_Qty");
    }

    #[test]
    fn test_merge_returns_new_value() {
        let dir = TempDir::new().unwrap();
        let base = ConfigMap::from_yaml_str("a: 1\nb: 2\n", dir.path()).unwrap();
        let overlay = ConfigMap::from_yaml_str("b: 3\nc: 4\n", dir.path()).unwrap();

        let merged = base.clone().merge(overlay);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get("b"), Some(&Value::from(3)));
        assert_eq!(base.get("b"), Some(&Value::from(2)));
    }

    #[test]
    fn test_integer_row_count_is_normalized() {
        let dir = TempDir::new().unwrap();
        let mut paths = full_layers(&dir);
        paths.pop();
        paths.push(write(
            &dir,
            "job.yml",
            "selected_feature: Watchers_Qty\nselected_number_lines: 12\n",
        ));

        let config = AnalysisConfig::load(&paths).unwrap();
        assert_eq!(config.selected_number_lines, "12");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.yml");

        let err = load_layers(&[&missing]).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { ref path, .. } if path == &missing));
        assert_eq!(err.stage(), "configuration");
    }

    #[test]
    fn test_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "broken.yml", "token: [unclosed\n");

        assert!(matches!(
            load_layers(&[&path]),
            Err(Error::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_non_mapping_document() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "list.yml", "- token\n- plot_color\n");

        let err = load_layers(&[&path]).unwrap_err();
        assert!(err.to_string().contains("mapping"));
    }

    #[test]
    fn test_empty_layer_is_allowed() {
        let dir = TempDir::new().unwrap();
        let empty = write(&dir, "empty.yml", "");
        let map = load_layers(&[&empty]).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_missing_required_key_is_eager() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "partial.yml", "token: abc\nselected_feature: Forks_Qty\n");

        let err = AnalysisConfig::load(&[&path]).unwrap_err();
        assert!(matches!(err, Error::MissingConfigKey(ref key) if key == "selected_number_lines"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let dir = TempDir::new().unwrap();
        let config = AnalysisConfig::load(&full_layers(&dir)).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("ghp_secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_default_layer_order() {
        let paths = default_layer_paths("job.yml");
        assert_eq!(
            paths,
            vec![
                PathBuf::from(SYSTEM_CONFIG_PATH),
                PathBuf::from(USER_CONFIG_PATH),
                PathBuf::from("job.yml"),
            ]
        );
    }
}
