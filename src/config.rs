//! Sort rules configuration with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults (no list rules, Kubernetes root key order)
//! 2. Global config: `$XDG_CONFIG_HOME/yaml-sort/config.yaml`
//! 3. Rules file: `--config <path>`, else `./.yaml-sort.yaml`
//! 4. Environment variables: `YAML_SORT_*` prefix
//!
//! A rules file that does not exist means "no rules", never an error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{RootKeyOrder, SortOptions, K8S_ROOT_KEY_ORDER};

/// Name of the rules file looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = ".yaml-sort.yaml";

/// Sort the list at `path` by each element's `key` field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListSortRule {
    /// Dot-separated path from the root, e.g. `spec.egress`
    pub path: String,
    /// Field inside each list element, e.g. `name`
    pub key: String,
}

impl ListSortRule {
    pub fn new(path: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RawSettings {
    pub list_sort_keys: Vec<ListSortRule>,
    pub root_key_order: Option<Vec<String>>,
}

/// Effective sort configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// List sort rules, at most one per path
    pub list_sort_keys: Vec<ListSortRule>,
    /// Root key priority used in fixed root order mode
    pub root_key_order: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            list_sort_keys: vec![],
            root_key_order: K8S_ROOT_KEY_ORDER.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Get the XDG config directory for yaml-sort.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "yaml-sort").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.yaml"))
}

/// Load a YAML rules file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    if content.trim().is_empty() {
        return Ok(RawSettings::default());
    }
    let raw: RawSettings = serde_yaml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })?;
    if let Some(rule) = raw.list_sort_keys.iter().find(|r| r.key.is_empty()) {
        return Err(ApplicationError::Config {
            message: format!(
                "parse {}: list sort rule for path '{}' has an empty key",
                path.display(),
                rule.path
            ),
        });
    }
    Ok(raw)
}

impl Settings {
    /// Merge list rules by path: overlay replaces a rule with the same path,
    /// new paths are appended in overlay order.
    pub fn merge_rules(base: &[ListSortRule], overlay: &[ListSortRule]) -> Vec<ListSortRule> {
        let mut result = base.to_vec();
        for rule in overlay {
            match result.iter_mut().find(|r| r.path == rule.path) {
                Some(existing) => existing.key = rule.key.clone(),
                None => result.push(rule.clone()),
            }
        }
        result
    }

    /// Merge overlay config onto self (base).
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            list_sort_keys: Self::merge_rules(&self.list_sort_keys, &overlay.list_sort_keys),
            root_key_order: overlay
                .root_key_order
                .clone()
                .unwrap_or_else(|| self.root_key_order.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `rules_file` - Explicit rules file; `~` and `$VAR` are expanded.
    ///   When `None`, `./.yaml-sort.yaml` is used if present.
    pub fn load(rules_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Rules file (missing file → no rules)
        let rules_path = match rules_file {
            Some(path) => expand_path(path),
            None => PathBuf::from(LOCAL_CONFIG_FILE),
        };
        if rules_path.exists() {
            debug!("load: rules file {}", rules_path.display());
            let raw = load_raw_settings(&rules_path)?;
            current = current.merge_with(&raw);
        } else {
            debug!("load: no rules file at {}", rules_path.display());
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        Ok(current)
    }

    /// Apply YAML_SORT_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("YAML_SORT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("root_key_order"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get::<Vec<String>>("root_key_order") {
            settings.root_key_order = val;
        }

        Ok(settings)
    }

    /// Flatten rules into the `path -> key` lookup used by the sorter.
    pub fn list_sort_keys_map(&self) -> BTreeMap<String, String> {
        self.list_sort_keys
            .iter()
            .map(|r| (r.path.clone(), r.key.clone()))
            .collect()
    }

    /// Build sort options for one run.
    pub fn sort_options(&self, fixed_root_order: bool) -> SortOptions {
        SortOptions {
            fixed_root_order,
            root_key_order: RootKeyOrder::new(self.root_key_order.iter().cloned()),
            list_sort_keys: self.list_sort_keys_map(),
        }
    }

    /// Show the effective configuration as YAML.
    pub fn to_yaml(&self) -> Result<String, ApplicationError> {
        serde_yaml::to_string(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template rules file.
    pub fn template() -> String {
        r#"# yaml-sort rules
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/yaml-sort/config.yaml
#   Local:  ./.yaml-sort.yaml, or the file given with --config
#   Env:    YAML_SORT_ROOT_KEY_ORDER=apiVersion,kind,metadata
#
# Rules for the same path in a later file replace earlier ones.

# Sort lists of objects by a field of each element.
# Paths are dot-separated mapping keys from the document root;
# list elements do not add a segment.
listSortKeys:
  - path: spec.egress
    key: name
  - path: spec.ingress
    key: name

# Root key order used with --k8s (unlisted keys follow alphabetically).
# rootKeyOrder: [apiVersion, kind, metadata, spec, data, status]
"#
        .to_string()
    }
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(raw.as_ref()) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => path.to_path_buf(),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_settings_when_created_then_k8s_root_order_and_no_rules() {
        let settings = Settings::default();
        assert!(settings.list_sort_keys.is_empty());
        assert_eq!(
            settings.root_key_order,
            ["apiVersion", "kind", "metadata", "spec", "data", "status"]
        );
    }

    #[test]
    fn test_merge_rules_replaces_same_path() {
        let base = vec![ListSortRule::new("spec.egress", "name")];
        let overlay = vec![ListSortRule::new("spec.egress", "port")];
        let result = Settings::merge_rules(&base, &overlay);

        assert_eq!(result, vec![ListSortRule::new("spec.egress", "port")]);
    }

    #[test]
    fn test_merge_rules_appends_new_paths() {
        let base = vec![ListSortRule::new("spec.egress", "name")];
        let overlay = vec![
            ListSortRule::new("spec.ingress", "name"),
            ListSortRule::new("spec.egress", "id"),
        ];
        let result = Settings::merge_rules(&base, &overlay);

        assert_eq!(
            result,
            vec![
                ListSortRule::new("spec.egress", "id"),
                ListSortRule::new("spec.ingress", "name"),
            ]
        );
    }

    #[test]
    fn given_overlay_without_root_order_when_merging_then_base_kept() {
        let base = Settings::default();
        let overlay = RawSettings {
            list_sort_keys: vec![ListSortRule::new("items", "id")],
            root_key_order: None,
        };
        let result = base.merge_with(&overlay);

        assert_eq!(result.root_key_order, base.root_key_order);
        assert_eq!(result.list_sort_keys.len(), 1);
    }

    #[test]
    fn given_overlay_with_root_order_when_merging_then_replaced() {
        let overlay = RawSettings {
            list_sort_keys: vec![],
            root_key_order: Some(vec!["name".into(), "version".into()]),
        };
        let result = Settings::default().merge_with(&overlay);

        assert_eq!(result.root_key_order, ["name", "version"]);
    }

    #[test]
    fn given_rules_when_building_sort_options_then_map_and_order_set() {
        let settings = Settings {
            list_sort_keys: vec![ListSortRule::new("spec.egress", "name")],
            root_key_order: vec!["kind".into()],
        };
        let options = settings.sort_options(true);

        assert!(options.fixed_root_order);
        assert_eq!(options.root_key_order.keys(), ["kind"]);
        assert_eq!(options.list_sort_keys.get("spec.egress").map(String::as_str), Some("name"));
    }

    #[test]
    fn given_template_when_parsed_then_valid_rules() {
        let raw: RawSettings = serde_yaml::from_str(&Settings::template()).expect("template parses");
        assert_eq!(raw.list_sort_keys.len(), 2);
        assert!(raw.root_key_order.is_none());
    }

    #[test]
    fn given_settings_when_to_yaml_then_camel_case_keys() {
        let yaml = Settings::default().to_yaml().unwrap();
        assert!(yaml.contains("listSortKeys"));
        assert!(yaml.contains("rootKeyOrder"));
    }
}
