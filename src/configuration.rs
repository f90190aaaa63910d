use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigurationError;

pub const CONFIG_ENV_VARIABLE: &str = "V2RAY_TOOLS_CONFIG";
pub const LOCAL_CONFIG_FILE: &str = "v2ray-tools.toml";

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_control_panel_file")]
    pub control_panel_file: PathBuf,
    #[serde(default = "default_subscriptions_directory")]
    pub subscriptions_directory: PathBuf,
    #[serde(default = "default_ci_variable")]
    pub ci_variable: String,
    #[serde(default = "default_local_debug_variable")]
    pub local_debug_variable: String,
}

fn default_control_panel_file() -> PathBuf {
    PathBuf::from("control_panel.txt")
}

fn default_subscriptions_directory() -> PathBuf {
    PathBuf::from("subscriptions")
}

fn default_ci_variable() -> String {
    "GITHUB_ACTIONS".into()
}

fn default_local_debug_variable() -> String {
    "CONTROL_PANEL_LOCAL_DEBUG".into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            control_panel_file: default_control_panel_file(),
            subscriptions_directory: default_subscriptions_directory(),
            ci_variable: default_ci_variable(),
            local_debug_variable: default_local_debug_variable(),
        }
    }
}

impl Settings {
    /// Candidate settings files, most specific first.
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Ok(explicit) = std::env::var(CONFIG_ENV_VARIABLE)
            && !explicit.trim().is_empty()
        {
            candidates.push(PathBuf::from(explicit));
        }
        candidates.push(PathBuf::from(LOCAL_CONFIG_FILE));
        if let Some(directory) = dirs::config_dir() {
            candidates.push(directory.join("v2ray-tools").join("config.toml"));
        }
        candidates
    }

    pub fn load() -> Self {
        Self::load_first(&Self::candidate_paths())
    }

    /// Uses the first candidate that exists. A file that exists but cannot be
    /// read or parsed falls back to defaults instead of trying the next one.
    pub fn load_first(candidates: &[PathBuf]) -> Self {
        for path in candidates {
            if !path.exists() {
                log::debug!("[configuration] no settings file at {}", path.display());
                continue;
            }
            return match Self::load_from(path) {
                Ok(settings) => {
                    log::info!("[configuration] loaded from {}", path.display());
                    settings
                }
                Err(error) => {
                    log::warn!(
                        "[configuration] failed to load {}: {error}, using defaults",
                        path.display()
                    );
                    Self::default()
                }
            };
        }

        log::info!("[configuration] no settings file found, using defaults");
        Self::default()
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigurationError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// The control panel only mutates state from inside CI, unless the local
    /// debug override is set to exactly `1`.
    pub fn execution_allowed<F>(&self, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        let in_ci = lookup(self.ci_variable.as_str()).is_some_and(|value| is_truthy(&value));
        let local_debug =
            lookup(self.local_debug_variable.as_str()).is_some_and(|value| value.trim() == "1");

        log::debug!(
            "[configuration] execution guard: {}={in_ci}, {}={local_debug}",
            self.ci_variable,
            self.local_debug_variable,
        );

        in_ci || local_debug
    }
}

pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn guard_rejects_plain_environment() {
        let settings = Settings::default();
        assert!(!settings.execution_allowed(lookup_from(&[])));
    }

    #[test]
    fn guard_accepts_truthy_ci_flag() {
        let settings = Settings::default();
        assert!(settings.execution_allowed(lookup_from(&[("GITHUB_ACTIONS", "true")])));
        assert!(settings.execution_allowed(lookup_from(&[("GITHUB_ACTIONS", "TRUE")])));
        assert!(settings.execution_allowed(lookup_from(&[("GITHUB_ACTIONS", "1")])));
        assert!(!settings.execution_allowed(lookup_from(&[("GITHUB_ACTIONS", "false")])));
        assert!(!settings.execution_allowed(lookup_from(&[("GITHUB_ACTIONS", "")])));
    }

    #[test]
    fn guard_local_debug_requires_exactly_one() {
        let settings = Settings::default();
        assert!(settings.execution_allowed(lookup_from(&[("CONTROL_PANEL_LOCAL_DEBUG", "1")])));
        assert!(!settings.execution_allowed(lookup_from(&[("CONTROL_PANEL_LOCAL_DEBUG", "true")])));
    }

    #[test]
    fn guard_uses_configured_variable_names() {
        let settings = Settings {
            ci_variable: "GITLAB_CI".into(),
            ..Settings::default()
        };
        assert!(settings.execution_allowed(lookup_from(&[("GITLAB_CI", "true")])));
        assert!(!settings.execution_allowed(lookup_from(&[("GITHUB_ACTIONS", "true")])));
    }

    #[test]
    fn partial_settings_file_keeps_defaults() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("config.toml");
        std::fs::write(&path, "subscriptions_directory = \"out/subs\"\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.subscriptions_directory, PathBuf::from("out/subs"));
        assert_eq!(settings.control_panel_file, PathBuf::from("control_panel.txt"));
        assert_eq!(settings.ci_variable, "GITHUB_ACTIONS");
    }

    #[test]
    fn load_first_skips_missing_and_falls_back_on_garbage() {
        let directory = tempfile::tempdir().unwrap();
        let missing = directory.path().join("missing.toml");
        let broken = directory.path().join("broken.toml");
        let valid = directory.path().join("valid.toml");
        std::fs::write(&broken, "control_panel_file = [").unwrap();
        std::fs::write(&valid, "control_panel_file = \"panel.txt\"\n").unwrap();

        let settings = Settings::load_first(&[missing.clone(), valid.clone()]);
        assert_eq!(settings.control_panel_file, PathBuf::from("panel.txt"));

        let settings = Settings::load_first(&[missing, broken, valid]);
        assert_eq!(settings, Settings::default());
    }
}
