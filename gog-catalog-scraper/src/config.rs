use std::path::{Path, PathBuf};

use crate::client::DEFAULT_STORE_URL;
use crate::error::PopulateError;

pub const DEFAULT_HOST_URL: &str = "http://localhost:1337";
pub const DEFAULT_MAX_WORKERS: usize = 4;
pub const DEFAULT_THROTTLE_MS: u64 = 2000;

const ENV_STORE_URL: &str = "GOG_STORE_URL";
const ENV_HOST_URL: &str = "GOG_CATALOG_HOST_URL";
const ENV_API_TOKEN: &str = "GOG_CATALOG_API_TOKEN";
const ENV_WORKERS: &str = "GOG_CATALOG_WORKERS";
const ENV_THROTTLE_MS: &str = "GOG_CATALOG_THROTTLE_MS";

/// Effective settings for a populate run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store_url: String,
    pub host_url: String,
    pub api_token: Option<String>,
    pub max_workers: usize,
    pub throttle_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_url: DEFAULT_STORE_URL.to_string(),
            host_url: DEFAULT_HOST_URL.to_string(),
            api_token: None,
            max_workers: DEFAULT_MAX_WORKERS,
            throttle_ms: DEFAULT_THROTTLE_MS,
        }
    }
}

/// Where a setting's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Hard-coded default value.
    Default,
    /// Not set anywhere.
    Missing,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Provenance of each setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsSources {
    pub store_url: ConfigSource,
    pub host_url: ConfigSource,
    pub api_token: ConfigSource,
    pub max_workers: ConfigSource,
    pub throttle_ms: ConfigSource,
}

/// TOML config file format.
#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<HostSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub populate: Option<PopulateSection>,
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct StoreSection {
    pub url: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct HostSection {
    pub url: Option<String>,
    pub api_token: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct PopulateSection {
    pub max_workers: Option<usize>,
    pub throttle_ms: Option<u64>,
}

impl ConfigFile {
    pub fn parse(content: &str) -> Result<Self, PopulateError> {
        toml::from_str(content)
            .map_err(|e| PopulateError::Config(format!("Invalid config file: {}", e)))
    }

    fn store_url(&self) -> Option<String> {
        self.store.as_ref().and_then(|s| s.url.clone())
    }

    fn host_url(&self) -> Option<String> {
        self.host.as_ref().and_then(|h| h.url.clone())
    }

    fn api_token(&self) -> Option<String> {
        self.host.as_ref().and_then(|h| h.api_token.clone())
    }

    fn max_workers(&self) -> Option<usize> {
        self.populate.as_ref().and_then(|p| p.max_workers)
    }

    fn throttle_ms(&self) -> Option<u64> {
        self.populate.as_ref().and_then(|p| p.throttle_ms)
    }
}

impl Settings {
    /// Load settings from environment variables, the config file, or defaults.
    ///
    /// Priority: env vars > config file > defaults.
    pub fn load() -> Result<Self, PopulateError> {
        let file = load_config_file()?.unwrap_or_default();
        Self::resolve(|var| std::env::var(var).ok(), &file)
    }

    /// Layer `env` over `file` over defaults.
    pub fn resolve(
        env: impl Fn(&str) -> Option<String>,
        file: &ConfigFile,
    ) -> Result<Self, PopulateError> {
        let defaults = Self::default();

        let store_url = env(ENV_STORE_URL)
            .or_else(|| file.store_url())
            .unwrap_or(defaults.store_url);

        let host_url = env(ENV_HOST_URL)
            .or_else(|| file.host_url())
            .unwrap_or(defaults.host_url);

        let api_token = env(ENV_API_TOKEN)
            .or_else(|| file.api_token())
            .filter(|t| !t.trim().is_empty());

        let max_workers = match env(ENV_WORKERS) {
            Some(raw) => parse_env(ENV_WORKERS, &raw)?,
            None => file.max_workers().unwrap_or(defaults.max_workers),
        };
        if max_workers == 0 {
            return Err(PopulateError::Config(
                "max_workers must be at least 1".to_string(),
            ));
        }

        let throttle_ms = match env(ENV_THROTTLE_MS) {
            Some(raw) => parse_env(ENV_THROTTLE_MS, &raw)?,
            None => file.throttle_ms().unwrap_or(defaults.throttle_ms),
        };

        Ok(Self {
            store_url,
            host_url,
            api_token,
            max_workers,
            throttle_ms,
        })
    }

    /// Apply explicit values (e.g., from CLI args).
    pub fn with_overrides(
        mut self,
        host_url: Option<String>,
        max_workers: Option<usize>,
        throttle_ms: Option<u64>,
    ) -> Self {
        if let Some(url) = host_url {
            self.host_url = url;
        }
        if let Some(workers) = max_workers {
            self.max_workers = workers.max(1);
        }
        if let Some(ms) = throttle_ms {
            self.throttle_ms = ms;
        }
        self
    }

    fn to_config_file(&self) -> ConfigFile {
        let defaults = Self::default();
        ConfigFile {
            store: Some(StoreSection {
                url: (self.store_url != defaults.store_url).then(|| self.store_url.clone()),
            }),
            host: Some(HostSection {
                url: Some(self.host_url.clone()),
                api_token: self.api_token.clone(),
            }),
            populate: Some(PopulateSection {
                max_workers: Some(self.max_workers),
                throttle_ms: Some(self.throttle_ms),
            }),
        }
    }
}

fn parse_env<T: std::str::FromStr>(var: &str, raw: &str) -> Result<T, PopulateError> {
    raw.trim()
        .parse()
        .map_err(|_| PopulateError::Config(format!("${} is not a valid number: '{}'", var, raw)))
}

/// Return the path to the config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("gog-catalog").join("config.toml"))
}

/// Save settings to the config file, creating parent directories as needed.
/// Returns the path the file was written to.
pub fn save_to_file(settings: &Settings) -> Result<PathBuf, PopulateError> {
    let path = config_path()
        .ok_or_else(|| PopulateError::Config("Could not determine config directory".to_string()))?;
    save_to_path(settings, &path)?;
    Ok(path)
}

/// Save settings to an explicit path.
pub fn save_to_path(settings: &Settings, path: &Path) -> Result<(), PopulateError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let toml_str = toml::to_string_pretty(&settings.to_config_file())
        .map_err(|e| PopulateError::Config(format!("Failed to serialize config: {}", e)))?;

    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Determine where each setting is coming from.
pub fn settings_sources() -> SettingsSources {
    let file = load_config_file().ok().flatten().unwrap_or_default();
    sources_from(|var| std::env::var(var).ok(), &file)
}

fn sources_from(env: impl Fn(&str) -> Option<String>, file: &ConfigFile) -> SettingsSources {
    let pick = |var: &'static str, in_file: bool, fallback: ConfigSource| {
        if env(var).is_some() {
            ConfigSource::EnvVar(var)
        } else if in_file {
            ConfigSource::ConfigFile
        } else {
            fallback
        }
    };

    SettingsSources {
        store_url: pick(ENV_STORE_URL, file.store_url().is_some(), ConfigSource::Default),
        host_url: pick(ENV_HOST_URL, file.host_url().is_some(), ConfigSource::Default),
        api_token: pick(ENV_API_TOKEN, file.api_token().is_some(), ConfigSource::Missing),
        max_workers: pick(ENV_WORKERS, file.max_workers().is_some(), ConfigSource::Default),
        throttle_ms: pick(ENV_THROTTLE_MS, file.throttle_ms().is_some(), ConfigSource::Default),
    }
}

/// Read the config file. A missing file is `Ok(None)`; a malformed one is an error.
fn load_config_file() -> Result<Option<ConfigFile>, PopulateError> {
    let Some(path) = config_path() else {
        return Ok(None);
    };
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    ConfigFile::parse(&content).map(Some)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(env_of(&[]), &ConfigFile::default()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.store_url, "https://www.gog.com");
        assert_eq!(settings.host_url, "http://localhost:1337");
        assert_eq!(settings.max_workers, 4);
        assert_eq!(settings.throttle_ms, 2000);
    }

    #[test]
    fn test_env_beats_file() {
        let file = ConfigFile::parse(
            r#"
            [host]
            url = "http://cms.internal:1337"
            api_token = "from-file"

            [populate]
            max_workers = 8
            throttle_ms = 500
            "#,
        )
        .unwrap();
        let env = env_of(&[
            ("GOG_CATALOG_HOST_URL", "http://override:1337"),
            ("GOG_CATALOG_THROTTLE_MS", "0"),
        ]);

        let settings = Settings::resolve(&env, &file).unwrap();
        assert_eq!(settings.host_url, "http://override:1337");
        assert_eq!(settings.api_token.as_deref(), Some("from-file"));
        assert_eq!(settings.max_workers, 8);
        assert_eq!(settings.throttle_ms, 0);

        let sources = sources_from(&env, &file);
        assert_eq!(sources.host_url, ConfigSource::EnvVar("GOG_CATALOG_HOST_URL"));
        assert_eq!(sources.api_token, ConfigSource::ConfigFile);
        assert_eq!(sources.store_url, ConfigSource::Default);
        assert_eq!(sources.throttle_ms.to_string(), "env $GOG_CATALOG_THROTTLE_MS");
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let err = Settings::resolve(env_of(&[("GOG_CATALOG_WORKERS", "many")]), &ConfigFile::default())
            .unwrap_err();
        assert!(matches!(err, PopulateError::Config(ref m) if m.contains("GOG_CATALOG_WORKERS")));

        let err = Settings::resolve(env_of(&[("GOG_CATALOG_WORKERS", "0")]), &ConfigFile::default())
            .unwrap_err();
        assert!(matches!(err, PopulateError::Config(_)));
    }

    #[test]
    fn test_blank_token_is_unset() {
        let settings =
            Settings::resolve(env_of(&[("GOG_CATALOG_API_TOKEN", "  ")]), &ConfigFile::default())
                .unwrap();
        assert_eq!(settings.api_token, None);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let settings = Settings {
            api_token: Some("secret".to_string()),
            max_workers: 2,
            ..Settings::default()
        };

        save_to_path(&settings, &path).unwrap();
        let file = ConfigFile::parse(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let reloaded = Settings::resolve(env_of(&[]), &file).unwrap();
        assert_eq!(reloaded, settings);
        assert!(file.store_url().is_none());
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::default().with_overrides(None, Some(0), Some(100));
        assert_eq!(settings.max_workers, 1);
        assert_eq!(settings.throttle_ms, 100);
        assert_eq!(settings.host_url, DEFAULT_HOST_URL);
    }
}
