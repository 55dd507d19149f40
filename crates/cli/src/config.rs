use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use hevy_stats_domain as domain;
use hevy_stats_storage::DEFAULT_BASE_URL;
use log::debug;

pub const API_KEY_URL: &str = "https://hevy.com/settings?developer";
pub const DEFAULT_API_KEY_FILE: &str = "~/.hevy_api_key";
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("page size must be greater than 0")]
    InvalidPageSize,
    #[error("request timeout must be greater than 0")]
    InvalidRequestTimeout,
    #[error(
        "You must first add your API key to {} - Get it here: {API_KEY_URL}",
        path.display()
    )]
    MissingApiKey { path: PathBuf },
}

/// Contents of the configuration file. All keys are optional.
#[derive(serde::Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub initial_page: Option<u32>,
    pub page_size: Option<u32>,
    pub request_timeout: Option<u64>,
    pub api_key_file: Option<PathBuf>,
}

impl FileConfig {
    /// Read the configuration file at `path`. A missing file yields an empty configuration.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no configuration file at {}", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Combine with `other`, values of `other` take precedence.
    #[must_use]
    pub fn merge(self, other: FileConfig) -> Self {
        Self {
            base_url: other.base_url.or(self.base_url),
            initial_page: other.initial_page.or(self.initial_page),
            page_size: other.page_size.or(self.page_size),
            request_timeout: other.request_timeout.or(self.request_timeout),
            api_key_file: other.api_key_file.or(self.api_key_file),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub initial_page: u32,
    pub page_size: u32,
    pub request_timeout: Duration,
    pub api_key_file: PathBuf,
}

impl TryFrom<FileConfig> for Config {
    type Error = ConfigError;

    fn try_from(value: FileConfig) -> Result<Self, Self::Error> {
        let page_size = value.page_size.unwrap_or(domain::DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }

        let request_timeout = value.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        if request_timeout == 0 {
            return Err(ConfigError::InvalidRequestTimeout);
        }

        Ok(Self {
            base_url: value
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            initial_page: value.initial_page.unwrap_or(domain::DEFAULT_PAGE),
            page_size,
            request_timeout: Duration::from_secs(request_timeout),
            api_key_file: expand_home(
                &value
                    .api_key_file
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_API_KEY_FILE)),
            ),
        })
    }
}

impl Config {
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hevy-stats").join("config.toml"))
    }

    /// Combine defaults, configuration file and `overrides`, later sources take precedence.
    ///
    /// An explicitly given configuration file must exist, the default one may be missing.
    pub fn load(path: Option<&Path>, overrides: FileConfig) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source: std::io::ErrorKind::NotFound.into(),
                });
            }
            Some(path) => FileConfig::read(path)?,
            None => match Self::default_path() {
                Some(path) => FileConfig::read(&path)?,
                None => FileConfig::default(),
            },
        };

        Self::try_from(file.merge(overrides))
    }

    #[must_use]
    pub fn page_params(&self) -> domain::PageParams {
        domain::PageParams {
            page: self.initial_page,
            page_size: self.page_size,
            filters: vec![],
        }
    }

    /// API key given explicitly, or else the trimmed content of the API key file.
    pub fn api_key(&self, explicit: Option<&str>) -> Result<String, ConfigError> {
        if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
            return Ok(key.to_string());
        }

        let missing = || ConfigError::MissingApiKey {
            path: self.api_key_file.clone(),
        };

        match fs::read_to_string(&self.api_key_file) {
            Ok(content) => Some(content.trim().to_string())
                .filter(|k| !k.is_empty())
                .ok_or_else(missing),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(missing()),
            Err(source) => Err(ConfigError::Io {
                path: self.api_key_file.clone(),
                source,
            }),
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
