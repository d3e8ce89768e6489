use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use threshold_gestures::OrientationSupport;
use threshold_providers::{
    ClaudeJudge, ContentSource, ContentTables, DEFAULT_EVALUATION_TIMEOUT, FunctionJudge,
    RemoteJudge, RestContentStore, StaticContentStore,
};
use threshold_types::UnlockSettings;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdConfig {
    #[serde(default)]
    pub unlock: UnlockSettings,
    pub judge: Option<JudgeConfig>,
    pub content: Option<ContentConfig>,
    pub device: Option<DeviceConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => Some(path),
            ConfigError::Invalid { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgeKind {
    #[default]
    Function,
    Claude,
    None,
}

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JudgeConfig {
    #[serde(default)]
    pub kind: JudgeKind,
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
}

// Manual Debug impl to prevent leaking API keys in logs.
impl std::fmt::Debug for JudgeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JudgeConfig")
            .field("kind", &self.kind)
            .field("url", &self.url)
            .field("api_key", &mask(self.api_key.as_ref()))
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn mask(opt: Option<&String>) -> &'static str {
    if opt.is_some() { "[REDACTED]" } else { "None" }
}

/// Expanded, trimmed value; `None` when unset or blank after expansion.
fn expanded(value: Option<&String>) -> Option<String> {
    value
        .map(|v| expand_env_vars(v).trim().to_string())
        .filter(|v| !v.is_empty())
}

impl JudgeConfig {
    pub fn build_judge(&self) -> Result<RemoteJudge, ConfigError> {
        match self.kind {
            JudgeKind::None => Ok(RemoteJudge::Disabled),
            JudgeKind::Function => {
                let url = expanded(self.url.as_ref()).ok_or(ConfigError::Invalid {
                    field: "judge.url",
                    reason: "required when kind = \"function\"".to_string(),
                })?;
                let mut judge = FunctionJudge::new(url);
                if let Some(key) = expanded(self.api_key.as_ref()) {
                    judge = judge.with_api_key(key);
                }
                Ok(RemoteJudge::Function(judge))
            }
            JudgeKind::Claude => {
                let key = expanded(self.api_key.as_ref())
                    .or_else(|| {
                        env::var("ANTHROPIC_API_KEY")
                            .ok()
                            .filter(|k| !k.trim().is_empty())
                    })
                    .ok_or(ConfigError::Invalid {
                        field: "judge.api_key",
                        reason: "set it or export ANTHROPIC_API_KEY".to_string(),
                    })?;
                let mut judge = ClaudeJudge::new(key);
                if let Some(model) = expanded(self.model.as_ref()) {
                    judge = judge.with_model(model);
                }
                if let Some(url) = expanded(self.url.as_ref()) {
                    judge = judge.with_url(url);
                }
                Ok(RemoteJudge::Claude(judge))
            }
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_EVALUATION_TIMEOUT, Duration::from_secs)
    }
}

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub public_table: Option<String>,
    pub secret_table: Option<String>,
    pub depth_table: Option<String>,
}

impl std::fmt::Debug for ContentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &mask(self.api_key.as_ref()))
            .field("public_table", &self.public_table)
            .field("secret_table", &self.secret_table)
            .field("depth_table", &self.depth_table)
            .finish()
    }
}

impl ContentConfig {
    #[must_use]
    pub fn tables(&self) -> ContentTables {
        let defaults = ContentTables::default();
        ContentTables {
            public: expanded(self.public_table.as_ref()).unwrap_or(defaults.public),
            secret: expanded(self.secret_table.as_ref()).unwrap_or(defaults.secret),
            depth: expanded(self.depth_table.as_ref()).unwrap_or(defaults.depth),
        }
    }

    pub fn build_store(&self) -> Result<RestContentStore, ConfigError> {
        let base_url = expanded(self.base_url.as_ref()).ok_or(ConfigError::Invalid {
            field: "content.base_url",
            reason: "required".to_string(),
        })?;
        let api_key = expanded(self.api_key.as_ref()).unwrap_or_default();
        Ok(RestContentStore::new(base_url, api_key).with_tables(self.tables()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrientationSetting {
    #[default]
    Available,
    Permission,
    Unsupported,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    #[serde(default)]
    pub orientation: OrientationSetting,
    /// Disables the tilt gesture.
    #[serde(default)]
    pub reduced_motion: bool,
}

impl DeviceConfig {
    #[must_use]
    pub fn orientation_support(&self) -> OrientationSupport {
        if self.reduced_motion {
            return OrientationSupport::ReducedMotion;
        }
        match self.orientation {
            OrientationSetting::Available => OrientationSupport::Available,
            OrientationSetting::Permission => OrientationSupport::PermissionRequired,
            OrientationSetting::Unsupported => OrientationSupport::Unsupported,
        }
    }
}

/// Replace `${VAR}` with the variable's value; unset variables expand to
/// nothing and an unterminated `${` is kept literally.
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

impl ThresholdConfig {
    /// Load `~/.threshold/config.toml`. `Ok(None)` when there is no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Configured judge; disabled when no `[judge]` section exists.
    pub fn judge(&self) -> Result<RemoteJudge, ConfigError> {
        self.judge
            .as_ref()
            .map_or(Ok(RemoteJudge::Disabled), JudgeConfig::build_judge)
    }

    #[must_use]
    pub fn evaluation_timeout(&self) -> Duration {
        self.judge
            .as_ref()
            .map_or(DEFAULT_EVALUATION_TIMEOUT, JudgeConfig::timeout)
    }

    /// Configured content store; an empty in-memory store without `[content]`.
    pub fn content_source(&self) -> Result<ContentSource, ConfigError> {
        match &self.content {
            Some(content) => Ok(ContentSource::Rest(content.build_store()?)),
            None => Ok(ContentSource::Static(StaticContentStore::new())),
        }
    }

    #[must_use]
    pub fn orientation_support(&self) -> OrientationSupport {
        self.device
            .as_ref()
            .map_or(OrientationSupport::Available, DeviceConfig::orientation_support)
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".threshold").join("config.toml"))
}
