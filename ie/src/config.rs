//! imgedit configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main imgedit configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Prompt template location
    pub prompts: PromptsConfig,

    /// Remote edit configuration
    pub editor: EditorConfig,
}

impl Config {
    /// Validate configuration before issuing edits
    ///
    /// Fails fast when no edit command is configured or the API key cannot be found.
    pub fn validate(&self) -> Result<()> {
        if self.editor.command.trim().is_empty() {
            return Err(eyre::eyre!(
                "No edit command configured. Set editor.command in imgedit.yml."
            ));
        }
        if self.editor.api_key().is_none() {
            return Err(eyre::eyre!(
                "API key not found. Set the {} environment variable or editor.api-key-file.",
                self.editor.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: imgedit.yml
        let local_config = PathBuf::from("imgedit.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/imgedit/imgedit.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("imgedit").join("imgedit.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log level, before logging is set up
    ///
    /// Errors are swallowed; the full [`load`](Self::load) reports them later.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = [
            config_path.cloned(),
            Some(PathBuf::from("imgedit.yml")),
            dirs::config_dir().map(|d| d.join("imgedit").join("imgedit.yml")),
        ];

        candidates
            .iter()
            .flatten()
            .find(|p| p.exists())
            .and_then(|p| Self::load_from_file(p).ok())
            .and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Prompt template location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Root of the `<category>/<template>.md` tree
    pub dir: PathBuf,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("prompts"),
        }
    }
}

/// Remote edit configuration
///
/// The edit itself runs as an external command so the generative API's wire
/// format stays outside this crate. `{input}` and `{output}` in the command
/// are replaced with the source image and the file the result must be
/// written to; the prompt arrives on stdin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Shell command performing one edit
    pub command: String,

    /// Environment variable holding the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// File holding the API key, used when the variable is unset
    #[serde(rename = "api-key-file")]
    pub api_key_file: Option<PathBuf>,

    /// Per-attempt timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Retries after a transient failure
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Requested output aspect ratio, passed through as-is
    #[serde(rename = "aspect-ratio")]
    pub aspect_ratio: Option<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            command: String::new(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key_file: None,
            timeout_ms: 120_000,
            max_retries: 2,
            aspect_ratio: None,
        }
    }
}

impl EditorConfig {
    /// Resolve the API key from the environment, then the key file
    pub fn api_key(&self) -> Option<String> {
        if let Ok(key) = std::env::var(&self.api_key_env)
            && !key.trim().is_empty()
        {
            return Some(key.trim().to_string());
        }

        self.api_key_file
            .as_ref()
            .and_then(|path| fs::read_to_string(expand_home(path)).ok())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir().map(|home| home.join(rest)).unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
