//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.moodify/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::Provider;
use crate::core::persona::Persona;
use crate::inference::providers::chat_completions::{
    DEFAULT_DEEPSEEK_BASE_URL, DEFAULT_OPENAI_BASE_URL,
};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct MoodifyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub openai: EndpointConfig,
    #[serde(default)]
    pub deepseek: EndpointConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeneralConfig {
    pub default_provider: Option<Provider>,
    pub default_model: Option<String>,
    pub system_prompt: Option<String>,
    pub system_prompt_file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EndpointConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_DEEPSEEK_MODEL: &str = "deepseek-chat";

// ============================================================================
// Resolved Config (concrete values, no Options except credentials)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub provider: Provider,
    pub model_name: String,
    pub persona: Persona,
    /// Empty means the conversation starts without a system message.
    pub system_prompt: String,
    pub api_key: Option<String>,
    pub base_url: String,
}

/// Values taken from the command line. `None` = flag not given.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub persona: Persona,
    pub system_prompt: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.moodify`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".moodify"))
}

/// Returns the path to `~/.moodify/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.moodify/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `MoodifyConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<MoodifyConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(MoodifyConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<MoodifyConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(MoodifyConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: MoodifyConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", redacted(&config));
    Ok(config)
}

/// Config summary for logging without credentials.
fn redacted(config: &MoodifyConfig) -> String {
    format!(
        "provider={:?}, model={:?}, system_prompt={}, system_prompt_file={:?}, openai_key={}, deepseek_key={}",
        config.general.default_provider,
        config.general.default_model,
        config.general.system_prompt.is_some(),
        config.general.system_prompt_file,
        config.openai.api_key.is_some(),
        config.deepseek.api_key.is_some(),
    )
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Moodify Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_provider = "openai"        # "openai" or "deepseek"
# default_model = "gpt-3.5-turbo"    # only applies to default_provider
# system_prompt = "You are a helpful assistant."   # used by `moodify chat`
# system_prompt_file = "system.md"   # Path relative to ~/.moodify/

# [openai]
# api_key = "sk-..."                 # Or set OPENAI_API_KEY env var
# base_url = "https://api.openai.com/v1"
# model = "gpt-3.5-turbo"

# [deepseek]
# api_key = "sk-..."                 # Or set DEEPSEEK_API_KEY env var
# base_url = "https://api.deepseek.com"
# model = "deepseek-chat"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &MoodifyConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`] with an injectable environment lookup.
pub fn resolve_with_env(
    config: &MoodifyConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Provider: CLI → env → config → default
    let provider = cli
        .provider
        .or_else(|| env("MOODIFY_PROVIDER").and_then(|s| Provider::parse(&s)))
        .or(config.general.default_provider)
        .unwrap_or_default();

    let (endpoint, key_var, url_var, default_url, default_model) = match provider {
        Provider::OpenAi => (
            &config.openai,
            "OPENAI_API_KEY",
            "OPENAI_BASE_URL",
            DEFAULT_OPENAI_BASE_URL,
            DEFAULT_OPENAI_MODEL,
        ),
        Provider::DeepSeek => (
            &config.deepseek,
            "DEEPSEEK_API_KEY",
            "DEEPSEEK_BASE_URL",
            DEFAULT_DEEPSEEK_BASE_URL,
            DEFAULT_DEEPSEEK_MODEL,
        ),
    };

    // Model: CLI → env → endpoint section → general (own provider only) → provider default
    let general_model = config
        .general
        .default_model
        .clone()
        .filter(|_| config.general.default_provider.unwrap_or_default() == provider);
    let model_name = cli
        .model
        .clone()
        .or_else(|| env("MOODIFY_MODEL"))
        .or_else(|| endpoint.model.clone())
        .or(general_model)
        .unwrap_or_else(|| default_model.to_string());

    // API key: env → config
    let api_key = env(key_var).or_else(|| endpoint.api_key.clone());

    // Base URL: env → config → default
    let base_url = env(url_var)
        .or_else(|| endpoint.base_url.clone())
        .unwrap_or_else(|| default_url.to_string());

    ResolvedConfig {
        provider,
        model_name,
        persona: cli.persona,
        system_prompt: resolve_system_prompt(config, cli, config_dir().as_deref()),
        api_key,
        base_url,
    }
}

/// Persona instruction wins, then the CLI prompt, then inline config, then
/// the prompt file. No match leaves the prompt empty.
fn resolve_system_prompt(
    config: &MoodifyConfig,
    cli: &CliOverrides,
    base_dir: Option<&Path>,
) -> String {
    if let Some(instruction) = cli.persona.instruction() {
        return instruction.to_string();
    }

    if let Some(ref prompt) = cli.system_prompt {
        return prompt.clone();
    }

    if let Some(ref prompt) = config.general.system_prompt {
        return prompt.clone();
    }

    if let Some(ref file) = config.general.system_prompt_file
        && let Some(dir) = base_dir
    {
        let prompt_path = dir.join(file);
        match fs::read_to_string(&prompt_path) {
            Ok(contents) => {
                let trimmed = contents.trim().to_string();
                if !trimmed.is_empty() {
                    info!("Loaded system prompt from {}", prompt_path.display());
                    return trimmed;
                }
                warn!("System prompt file is empty: {}", prompt_path.display());
            }
            Err(e) => {
                warn!(
                    "Failed to read system prompt file {}: {}",
                    prompt_path.display(),
                    e
                );
            }
        }
    }

    String::new()
}
