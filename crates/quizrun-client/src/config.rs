//! Client configuration and factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizrun_core::controller::DEFAULT_CATEGORY_QUESTION_COUNT;
use quizrun_core::traits::Role;
use quizrun_core::QuizSessionController;

use crate::credentials::StaticCredentials;
use crate::http::{HttpQuizService, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Top-level quizrun configuration.
///
/// Note: Custom Debug impl masks the token to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct QuizrunConfig {
    /// Backend base URL, including the `/api` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token issued by the backend.
    #[serde(default)]
    pub token: Option<String>,
    /// Role of the token's user.
    #[serde(default)]
    pub role: Role,
    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Questions drawn when starting a quiz from a category.
    #[serde(default = "default_question_count")]
    pub default_question_count: u32,
    /// Where completed results are saved, if anywhere.
    #[serde(default)]
    pub results_dir: Option<PathBuf>,
}

impl std::fmt::Debug for QuizrunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizrunConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("role", &self.role)
            .field("timeout_secs", &self.timeout_secs)
            .field("default_question_count", &self.default_question_count)
            .field("results_dir", &self.results_dir)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_question_count() -> u32 {
    DEFAULT_CATEGORY_QUESTION_COUNT
}

impl Default for QuizrunConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            role: Role::default(),
            timeout_secs: default_timeout(),
            default_question_count: default_question_count(),
            results_dir: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are inserted as-is and never expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

/// Apply `QUIZRUN_*` overrides using `lookup` to read variables.
fn apply_overrides(
    config: &mut QuizrunConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(token) = lookup("QUIZRUN_TOKEN") {
        config.token = Some(token);
    }
    if let Some(role) = lookup("QUIZRUN_ROLE") {
        config.role = role
            .parse()
            .map_err(|e: String| anyhow::anyhow!("QUIZRUN_ROLE: {e}"))?;
    }
    if let Some(url) = lookup("QUIZRUN_BASE_URL") {
        config.base_url = url;
    }
    Ok(())
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `quizrun.toml` in the current directory
/// 2. `~/.config/quizrun/config.toml`
///
/// Environment variable overrides: `QUIZRUN_TOKEN`, `QUIZRUN_ROLE`, `QUIZRUN_BASE_URL`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizrunConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => existing_config_path(),
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizrunConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizrunConfig::default(),
    };

    config.base_url = resolve_env_vars(&config.base_url);
    config.token = config.token.as_deref().map(resolve_env_vars);
    config.results_dir = config
        .results_dir
        .as_ref()
        .map(|dir| PathBuf::from(resolve_env_vars(&dir.to_string_lossy())));

    // Overrides are taken literally.
    apply_overrides(&mut config, |name| std::env::var(name).ok())?;

    Ok(config)
}

/// Config file that `quizrun login` writes to: the explicit path, else the
/// file `load_config_from` would read, else a new local `quizrun.toml`.
pub fn writable_config_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .or_else(existing_config_path)
        .unwrap_or_else(|| PathBuf::from("quizrun.toml"))
}

fn existing_config_path() -> Option<PathBuf> {
    let local = PathBuf::from("quizrun.toml");
    if local.exists() {
        return Some(local);
    }
    dirs_path()
        .map(|home| home.join("config.toml"))
        .filter(|global| global.exists())
}

/// Store `token` and `role` in the config file at `path`, creating it if
/// needed. Other keys and comments are kept.
pub fn save_credentials(path: &Path, token: &str, role: Role) -> Result<()> {
    let content = if path.exists() {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?
    } else {
        String::new()
    };
    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .with_context(|| format!("failed to parse config: {}", path.display()))?;

    doc["token"] = toml_edit::value(token);
    doc["role"] = toml_edit::value(role.to_string());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, doc.to_string())
        .with_context(|| format!("failed to write config: {}", path.display()))?;
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizrun"))
}

/// Build a session controller talking to the configured backend.
pub fn create_controller(config: &QuizrunConfig) -> Result<QuizSessionController> {
    let credentials = Arc::new(StaticCredentials::new(config.token.clone(), config.role));
    let service = HttpQuizService::new(
        Some(config.base_url.clone()),
        config.timeout_secs,
        credentials.clone(),
    )?;
    Ok(QuizSessionController::new(Arc::new(service), credentials))
}
