//! Layered settings: flags, environment, config file, defaults.
//!
//! The config file is optional JSON. Precedence is flag > environment >
//! file > built-in default.
use crate::auth::Credentials;
use crate::cli::RootArgs;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost:8443";
pub const DEFAULT_USER: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "admin";
pub const DEFAULT_HEARTBEAT_SECS: u64 = 120;
pub const DEFAULT_TIMEOUT_SECS: u64 = 3600;
pub const DEFAULT_LOG_LEVEL: &str = "warn";

pub const CONFIG_ENV: &str = "FLOWINVOKE_CONFIG";
pub const CREDENTIALS_ENV: &str = "FLOWINVOKE_CREDENTIALS";
pub const PASSWORD_ENV: &str = "FLOWINVOKE_PASSWORD";

/// Contents of `config.json`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub credentials: Option<String>,
    pub heartbeat: Option<u64>,
    pub timeout: Option<u64>,
    pub insecure: Option<bool>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub credentials: Credentials,
    pub heartbeat: Duration,
    pub timeout: Duration,
    pub insecure: bool,
    pub log_filter: String,
    pub log_file: Option<PathBuf>,
}

/// Snapshot of the environment variables the CLI reads.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub config: Option<PathBuf>,
    pub credentials: Option<String>,
    pub password: Option<String>,
    pub rust_log: Option<String>,
}

impl EnvOverrides {
    pub fn from_process() -> Self {
        EnvOverrides {
            config: env::var_os(CONFIG_ENV).map(PathBuf::from),
            credentials: non_empty_var(CREDENTIALS_ENV),
            password: non_empty_var(PASSWORD_ENV),
            rust_log: non_empty_var("RUST_LOG"),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Locate the config file: explicit flag, then env, then the user config dir.
///
/// An explicitly named file must exist; the default location is optional.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    env: &EnvOverrides,
) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit.map(Path::to_path_buf).or_else(|| env.config.clone()) {
        if !path.is_file() {
            return Err(anyhow!("config file not found at {}", path.display()));
        }
        return Ok(Some(path));
    }
    Ok(default_config_path().filter(|path| path.is_file()))
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("flowinvoke").join("config.json"))
}

pub fn load_config(path: &Path) -> Result<FileConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: FileConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config JSON {}", path.display()))?;
    Ok(config)
}

/// Merge CLI flags, environment and file config into run settings.
pub fn resolve_settings(
    args: &RootArgs,
    env: &EnvOverrides,
    file: FileConfig,
) -> Result<Settings> {
    if file.heartbeat == Some(0) {
        return Err(anyhow!("config heartbeat must be at least 1 second"));
    }

    let host = args
        .host
        .clone()
        .or(file.host)
        .unwrap_or_else(|| DEFAULT_HOST.to_string());

    let encoded = args
        .credentials
        .clone()
        .or_else(|| env.credentials.clone())
        .or(file.credentials);
    let credentials = match encoded {
        Some(encoded) => Credentials::Encoded(encoded),
        None => Credentials::UserPassword {
            user: args
                .user
                .clone()
                .or(file.user)
                .unwrap_or_else(|| DEFAULT_USER.to_string()),
            password: args
                .password
                .clone()
                .or_else(|| env.password.clone())
                .or(file.password)
                .unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
        },
    };

    let heartbeat = args
        .heartbeat
        .or(file.heartbeat)
        .unwrap_or(DEFAULT_HEARTBEAT_SECS);
    let timeout = args
        .timeout
        .or(file.timeout)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let log_filter = args
        .log_level
        .clone()
        .or_else(|| env.rust_log.clone())
        .or(file.log_level)
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

    Ok(Settings {
        host,
        credentials,
        heartbeat: Duration::from_secs(heartbeat),
        timeout: Duration::from_secs(timeout),
        insecure: args.insecure || file.insecure.unwrap_or(false),
        log_filter,
        log_file: args.log_file.clone().or(file.log_file),
    })
}

/// Load whatever config applies and resolve the final settings.
pub fn load_settings(args: &RootArgs) -> Result<Settings> {
    let env = EnvOverrides::from_process();
    let file = match resolve_config_path(args.config.as_deref(), &env)? {
        Some(path) => load_config(&path)?,
        None => FileConfig::default(),
    };
    resolve_settings(args, &env, file)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
