use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::engine::alert::DEFAULT_CPU_THRESHOLD;
use crate::engine::sample::DEFAULT_WINDOW_SIZE;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub alert: AlertConfig,
    pub remote: RemoteConfig,
    pub local: LocalConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub poll_interval_ms: u64,
    pub window_size: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            poll_interval_ms: 10_000,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub cpu_threshold: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        AlertConfig {
            cpu_threshold: DEFAULT_CPU_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    #[default]
    Remote,
    Local,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub mode: SourceMode,
    pub base_url: String,
    pub stream_path: String,
    pub processes_path: String,
    pub kill_path: String,
    pub request_timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            mode: SourceMode::Remote,
            base_url: "http://localhost:8080".to_string(),
            stream_path: "/ws".to_string(),
            processes_path: "/processes".to_string(),
            kill_path: "/kill".to_string(),
            request_timeout_ms: 5_000,
        }
    }
}

impl RemoteConfig {
    fn join(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn processes_url(&self) -> String {
        self.join(&self.processes_path)
    }

    pub fn kill_url(&self) -> String {
        self.join(&self.kill_path)
    }

    /// WebSocket URL derived from `base_url` (`http` -> `ws`, `https` -> `wss`).
    pub fn stream_url(&self) -> String {
        let http = self.join(&self.stream_path);
        if let Some(rest) = http.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = http.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            http
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub sample_interval_ms: u64,
    pub max_processes: usize,
}

impl Default for LocalConfig {
    fn default() -> Self {
        LocalConfig {
            sample_interval_ms: 2_000,
            max_processes: 50,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: None,
            json: false,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("gaze").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}
