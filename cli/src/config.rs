use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Logging verbosity, persisted in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "off" => LogLevel::Off,
            "error" => LogLevel::Error,
            "warn" => LogLevel::Warn,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => LogLevel::Info,
        }
    }

    /// None disables logging entirely.
    pub fn as_tracing_level(&self) -> Option<tracing::Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(tracing::Level::ERROR),
            LogLevel::Warn => Some(tracing::Level::WARN),
            LogLevel::Info => Some(tracing::Level::INFO),
            LogLevel::Debug => Some(tracing::Level::DEBUG),
            LogLevel::Trace => Some(tracing::Level::TRACE),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Sampling cadence in milliseconds.
    pub interval_ms: u64,
    /// Poll cadence of the voltage/level monitor in milliseconds.
    pub monitor_interval_ms: u64,
    /// Output file; defaults to `<data_dir>/battery.csv` when unset.
    pub output: Option<PathBuf>,
    pub log_level: LogLevel,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            monitor_interval_ms: 500,
            output: None,
            log_level: LogLevel::Info,
        }
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("voltlog")
}

pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("voltlog")
}

pub fn runtime_dir() -> PathBuf {
    dirs::runtime_dir()
        .or_else(dirs::cache_dir)
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("voltlog")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

pub fn default_output_path() -> PathBuf {
    data_dir().join("battery.csv")
}

pub fn ensure_dirs() -> std::io::Result<()> {
    fs::create_dir_all(config_dir())?;
    fs::create_dir_all(data_dir())?;
    Ok(())
}

impl UserConfig {
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> std::io::Result<()> {
        let _ = ensure_dirs();
        let path = config_path();
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        fs::write(path, content)
    }

    pub fn merge_with_args(&mut self, interval_ms: Option<u64>, output: Option<PathBuf>) {
        if let Some(ms) = interval_ms {
            self.interval_ms = ms;
        }
        if let Some(path) = output {
            self.output = Some(path);
        }
    }

    pub fn effective_output(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(default_output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_str() {
        assert_eq!(LogLevel::from_str("off"), LogLevel::Off);
        assert_eq!(LogLevel::from_str("TRACE"), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("bogus"), LogLevel::Info);
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = UserConfig::default();
        config.merge_with_args(Some(250), Some(PathBuf::from("/tmp/out.csv")));
        assert_eq!(config.interval_ms, 250);
        assert_eq!(config.output, Some(PathBuf::from("/tmp/out.csv")));

        config.merge_with_args(None, None);
        assert_eq!(config.interval_ms, 250);
        assert_eq!(config.output, Some(PathBuf::from("/tmp/out.csv")));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = UserConfig {
            interval_ms: 2000,
            monitor_interval_ms: 500,
            output: Some(PathBuf::from("/var/log/battery.csv")),
            log_level: LogLevel::Debug,
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: UserConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.interval_ms, 2000);
        assert_eq!(parsed.output, Some(PathBuf::from("/var/log/battery.csv")));
        assert_eq!(parsed.log_level, LogLevel::Debug);
    }
}
