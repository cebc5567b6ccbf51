use crate::domains::assignment::Priority;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub submission: SubmissionConfig,
    pub reminders: ReminderConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    #[default]
    Sequential,
    Concurrent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    pub mode: DispatchMode,
    /// Upper bound on requests in flight when `mode` is concurrent.
    pub max_in_flight: usize,
    pub request_timeout_ms: u64,
    pub default_priority: Priority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub check_interval_secs: u64,
    pub clock_skew_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// When set, domain log lines are also written to this file.
    pub file: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            mode: DispatchMode::Sequential,
            max_in_flight: 4,
            request_timeout_ms: 10_000,
            default_priority: Priority::Medium,
        }
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self { poll_interval_secs: 30 }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: 60,
            clock_skew_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl SubmissionConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Defaults, then the optional TOML file, then `CRM_ASSIGN__SECTION__KEY`
    /// environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder()
            .add_source(::config::Config::try_from(&Config::default())?);
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).format(::config::FileFormat::Toml));
        }
        let settings = builder
            .add_source(
                ::config::Environment::with_prefix("CRM_ASSIGN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let cfg = Config::default();
        assert_eq!(cfg.api.base_url, "http://localhost:5000/api");
        assert_eq!(cfg.submission.mode, DispatchMode::Sequential);
        assert_eq!(cfg.submission.default_priority, Priority::Medium);
        assert_eq!(cfg.reminders.poll_interval_secs, 30);
        assert_eq!(cfg.session.clock_skew_secs, 30);
        assert!(cfg.logging.file.is_none());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [submission]
            mode = "concurrent"
            default_priority = "urgent"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.submission.mode, DispatchMode::Concurrent);
        assert_eq!(cfg.submission.default_priority, Priority::Urgent);
        assert_eq!(cfg.submission.max_in_flight, 4);
        assert_eq!(cfg.api.request_timeout_ms, 10_000);
    }

    #[tokio::test]
    async fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crm-assign.toml");
        std::fs::write(&path, "[api]\nbase_url = \"https://crm.example.com/api\"\n").unwrap();

        let cfg = Config::from_file(&path).await.unwrap();
        assert_eq!(cfg.api.base_url, "https://crm.example.com/api");
        assert_eq!(cfg.api.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn load_layers_file_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crm-assign.toml");
        std::fs::write(&path, "[reminders]\npoll_interval_secs = 5\n").unwrap();

        let cfg = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(cfg.reminders.poll_interval_secs, 5);
        assert_eq!(cfg.session.check_interval_secs, 60);
    }
}
