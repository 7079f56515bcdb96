use crate::mood::Mood;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_HOSTNAME: &str = "http://localhost:8000";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the API host; `/api/vision` is appended to it.
    pub api_hostname: String,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default)]
    pub default_mood: Mood,
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_hostname: DEFAULT_API_HOSTNAME.into(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            default_mood: Mood::default(),
        }
    }
}

impl AppConfig {
    pub fn with_api_hostname(mut self, host: impl Into<String>) -> Self {
        self.api_hostname = host.into();
        self
    }
}
