//! Registry configuration.

use serde::{Deserialize, Serialize};

/// Connection settings for the government open-data registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// API root, without the `/resource/...` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Dataset identifier of the enrolment resource
    #[serde(default = "default_resource_id")]
    pub resource_id: String,
    /// API key; requests are still sent without one
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.data.gov.in".to_string()
}

fn default_resource_id() -> String {
    "19eac040-0b94-49fa-b239-4f2fd8677d53".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            resource_id: default_resource_id(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RegistryConfig {
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}
