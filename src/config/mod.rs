//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::record::TransitionalRule;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_sort() -> String {
    "name".to_string()
}

fn default_poll_interval_ms() -> u64 {
    5000
}

fn default_backoff_multiplier() -> u32 {
    2
}

/// Configuration of one landing page resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceConfig {
    /// Namespace for persisted preferences and events (e.g., "volumes")
    pub key: String,

    /// JSON endpoint returning `{ "results": [...] }`
    pub endpoint: String,

    /// Sort key used when none is persisted
    #[serde(default = "default_sort")]
    pub default_sort: String,

    /// Ordered fields searched by the free-text filter
    #[serde(default)]
    pub search_fields: Vec<String>,

    /// `status` values that count as transitional
    #[serde(default)]
    pub transitional_statuses: Vec<String>,

    /// Delay before the next fetch while records are transitional
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Retries after a retryable fetch failure (0 stops polling on failure)
    #[serde(default)]
    pub max_retries: u32,

    /// Delay multiplier applied per consecutive retry
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: u32,
}

impl ResourceConfig {
    /// Create a resource with default settings
    pub fn new(key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            endpoint: endpoint.into(),
            default_sort: default_sort(),
            search_fields: Vec::new(),
            transitional_statuses: Vec::new(),
            poll_interval_ms: default_poll_interval_ms(),
            max_retries: 0,
            backoff_multiplier: default_backoff_multiplier(),
        }
    }

    pub fn with_search_fields(mut self, fields: &[&str]) -> Self {
        self.search_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_transitional_statuses(mut self, statuses: &[&str]) -> Self {
        self.transitional_statuses = statuses.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    pub fn with_default_sort(mut self, sort: impl Into<String>) -> Self {
        self.default_sort = sort.into();
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Rule deciding which records keep the list polling
    pub fn transitional_rule(&self) -> TransitionalRule {
        TransitionalRule::new(self.transitional_statuses.iter().cloned())
    }

    /// Check values serde cannot reject on its own
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "key".to_string(),
                value: self.key.clone(),
                message: "resource key must not be empty".to_string(),
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_ms".to_string(),
                value: "0".to_string(),
                message: format!("resource '{}' must poll with a positive delay", self.key),
            });
        }
        if self.backoff_multiplier == 0 {
            return Err(ConfigError::InvalidValue {
                field: "backoff_multiplier".to_string(),
                value: "0".to_string(),
                message: format!("resource '{}' needs a multiplier of at least 1", self.key),
            });
        }
        Ok(())
    }
}

/// Complete configuration of the console's landing pages
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConsoleConfig {
    /// List of resource configurations
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
}

impl ConsoleConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every resource
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.resources.iter().try_for_each(ResourceConfig::validate)
    }

    /// Find a resource by key
    pub fn resource(&self, key: &str) -> std::result::Result<&ResourceConfig, ConfigError> {
        self.resources
            .iter()
            .find(|r| r.key == key)
            .ok_or_else(|| ConfigError::UnknownResource {
                key: key.to_string(),
            })
    }

    /// Merge several configurations
    ///
    /// Resources are matched by key; a later definition replaces an earlier
    /// one in place, new keys are appended in order.
    pub fn merge(configs: Vec<ConsoleConfig>) -> Self {
        let mut resources: Vec<ResourceConfig> = Vec::new();
        for config in configs {
            for resource in config.resources {
                match resources.iter_mut().find(|r| r.key == resource.key) {
                    Some(existing) => *existing = resource,
                    None => resources.push(resource),
                }
            }
        }
        Self { resources }
    }

    /// Default configuration of the console landing pages
    pub fn default_config() -> Self {
        Self {
            resources: vec![
                ResourceConfig::new("volumes", "/volumes/json")
                    .with_search_fields(&["name", "id", "zone", "status", "instance", "snapshot_id"])
                    .with_transitional_statuses(&["attaching", "detaching", "creating", "deleting"]),
                ResourceConfig::new("instance_volumes", "/instances/volumes/json")
                    .with_default_sort("device")
                    .with_transitional_statuses(&["attaching", "detaching"])
                    .with_poll_interval_ms(4000),
                ResourceConfig::new("scalinggroup_instances", "/scalinggroups/instances/json")
                    .with_default_sort("id")
                    .with_search_fields(&["id", "availability_zone", "health_status"]),
                ResourceConfig::new("images", "/images/json")
                    .with_search_fields(&["name", "id", "architecture", "description", "tagged_name"]),
                ResourceConfig::new("instances", "/instances/json")
                    .with_default_sort("launch_time")
                    .with_search_fields(&["name", "id", "ip_address", "placement", "key_name"])
                    .with_transitional_statuses(&["pending", "stopping", "shutting-down"]),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConsoleConfig::default_config();
        assert_eq!(config.resources.len(), 5);
        assert!(config.validate().is_ok());

        let volumes = config.resource("volumes").unwrap();
        assert_eq!(volumes.poll_interval_ms, 5000);
        assert_eq!(config.resource("instance_volumes").unwrap().poll_interval_ms, 4000);
    }

    #[test]
    fn test_yaml_serialization() {
        let config = ConsoleConfig::default_config();
        let yaml = serde_yaml::to_string(&config).unwrap();

        let parsed = ConsoleConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_yaml_defaults_applied() {
        let parsed = ConsoleConfig::from_yaml_str(
            r#"
resources:
  - key: snapshots
    endpoint: /snapshots/json
"#,
        )
        .unwrap();

        let snapshots = parsed.resource("snapshots").unwrap();
        assert_eq!(snapshots.default_sort, "name");
        assert_eq!(snapshots.poll_interval(), Duration::from_secs(5));
        assert_eq!(snapshots.max_retries, 0);
        assert_eq!(snapshots.backoff_multiplier, 2);
    }

    #[test]
    fn test_unknown_resource() {
        let config = ConsoleConfig::default_config();
        assert!(matches!(
            config.resource("buckets"),
            Err(ConfigError::UnknownResource { .. })
        ));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = ConsoleConfig::from_yaml_str(
            r#"
resources:
  - key: volumes
    endpoint: /volumes/json
    poll_interval_ms: 0
"#,
        );
        assert!(result.is_err());
    }
}
