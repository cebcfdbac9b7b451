//! Configuration management for graph-walks
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

const OUTPUT_FORMATS: [&str; 3] = ["json", "markdown", "text"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub social: SocialSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialSettings {
    pub num_users: usize,
    pub avg_friendships: usize,
    /// Cap on random pairs sampled while populating; derived from the target when unset
    pub max_attempts: Option<usize>,
    /// Fixed seed for reproducible networks
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            social: SocialSettings {
                num_users: 10,
                avg_friendships: 2,
                max_attempts: None,
                seed: None,
            },
            output: OutputSettings {
                format: "text".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Load configuration from environment variables
    pub fn load_from_env() -> Result<Self> {
        let mut config = Config::default();

        // Override with environment variables if present
        if let Ok(num_users) = std::env::var("GRAPH_WALKS_NUM_USERS") {
            config.social.num_users = num_users.parse()?;
        }

        if let Ok(avg) = std::env::var("GRAPH_WALKS_AVG_FRIENDSHIPS") {
            config.social.avg_friendships = avg.parse()?;
        }

        if let Ok(max_attempts) = std::env::var("GRAPH_WALKS_MAX_ATTEMPTS") {
            config.social.max_attempts = Some(max_attempts.parse()?);
        }

        if let Ok(seed) = std::env::var("GRAPH_WALKS_SEED") {
            config.social.seed = Some(seed.parse()?);
        }

        if let Ok(format) = std::env::var("GRAPH_WALKS_OUTPUT_FORMAT") {
            config.output.format = format;
        }

        Ok(config)
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge_with(&mut self, other: Config) {
        let defaults = Config::default();

        if other.social.num_users != defaults.social.num_users {
            self.social.num_users = other.social.num_users;
        }
        if other.social.avg_friendships != defaults.social.avg_friendships {
            self.social.avg_friendships = other.social.avg_friendships;
        }
        if other.social.max_attempts.is_some() {
            self.social.max_attempts = other.social.max_attempts;
        }
        if other.social.seed.is_some() {
            self.social.seed = other.social.seed;
        }

        if other.output.format != defaults.output.format {
            self.output.format = other.output.format;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.social.num_users == 0 {
            return Err(anyhow::anyhow!("Number of users must be greater than 0"));
        }

        if self.social.avg_friendships >= self.social.num_users {
            return Err(anyhow::anyhow!(
                "Average friendships ({}) must be smaller than the number of users ({})",
                self.social.avg_friendships,
                self.social.num_users
            ));
        }

        if self.social.max_attempts == Some(0) {
            return Err(anyhow::anyhow!("Maximum attempts must be greater than 0"));
        }

        if !OUTPUT_FORMATS.contains(&self.output.format.to_lowercase().as_str()) {
            return Err(anyhow::anyhow!("Unsupported output format: {}", self.output.format));
        }

        Ok(())
    }
}
