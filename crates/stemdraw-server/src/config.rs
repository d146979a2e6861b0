//! Configuration for the Stemdraw server
//!
//! Loaded from environment variables with sensible defaults; the server
//! runs with no configuration at all, in which case the LLM planner is
//! disabled and the audit stage is simulated.

use serde::{Deserialize, Serialize};
use std::env;
use tracing::{info, warn};

use crate::error::{ServerError, ServerResult};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Host to bind to
    #[serde(default = "default_host")]
    pub bind_address: String,

    /// Directory rendered artifacts are written under
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Origin allowed by CORS (the frontend editor)
    #[serde(default = "default_frontend_origin")]
    pub frontend_origin: String,

    /// DeepSeek API key; absent disables the LLM planner and makes the
    /// audit simulated
    #[serde(default)]
    pub deepseek_api_key: Option<String>,

    /// DeepSeek API base URL
    #[serde(default = "default_deepseek_api_url")]
    pub deepseek_api_url: String,

    /// DeepSeek model identifier
    #[serde(default = "default_deepseek_model")]
    pub deepseek_model: String,

    /// Quality score (0-100) a plan must reach
    #[serde(default = "default_quality_threshold")]
    pub quality_threshold: u8,

    /// Maximum layout refinement passes
    #[serde(default = "default_max_refinement_passes")]
    pub max_refinement_passes: u32,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_port() -> u16 {
    5000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_frontend_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_deepseek_api_url() -> String {
    stemdraw_llm::DEFAULT_BASE_URL.to_string()
}

fn default_deepseek_model() -> String {
    stemdraw_llm::DEFAULT_MODEL.to_string()
}

fn default_quality_threshold() -> u8 {
    70
}

fn default_max_refinement_passes() -> u32 {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn load() -> ServerResult<Self> {
        let mut config = Self::default();

        if let Ok(port) = env::var("SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                config.port = port;
            } else {
                warn!("Invalid SERVER_PORT value: {}", port);
            }
        }

        if let Ok(host) = env::var("SERVER_HOST") {
            config.bind_address = host;
        }

        if let Ok(output_dir) = env::var("OUTPUT_DIR") {
            config.output_dir = output_dir;
        }

        if let Ok(origin) = env::var("FRONTEND_ORIGIN") {
            config.frontend_origin = origin;
        }

        if let Ok(api_key) = env::var("DEEPSEEK_API_KEY") {
            if !api_key.trim().is_empty() {
                config.deepseek_api_key = Some(api_key);
            }
        }

        if let Ok(api_url) = env::var("DEEPSEEK_API_URL") {
            config.deepseek_api_url = api_url;
        }

        if let Ok(model) = env::var("DEEPSEEK_MODEL") {
            config.deepseek_model = model;
        }

        if let Ok(threshold) = env::var("QUALITY_THRESHOLD") {
            match threshold.parse::<u8>() {
                Ok(value) if value <= 100 => config.quality_threshold = value,
                _ => warn!("Invalid QUALITY_THRESHOLD value: {}", threshold),
            }
        }

        if let Ok(passes) = env::var("MAX_REFINEMENT_PASSES") {
            if let Ok(value) = passes.parse::<u32>() {
                config.max_refinement_passes = value;
            } else {
                warn!("Invalid MAX_REFINEMENT_PASSES value: {}", passes);
            }
        }

        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.log_level = log_level;
        }

        config.validate()?;

        if config.deepseek_api_key.is_none() {
            warn!("No DEEPSEEK_API_KEY provided - LLM planner disabled, audit will be simulated");
        }

        info!("Loaded server configuration");
        Ok(config)
    }

    /// Reject configurations the server cannot run with.
    pub fn validate(&self) -> ServerResult<()> {
        if self.quality_threshold > 100 {
            return Err(ServerError::ConfigError(
                "quality threshold must be within 0-100".to_string(),
            ));
        }
        if self.output_dir.trim().is_empty() {
            return Err(ServerError::ConfigError(
                "output directory must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the optional LLM stages are configured.
    pub fn llm_enabled(&self) -> bool {
        self.deepseek_api_key.is_some()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_host(),
            output_dir: default_output_dir(),
            frontend_origin: default_frontend_origin(),
            deepseek_api_key: None,
            deepseek_api_url: default_deepseek_api_url(),
            deepseek_model: default_deepseek_model(),
            quality_threshold: default_quality_threshold(),
            max_refinement_passes: default_max_refinement_passes(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_contract() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.output_dir, "output");
        assert_eq!(config.frontend_origin, "http://localhost:3000");
        assert_eq!(config.quality_threshold, 70);
        assert!(!config.llm_enabled());
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let config = ServerConfig {
            quality_threshold: 101,
            ..ServerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ServerError::ConfigError(_))
        ));
    }
}
