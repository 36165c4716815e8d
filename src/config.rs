use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub llm: LlmConfig,
    pub agent: AgentConfig,
    pub search: SearchConfig,
    pub endpoints: EndpointsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout_ms: u64,
    pub base_url: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "meta-llama/llama-3-70b-instruct".to_string(),
            max_tokens: 500,
            temperature: 0.7,
            timeout_ms: 120000,
            base_url: "https://openrouter.ai/api/v1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub max_turns: u32,
    pub default_origin: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_turns: 8,
            default_origin: "BOS".to_string(),
        }
    }
}

/// Limits and filters applied to upstream search results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Per-category cap on collected items
    pub max_items: usize,
    /// Per-category cap when condensing for the summary prompt
    pub summary_items: usize,
    pub hotel_radius_km: u32,
    pub hotel_id_limit: usize,
    pub attraction_radius_m: u32,
    pub min_attraction_rating: f64,
    pub min_attraction_reviews: u64,
    pub flight_offer_limit: u32,
    pub event_page_size: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_items: 6,
            summary_items: 2,
            hotel_radius_km: 5,
            hotel_id_limit: 20,
            attraction_radius_m: 5000,
            min_attraction_rating: 4.2,
            min_attraction_reviews: 50,
            flight_offer_limit: 20,
            event_page_size: 10,
        }
    }
}

/// Upstream API base URLs, overridable for testing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub amadeus_base: String,
    pub ticketmaster_base: String,
    pub google_maps_base: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            amadeus_base: "https://test.api.amadeus.com".to_string(),
            ticketmaster_base: "https://app.ticketmaster.com".to_string(),
            google_maps_base: "https://maps.googleapis.com".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            llm: LlmConfig::default(),
            agent: AgentConfig::default(),
            search: SearchConfig::default(),
            endpoints: EndpointsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// API credentials, sourced from the environment only.
///
/// Secrets never live in the config file.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub openrouter_api_key: String,
    pub amadeus_client_id: String,
    pub amadeus_client_secret: String,
    pub ticketmaster_api_key: String,
    pub google_api_key: String,
}

impl Credentials {
    /// Read all upstream credentials from the environment
    pub fn from_env() -> crate::error::Result<Self> {
        Ok(Self {
            openrouter_api_key: require_env("OPENROUTER_API_KEY")?,
            amadeus_client_id: require_env("AMADEUS_API_KEY")?,
            amadeus_client_secret: require_env("AMADEUS_SECRET")?,
            ticketmaster_api_key: require_env("TICKETMASTER_API_KEY")?,
            google_api_key: require_env("GOOGLE_API_KEY")?,
        })
    }
}

fn require_env(name: &str) -> crate::error::Result<String> {
    std::env::var(name).map_err(|_| crate::error::TriprError::MissingApiKey(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.model, "meta-llama/llama-3-70b-instruct");
        assert_eq!(config.llm.max_tokens, 500);
        assert_eq!(config.agent.max_turns, 8);
        assert_eq!(config.agent.default_origin, "BOS");
        assert_eq!(config.search.max_items, 6);
        assert_eq!(config.search.summary_items, 2);
    }

    #[test]
    fn test_default_endpoints() {
        let endpoints = EndpointsConfig::default();
        assert!(endpoints.amadeus_base.contains("amadeus"));
        assert!(endpoints.ticketmaster_base.contains("ticketmaster"));
        assert!(endpoints.google_maps_base.contains("googleapis"));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tripr.yml");
        std::fs::write(
            &path,
            r#"
llm:
  model: "openai/gpt-4o-mini"
  max_tokens: 800
search:
  max_items: 3
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.llm.model, "openai/gpt-4o-mini");
        assert_eq!(config.llm.max_tokens, 800);
        assert_eq!(config.search.max_items, 3);
        // Unspecified sections fall back to defaults
        assert_eq!(config.agent.max_turns, 8);
    }

    #[test]
    fn test_load_explicit_path_missing() {
        let path = PathBuf::from("/nonexistent/tripr.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tripr.yml");
        std::fs::write(&path, "llm: [not a map").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let restored: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(restored.llm.model, config.llm.model);
        assert_eq!(restored.search.max_items, config.search.max_items);
    }
}
