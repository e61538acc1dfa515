use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub oauth: OAuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// Port the OAuth redirect lands on; shown in the link instructions.
    pub redirect_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: anima_client::DEFAULT_BASE_URL.to_string(),
            },
            oauth: OAuthConfig { redirect_port: 3000 },
        }
    }
}

impl Config {
    pub fn load(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn load_or_default(path: &PathBuf) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// `ANIMA_API_URL` wins over the config file.
    pub fn api_base_url(&self) -> String {
        std::env::var("ANIMA_API_URL").unwrap_or_else(|_| self.api.base_url.clone())
    }
}
