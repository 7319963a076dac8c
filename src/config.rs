use url::Url;

use crate::errors::ForwardError;
use crate::field_mapping::FieldSchema;
use crate::models::Credentials;

pub const DEFAULT_WIZZIO_BASE_URL: &str = "https://api.wizio.fr";

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub wizzio_api_key: Option<String>,
    pub wizzio_api_secret: Option<String>,
    pub wizzio_base_url: String,
    pub field_schema: FieldSchema,
    pub request_timeout_secs: u64,
    pub cors_allowed_origin: Option<String>,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            // Credentials are checked per request so a misconfigured deployment
            // still answers with a state 9 envelope.
            wizzio_api_key: optional_var("WIZZIO_API_KEY"),
            wizzio_api_secret: optional_var("WIZZIO_API_SECRET"),
            wizzio_base_url: optional_var("WIZZIO_BASE_URL")
                .unwrap_or_else(|| DEFAULT_WIZZIO_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            field_schema: optional_var("WIZZIO_FIELD_SCHEMA")
                .map(|s| s.parse::<FieldSchema>())
                .transpose()
                .map_err(|e| anyhow::anyhow!("WIZZIO_FIELD_SCHEMA: {}", e))?
                .unwrap_or_default(),
            request_timeout_secs: parse_or("WIZZIO_TIMEOUT_SECS", 30)?,
            cors_allowed_origin: optional_var("CORS_ALLOWED_ORIGIN").filter(|o| o != "*"),
            rate_limit_per_second: parse_or("RATE_LIMIT_PER_SECOND", 5)?,
            rate_limit_burst: parse_or("RATE_LIMIT_BURST", 10)?,
        };

        config.validate()?;

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Wizzio Base URL: {}", config.wizzio_base_url);
        tracing::debug!("Field schema: {:?}", config.field_schema);
        tracing::debug!("Server Port: {}", config.port);
        if config.wizzio_api_key.is_none() || config.wizzio_api_secret.is_none() {
            tracing::warn!("WIZZIO_API_KEY or WIZZIO_API_SECRET not set, leads will be rejected");
        }

        Ok(config)
    }

    /// Checks values that cannot be expressed by parsing alone.
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = Url::parse(&self.wizzio_base_url)
            .map_err(|e| anyhow::anyhow!("WIZZIO_BASE_URL is not a valid URL: {}", e))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("WIZZIO_BASE_URL must start with http:// or https://");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("WIZZIO_TIMEOUT_SECS must be greater than 0");
        }
        if self.rate_limit_per_second == 0 || self.rate_limit_burst == 0 {
            anyhow::bail!("RATE_LIMIT_PER_SECOND and RATE_LIMIT_BURST must be greater than 0");
        }
        Ok(())
    }

    /// Resolves the Wizzio credential pair for one request.
    pub fn credentials(&self) -> Result<Credentials, ForwardError> {
        Credentials::new(
            self.wizzio_api_key.as_deref(),
            self.wizzio_api_secret.as_deref(),
        )
    }

    /// Endpoint receiving leads.
    pub fn push_lead_url(&self) -> String {
        format!("{}/v1/PushLead/push", self.wizzio_base_url)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("wizzio_api_key", &self.wizzio_api_key.as_ref().map(|_| "***"))
            .field("wizzio_api_secret", &self.wizzio_api_secret.as_ref().map(|_| "***"))
            .field("wizzio_base_url", &self.wizzio_base_url)
            .field("field_schema", &self.field_schema)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("cors_allowed_origin", &self.cors_allowed_origin)
            .field("rate_limit_per_second", &self.rate_limit_per_second)
            .field("rate_limit_burst", &self.rate_limit_burst)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            wizzio_api_key: None,
            wizzio_api_secret: None,
            wizzio_base_url: DEFAULT_WIZZIO_BASE_URL.to_string(),
            field_schema: FieldSchema::default(),
            request_timeout_secs: 30,
            cors_allowed_origin: None,
            rate_limit_per_second: 5,
            rate_limit_burst: 10,
        }
    }
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T> {
    match optional_var(name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a positive number, got '{}'", name, raw)),
        None => Ok(default),
    }
}
