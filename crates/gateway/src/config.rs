use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Settings for [`crate::GeminiGateway`].
///
/// The API key itself is not stored here: it is looked up in the process
/// environment on every request, trying `api_key_vars` in order.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub endpoint: String,
    pub model: String,
    pub api_key_vars: Vec<String>,
    pub request_timeout: Option<Duration>,
    pub max_retries: u32,
    pub retry_backoff: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            model: DEFAULT_MODEL.into(),
            api_key_vars: vec!["GEMINI_API_KEY".into(), "API_KEY".into()],
            request_timeout: None,
            max_retries: 0,
            retry_backoff: Duration::from_secs(1),
        }
    }
}

impl GatewaySettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(v) = lookup("GEMINI_ENDPOINT") {
            settings.endpoint = v;
        }
        if let Some(v) = lookup("APP__GEMINI_ENDPOINT") {
            settings.endpoint = v;
        }

        if let Some(v) = lookup("GEMINI_MODEL") {
            settings.model = v;
        }
        if let Some(v) = lookup("APP__GEMINI_MODEL") {
            settings.model = v;
        }

        if let Some(v) = lookup("APP__GENERATION_MAX_RETRIES") {
            if let Ok(parsed) = v.trim().parse::<u32>() {
                settings.max_retries = parsed;
            }
        }

        if let Some(v) = lookup("APP__GENERATION_RETRY_BACKOFF_MS") {
            if let Ok(parsed) = v.trim().parse::<u64>() {
                settings.retry_backoff = Duration::from_millis(parsed);
            }
        }

        if let Some(v) = lookup("APP__GENERATION_TIMEOUT_SECS") {
            match v.trim().parse::<u64>() {
                Ok(0) => settings.request_timeout = None,
                Ok(secs) => settings.request_timeout = Some(Duration::from_secs(secs)),
                Err(_) => {}
            }
        }

        settings
    }

    pub fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim().trim_end_matches('/'),
            self.model.trim()
        )
    }

    /// First non-blank key among `api_key_vars`, read at call time.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key_vars
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
