// src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::companion::CommitPolicy;
use crate::llm::{DEFAULT_MODEL, OPENROUTER_API_URL};
use crate::prompt::DEFAULT_PERSONA_NAME;

const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SESSION_IDLE_SECS: u64 = 24 * 60 * 60;
const DEFAULT_MAX_SESSIONS: u64 = 10_000;
pub const DEFAULT_SESSION_KEY: &str = "default_session";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// API keys loaded from environment variables
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// OpenRouter API key (OPENROUTER_API_KEY)
    pub openrouter: Option<String>,
}

impl ApiKeys {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        let keys = Self {
            openrouter: read_key(lookup, "OPENROUTER_API_KEY"),
        };
        keys.log_status();
        keys
    }

    /// Log which API keys are available (without exposing values)
    fn log_status(&self) {
        if self.openrouter.is_some() {
            debug!("OpenRouter API key loaded");
        } else {
            warn!("OPENROUTER_API_KEY is not set - chat requests will be rejected");
        }
    }

    pub fn has_llm_provider(&self) -> bool {
        self.openrouter.is_some()
    }
}

/// Generator endpoint settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Completions endpoint (BAKABOT_LLM_URL)
    pub url: String,
    /// Model id (BAKABOT_MODEL)
    pub model: String,
    /// Bound on one generator call (BAKABOT_LLM_TIMEOUT_SECS)
    pub timeout: Duration,
    /// HTTP-Referer attribution (BAKABOT_APP_URL)
    pub app_url: String,
    /// X-Title attribution (BAKABOT_APP_TITLE)
    pub app_title: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            url: OPENROUTER_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            app_url: "https://bakabot.app".to_string(),
            app_title: "BakaBot".to_string(),
        }
    }
}

impl LlmConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            url: read_string(lookup, "BAKABOT_LLM_URL").unwrap_or(defaults.url),
            model: read_string(lookup, "BAKABOT_MODEL").unwrap_or(defaults.model),
            timeout: read_parsed::<u64>(lookup, "BAKABOT_LLM_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            app_url: read_string(lookup, "BAKABOT_APP_URL").unwrap_or(defaults.app_url),
            app_title: read_string(lookup, "BAKABOT_APP_TITLE").unwrap_or(defaults.app_title),
        }
    }
}

/// Session store settings
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Idle expiry (BAKABOT_SESSION_IDLE_SECS, 0 = never)
    pub idle_ttl: Option<Duration>,
    /// Capacity bound (BAKABOT_MAX_SESSIONS)
    pub max_sessions: u64,
    /// Key for requests without a session id (BAKABOT_DEFAULT_SESSION)
    pub default_session: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl: Some(Duration::from_secs(DEFAULT_SESSION_IDLE_SECS)),
            max_sessions: DEFAULT_MAX_SESSIONS,
            default_session: DEFAULT_SESSION_KEY.to_string(),
        }
    }
}

impl SessionConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let idle_ttl = match read_parsed::<u64>(lookup, "BAKABOT_SESSION_IDLE_SECS") {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.idle_ttl,
        };
        Self {
            idle_ttl,
            max_sessions: read_parsed(lookup, "BAKABOT_MAX_SESSIONS").unwrap_or(defaults.max_sessions),
            default_session: read_string(lookup, "BAKABOT_DEFAULT_SESSION")
                .unwrap_or(defaults.default_session),
        }
    }
}

/// Bind address
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Configuration validation result
#[derive(Debug)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Default for ConfigValidation {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidation {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Format as a human-readable report
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        if !self.errors.is_empty() {
            lines.push("Errors:".to_string());
            for err in &self.errors {
                lines.push(format!("  - {}", err));
            }
        }

        if !self.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            for warn in &self.warnings {
                lines.push(format!("  - {}", warn));
            }
        }

        if lines.is_empty() {
            "Configuration OK".to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// Environment configuration - all env vars in one place
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub api_keys: ApiKeys,
    pub llm: LlmConfig,
    pub sessions: SessionConfig,
    pub server: ServerConfig,
    /// Companion name in the prompt (BAKABOT_PERSONA_NAME)
    pub persona_name: Option<String>,
    /// When session history is written back (BAKABOT_COMMIT_POLICY)
    pub commit_policy: CommitPolicy,
}

impl EnvConfig {
    /// Load all environment configuration (call once at startup)
    pub fn load() -> Self {
        info!("Loading environment configuration");
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let server = ServerConfig {
            host: read_string(&lookup, "BAKABOT_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: read_parsed(&lookup, "BAKABOT_PORT").unwrap_or(DEFAULT_PORT),
        };

        Self {
            api_keys: ApiKeys::from_lookup(&lookup),
            llm: LlmConfig::from_lookup(&lookup),
            sessions: SessionConfig::from_lookup(&lookup),
            server,
            persona_name: read_string(&lookup, "BAKABOT_PERSONA_NAME"),
            commit_policy: read_parsed(&lookup, "BAKABOT_COMMIT_POLICY").unwrap_or_default(),
        }
    }

    pub fn persona_name(&self) -> &str {
        self.persona_name.as_deref().unwrap_or(DEFAULT_PERSONA_NAME)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::new();

        if !self.api_keys.has_llm_provider() {
            validation.add_warning(
                "No generator API key configured. Set OPENROUTER_API_KEY; chat requests fail until then.",
            );
        }

        if self.llm.timeout.is_zero() {
            validation.add_error("BAKABOT_LLM_TIMEOUT_SECS must be greater than zero");
        }

        if !self.llm.url.starts_with("http://") && !self.llm.url.starts_with("https://") {
            validation.add_error(format!("BAKABOT_LLM_URL '{}' is not an http(s) URL", self.llm.url));
        }

        if self.sessions.max_sessions == 0 {
            validation.add_error("BAKABOT_MAX_SESSIONS must be greater than zero");
        }

        if self.sessions.idle_ttl.is_none() {
            validation.add_warning("Session idle expiry disabled; histories live until restart");
        }

        validation
    }
}

/// Read a single API key, filtering empty values
fn read_key(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).filter(|k| !k.trim().is_empty())
}

fn read_string(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a variable, warning and falling back to the default on bad input
fn read_parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let raw = read_string(lookup, name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = name, value = %raw, "Invalid value, using default");
            None
        }
    }
}
