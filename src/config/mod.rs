use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub oauth: OAuthConfig,
    pub ai: AiConfig,
    pub turnstile: TurnstileConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Built frontend to serve for unmatched paths (SPA fallback to index.html)
    pub static_dir: Option<PathBuf>,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub session_hours: u64,
    /// Adds `Secure` to every cookie we set
    pub secure_cookies: bool,
    pub cors_origins: Vec<String>,
    /// Emails granted the ADMIN role on first sign-in
    pub admin_emails: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub google_client_id: String,
    pub google_client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub post_login_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub gemini_api_key: String,
    pub model: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub max_input_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnstileConfig {
    pub secret_key: String,
    pub verify_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub default_page_size: i64,
    pub max_page_size: i64,
}

const REDACTED: &str = "<redacted>";

/// One year
pub const MAX_SESSION_HOURS: u64 = 24 * 365;

impl AppConfig {
    /// Defaults for `APP_ENV`, then the YAML file (if any), then env overrides.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let file = config_file
            .map(Path::to_path_buf)
            .or_else(|| env::var("CONFIG_FILE").ok().map(PathBuf::from));

        let base = match file {
            Some(path) => Self::from_yaml_file(&path)?,
            None => Self::environment_defaults(),
        };

        let config = base.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn environment_defaults() -> Self {
        match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Self::production(),
            Ok("staging") | Ok("stage") => Self::staging(),
            _ => Self::development(),
        }
    }

    fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        if self.security.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if !(1..=MAX_SESSION_HOURS).contains(&self.security.session_hours) {
            return Err(ConfigError::Invalid {
                key: "SESSION_HOURS",
                reason: format!("must be between 1 and {}", MAX_SESSION_HOURS),
            });
        }
        if self.admin.max_page_size < 1 {
            return Err(ConfigError::Invalid {
                key: "ADMIN_MAX_PAGE_SIZE",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(1..=self.admin.max_page_size).contains(&self.admin.default_page_size) {
            return Err(ConfigError::Invalid {
                key: "admin.default_page_size",
                reason: format!("must be between 1 and {}", self.admin.max_page_size),
            });
        }
        Ok(())
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("STATIC_DIR") {
            self.server.static_dir = Some(PathBuf::from(v)).filter(|p| !p.as_os_str().is_empty());
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.server.max_request_size_bytes = v.parse().unwrap_or(self.server.max_request_size_bytes);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SESSION_HOURS") {
            self.security.session_hours = v.parse().unwrap_or(self.security.session_hours);
        }
        if let Ok(v) = env::var("SECURITY_SECURE_COOKIES") {
            self.security.secure_cookies = v.parse().unwrap_or(self.security.secure_cookies);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = split_list(&v);
        }
        if let Ok(v) = env::var("ADMIN_EMAILS") {
            self.security.admin_emails = split_list(&v);
        }

        // OAuth overrides
        if let Ok(v) = env::var("GOOGLE_CLIENT_ID") {
            self.oauth.google_client_id = v;
        }
        if let Ok(v) = env::var("GOOGLE_CLIENT_SECRET") {
            self.oauth.google_client_secret = v;
        }
        if let Ok(v) = env::var("GOOGLE_REDIRECT_URI") {
            self.oauth.redirect_uri = v;
        }
        if let Ok(v) = env::var("POST_LOGIN_PATH") {
            self.oauth.post_login_path = v;
        }

        // AI overrides
        if let Ok(v) = env::var("GEMINI_API_KEY") {
            self.ai.gemini_api_key = v;
        }
        if let Ok(v) = env::var("GEMINI_MODEL") {
            self.ai.model = v;
        }
        if let Ok(v) = env::var("GEMINI_BASE_URL") {
            self.ai.base_url = v;
        }
        if let Ok(v) = env::var("GEMINI_TIMEOUT_SECS") {
            self.ai.request_timeout_secs = v.parse().unwrap_or(self.ai.request_timeout_secs);
        }
        if let Ok(v) = env::var("AI_MAX_INPUT_CHARS") {
            self.ai.max_input_chars = v.parse().unwrap_or(self.ai.max_input_chars);
        }

        // Turnstile overrides
        if let Ok(v) = env::var("TURNSTILE_SECRET_KEY") {
            self.turnstile.secret_key = v;
        }

        // Admin overrides
        if let Ok(v) = env::var("ADMIN_MAX_PAGE_SIZE") {
            self.admin.max_page_size = v.parse().unwrap_or(self.admin.max_page_size);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8788,
                static_dir: None,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 5,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                session_hours: 24 * 7, // 1 week
                secure_cookies: false,
                cors_origins: vec!["http://localhost:5173".to_string()],
                admin_emails: Vec::new(),
            },
            oauth: OAuthConfig::google("http://localhost:5173/api/auth/callback"),
            ai: AiConfig {
                gemini_api_key: String::new(),
                model: "gemini-flash-latest".to_string(),
                base_url: "https://generativelanguage.googleapis.com".to_string(),
                request_timeout_secs: 60,
                max_input_chars: 4000,
            },
            turnstile: TurnstileConfig::cloudflare(),
            admin: AdminConfig {
                default_page_size: 10,
                max_page_size: 100,
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.database.max_connections = 10;
        config.database.connection_timeout = 10;
        config.security.secure_cookies = true;
        config.security.cors_origins = Vec::new();
        config
    }

    fn production() -> Self {
        let mut config = Self::staging();
        config.environment = Environment::Production;
        config.database.max_connections = 20;
        config.database.connection_timeout = 5;
        config.ai.request_timeout_secs = 30;
        config
    }

    /// Copy safe to print: every secret replaced with a marker
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for secret in [
            &mut copy.security.jwt_secret,
            &mut copy.oauth.google_client_secret,
            &mut copy.ai.gemini_api_key,
            &mut copy.turnstile.secret_key,
        ] {
            if !secret.is_empty() {
                *secret = REDACTED.to_string();
            }
        }
        if let Ok(mut url) = url::Url::parse(&copy.database.url) {
            if url.password().is_some() && url.set_password(Some(REDACTED)).is_ok() {
                copy.database.url = url.to_string();
            }
        }
        copy
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        self.security
            .admin_emails
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(email))
    }
}

impl OAuthConfig {
    fn google(redirect_uri: &str) -> Self {
        Self {
            google_client_id: String::new(),
            google_client_secret: String::new(),
            redirect_uri: redirect_uri.to_string(),
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            userinfo_url: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
            post_login_path: "/dashboard".to_string(),
        }
    }
}

impl TurnstileConfig {
    fn cloudflare() -> Self {
        Self {
            secret_key: String::new(),
            verify_url: "https://challenges.cloudflare.com/turnstile/v0/siteverify".to_string(),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
