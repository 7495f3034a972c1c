use dotenv;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{error, info, warn};

static CONFIG: OnceLock<HashMap<String, String>> = OnceLock::new();

/// Default configuration values
const DEFAULTS: &[(&str, &str)] = &[
    ("SERVER_ADDRESS", "127.0.0.1"),
    ("SERVER_PORT", "8080"),
    ("LOG_LEVEL", "info"),
    ("BCRYPT_COST", "12"),
    // Token TTLs; one entry per token kind
    ("ACCESS_TOKEN_TTL_MINUTES", "15"),
    ("REFRESH_TOKEN_TTL_DAYS", "7"),
    ("VERIFY_EMAIL_TOKEN_TTL_HOURS", "24"),
    ("RESET_PASSWORD_TOKEN_TTL_MINUTES", "15"),
    // Mail
    ("SMTP_HOST", "localhost"),
    ("SMTP_PORT", "587"),
    ("SMTP_FROM_EMAIL", "no-reply@blogr.local"),
    ("MAIL_TIMEOUT_SECONDS", "10"),
    // Links embedded in outgoing mail
    ("APP_URL", "http://localhost:8080"),
    ("CLIENT_URL", "http://localhost:5173"),
    ("SESSION_SWEEP_INTERVAL_MINUTES", "60"),
];

pub fn init() {
    match dotenv::dotenv() {
        Ok(path) => info!("Loaded environment file: {:?}", path),
        Err(_) => warn!("No .env file found, using system environment variables"),
    }

    let mut config = HashMap::new();

    for (key, value) in DEFAULTS {
        config.insert(key.to_string(), value.to_string());
    }

    // Environment variables override defaults; keys without a default
    // (DATABASE_URL, SMTP credentials, signing secrets) are picked up too.
    for (key, value) in std::env::vars() {
        config.insert(key, value);
    }

    if CONFIG.set(config).is_err() {
        error!("Configuration already initialized");
    } else {
        info!("Configuration initialized successfully");
    }
}

pub fn get(parameter: &str) -> String {
    CONFIG
        .get()
        .and_then(|config| config.get(parameter))
        .cloned()
        .unwrap_or_else(|| {
            error!("Configuration parameter '{}' not found", parameter);
            panic!("Required configuration parameter '{}' is missing", parameter);
        })
}

pub fn get_optional(parameter: &str) -> Option<String> {
    CONFIG
        .get()
        .and_then(|config| config.get(parameter))
        .cloned()
}

pub fn get_i64(parameter: &str) -> i64 {
    let value = get(parameter);
    value.parse::<i64>().unwrap_or_else(|_| {
        error!("Configuration parameter '{}' is not a valid i64: {}", parameter, value);
        panic!("Configuration parameter '{}' is not a valid i64", parameter);
    })
}

pub fn get_u64(parameter: &str) -> u64 {
    let value = get(parameter);
    value.parse::<u64>().unwrap_or_else(|_| {
        error!("Configuration parameter '{}' is not a valid u64: {}", parameter, value);
        panic!("Configuration parameter '{}' is not a valid u64", parameter);
    })
}

/// Get all configuration parameters (for debugging)
pub fn get_all() -> HashMap<String, String> {
    CONFIG.get().cloned().unwrap_or_default()
}

/// True when running as a production deployment. Controls the Secure
/// attribute on session cookies and how much error detail is logged.
pub fn is_production() -> bool {
    get_optional("ENV")
        .map(|env| matches!(env.to_lowercase().as_str(), "production" | "prod"))
        .unwrap_or(false)
}
