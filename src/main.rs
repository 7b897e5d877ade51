//! Feedback Relay
//!
//! Accepts app feedback over HTTP and forwards it by email:
//! - Shared-secret check and honeypot spam filter
//! - Per-IP sliding-window rate limiting
//! - Sanitization and validation of every field
//! - Delivery through the Resend API

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};

use api::{router, AllowedOrigins, AppState, RelaySettings};
use mailer::{MailerConfig, ResendClient};
use relay_core::limits::DEFAULT_RATE_LIMIT_PER_MIN;
use telemetry::init_tracing_from_env;

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    #[serde(default = "default_from_email")]
    from_email: String,
    #[serde(default = "default_to_email")]
    to_email: String,
    #[serde(default = "default_subject_prefix")]
    subject_prefix: String,
    #[serde(default)]
    shared_secret: Option<String>,
    /// `*` or a comma-separated list
    #[serde(default = "default_allowed_origins")]
    allowed_origins: String,
    /// Zero or negative disables rate limiting
    #[serde(default = "default_rate_limit")]
    rate_limit_per_ip_per_min: i64,
    #[serde(default)]
    trust_forwarded_for: bool,

    #[serde(default)]
    mailer: MailerConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_from_email() -> String {
    "noreply@example.com".to_string()
}

fn default_to_email() -> String {
    "feedback@example.com".to_string()
}

fn default_subject_prefix() -> String {
    "[Feedback]".to_string()
}

fn default_allowed_origins() -> String {
    "*".to_string()
}

fn default_rate_limit() -> i64 {
    DEFAULT_RATE_LIMIT_PER_MIN
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            from_email: default_from_email(),
            to_email: default_to_email(),
            subject_prefix: default_subject_prefix(),
            shared_secret: None,
            allowed_origins: default_allowed_origins(),
            rate_limit_per_ip_per_min: default_rate_limit(),
            trust_forwarded_for: false,
            mailer: MailerConfig::default(),
        }
    }
}

impl Config {
    fn relay_settings(&self) -> RelaySettings {
        RelaySettings {
            from: self.from_email.trim().to_string(),
            to: self.to_email.trim().to_string(),
            subject_prefix: self.subject_prefix.trim().to_string(),
            shared_secret: self.shared_secret.clone(),
            allowed_origins: AllowedOrigins::parse(&self.allowed_origins),
            trust_forwarded_for: self.trust_forwarded_for,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting Feedback Relay v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;

    let settings = config.relay_settings();
    info!(
        from = %settings.from,
        to = %settings.to,
        origins = ?settings.allowed_origins,
        shared_secret = settings.shared_secret().is_some(),
        rate_limit_per_min = config.rate_limit_per_ip_per_min,
        trust_forwarded_for = settings.trust_forwarded_for,
        "Loaded relay config"
    );

    if !config.mailer.is_configured() {
        // Keep serving: /feedback answers 500 until the key is provided.
        error!("RESEND_API_KEY is not set; feedback cannot be delivered");
    }
    if config.rate_limit_per_ip_per_min <= 0 {
        warn!("Rate limiting is disabled");
    }

    let mailer = Arc::new(
        ResendClient::new(config.mailer.clone()).context("Failed to create email client")?,
    );

    let state = AppState::new(settings, mailer, config.rate_limit_per_ip_per_min);

    let _maintenance = state.start_maintenance();
    info!("Started maintenance task (every 5 minutes)");

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // Peer addresses feed the per-IP rate limiter.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from defaults, `config/default.toml`, and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?)
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // FEEDBACK__TO_EMAIL, FEEDBACK__MAILER__API_KEY, ...
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("FEEDBACK")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    apply_env_overrides(&mut config)?;

    Ok(config)
}

/// Plain variable names used by existing deployments.
fn apply_env_overrides(config: &mut Config) -> Result<()> {
    apply_overrides(config, |name| std::env::var(name).ok())
}

fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
    if let Some(key) = lookup("RESEND_API_KEY") {
        config.mailer.api_key = Some(key);
    }
    if let Some(url) = lookup("RESEND_API_URL") {
        config.mailer.api_url = url;
    }
    if let Some(secs) = lookup("SEND_TIMEOUT_SECS") {
        config.mailer.timeout_secs = secs
            .trim()
            .parse()
            .context("SEND_TIMEOUT_SECS must be a number of seconds")?;
    }
    if let Some(to) = lookup("TO_EMAIL") {
        config.to_email = to;
    }
    if let Some(from) = lookup("FROM_EMAIL") {
        config.from_email = from;
    }
    if let Some(prefix) = lookup("SUBJECT_PREFIX") {
        config.subject_prefix = prefix;
    }
    if let Some(secret) = lookup("SHARED_SECRET") {
        config.shared_secret = Some(secret);
    }
    if let Some(origins) = lookup("ALLOWED_ORIGINS") {
        config.allowed_origins = origins;
    }
    if let Some(limit) = lookup("RATE_LIMIT_PER_IP_PER_MIN") {
        config.rate_limit_per_ip_per_min = limit
            .trim()
            .parse()
            .context("RATE_LIMIT_PER_IP_PER_MIN must be an integer")?;
    }
    if let Some(trust) = lookup("TRUST_FORWARDED_FOR") {
        config.trust_forwarded_for =
            matches!(trust.trim().to_lowercase().as_str(), "1" | "true" | "yes");
    }
    if let Some(host) = lookup("HOST") {
        config.host = host;
    }
    if let Some(port) = lookup("PORT") {
        config.port = port.trim().parse().context("PORT must be a port number")?;
    }
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
