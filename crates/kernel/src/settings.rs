use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "FOLIO_ENV";
const CONFIG_DIR_ENV: &str = "FOLIO_CONFIG_DIR";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub media: MediaSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay and
    /// `FOLIO__*` variables.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .map(|cwd| cwd.join("config"))
                .context("unable to resolve current directory")?,
        };

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix("FOLIO")
                    .prefix_separator("__")
                    .separator("__"),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // Override environment field with parsed enum variant.
        settings.environment = match environment.as_str() {
            "local" => Environment::Local,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                return Err(anyhow!(
                    "unsupported environment '{}'; expected local/staging/production",
                    other
                ));
            }
        };

        settings.apply_platform_env(|key| std::env::var(key).ok());
        settings.validate()?;

        Ok(settings)
    }

    /// Fill unset keys from the hosting platform's conventional variables.
    pub fn apply_platform_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let fill = |slot: &mut Option<String>, key: &str| {
            if slot.as_deref().map_or(true, str::is_empty) {
                *slot = lookup(key).filter(|value| !value.is_empty());
            }
        };

        fill(&mut self.database.uri, "MONGODB_URI");
        fill(&mut self.auth.admin_secret, "ADMIN_SECRET");
        fill(&mut self.media.cloud_name, "CLOUDINARY_CLOUD_NAME");
        fill(&mut self.media.api_key, "CLOUDINARY_API_KEY");
        fill(&mut self.media.api_secret, "CLOUDINARY_API_SECRET");
        fill(&mut self.media.upload_preset, "CLOUDINARY_UNSIGNED_PRESET");
    }

    /// Reject combinations that must never reach a running server.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.environment == Environment::Production && self.auth.mode == AuthMode::SharedSecret
        {
            bail!("auth.mode 'shared-secret' is for local development and is refused in production");
        }

        if !self.server.base_path.is_empty()
            && (!self.server.base_path.starts_with('/') || self.server.base_path.ends_with('/'))
        {
            bail!(
                "server.base_path '{}' must start with '/' and not end with '/'",
                self.server.base_path
            );
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "ServerSettings::default_body_limit_bytes")]
    pub body_limit_bytes: usize,
    /// Prefix every route is mounted under, e.g. `/api`. Empty mounts at the root.
    #[serde(default)]
    pub base_path: String,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }

    fn default_body_limit_bytes() -> usize {
        10 * 1024 * 1024
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
            body_limit_bytes: Self::default_body_limit_bytes(),
            base_path: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// MongoDB connection string. Absent means public reads fall back to sample data
    /// and writes fail.
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default = "DatabaseSettings::default_name")]
    pub name: String,
}

impl DatabaseSettings {
    fn default_name() -> String {
        "studyhub".to_string()
    }

    /// Connection string, if one is configured and non-blank.
    pub fn configured_uri(&self) -> Option<&str> {
        self.uri.as_deref().map(str::trim).filter(|uri| !uri.is_empty())
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            uri: None,
            name: Self::default_name(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default = "TelemetrySettings::default_log_filter")]
    pub log_filter: String,
}

impl TelemetrySettings {
    fn default_log_filter() -> String {
        "info,tower_http=info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            log_filter: Self::default_log_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// How admin bearer tokens are checked.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMode {
    /// HS256 tokens issued by the login endpoint.
    #[default]
    Signed,
    /// The bearer token is the admin secret itself. Local development only.
    SharedSecret,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthSettings {
    #[serde(default)]
    pub mode: AuthMode,
    /// Shared secret an operator submits to log in.
    #[serde(default)]
    pub admin_secret: Option<String>,
    /// Token signing key; defaults to `admin_secret`.
    #[serde(default)]
    pub token_secret: Option<String>,
}

/// Digest used to sign media uploads.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaSettings {
    #[serde(default)]
    pub cloud_name: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
    /// Unsigned upload preset, used when no API credentials are set.
    #[serde(default)]
    pub upload_preset: Option<String>,
    /// Must match the account's signature setting.
    #[serde(default)]
    pub signature_algorithm: SignatureAlgorithm,
    #[serde(default = "MediaSettings::default_folder")]
    pub folder: String,
    #[serde(default = "MediaSettings::default_api_base")]
    pub api_base: String,
}

impl MediaSettings {
    fn default_folder() -> String {
        "studyhub_publication".to_string()
    }

    fn default_api_base() -> String {
        "https://api.cloudinary.com/v1_1".to_string()
    }
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            cloud_name: None,
            api_key: None,
            api_secret: None,
            upload_preset: None,
            signature_algorithm: SignatureAlgorithm::default(),
            folder: Self::default_folder(),
            api_base: Self::default_api_base(),
        }
    }
}
