use anyhow::Result;
use config::{Config, ConfigBuilder, builder::DefaultState};
use serde::Deserialize;

/// Fixed browser origins that are always allowed, independent of configuration.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "https://collabup.app",
    "https://www.collabup.app",
];

pub const DEFAULT_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub identity: IdentityConfig,
    pub storage: StorageConfig,
    pub mail: MailConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

/// A configuration value that must never show up in logs.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the bind address in the format "host:port".
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DocumentBackend,
    pub url: Option<Secret>,
    pub max_connections: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityMethod {
    Jwks,
    SingleUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    pub method: IdentityMethod,
    pub project_id: Option<String>,
    pub jwks_url: String,
    pub issuer: Option<String>,
    /// How long a fetched JWK set is trusted before it is fetched again.
    pub jwks_ttl_secs: u64,
    pub single_user: Option<SingleUserConfig>,
}

impl IdentityConfig {
    /// ## Summary
    /// Returns the expected token issuer, derived from the project id when not set explicitly.
    #[must_use]
    pub fn issuer(&self) -> Option<String> {
        self.issuer.clone().or_else(|| {
            self.project_id
                .as_ref()
                .map(|project| format!("https://securetoken.google.com/{project}"))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SingleUserConfig {
    pub uid: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    pub endpoint: String,
    pub credentials_json: Option<Secret>,
    pub credentials_file: Option<String>,
    pub url_ttl_secs: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MailMethod {
    Relay,
    Log,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub method: MailMethod,
    pub relay_url: Option<String>,
    pub api_key: Option<Secret>,
    pub from: String,
    pub feedback_recipient: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    /// ## Summary
    /// Returns the fixed origin allow-list followed by the configured additions, without duplicates.
    #[must_use]
    pub fn origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = DEFAULT_ALLOWED_ORIGINS
            .iter()
            .map(|origin| (*origin).to_string())
            .collect();
        for extra in &self.allowed_origins {
            let extra = extra.trim().trim_end_matches('/');
            if !extra.is_empty() && !origins.iter().any(|o| o == extra) {
                origins.push(extra.to_string());
            }
        }
        origins
    }
}

impl Settings {
    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5050)?
            .set_default("logging.level", "info")?
            .set_default("database.backend", "postgres")?
            .set_default("database.max_connections", 4)?
            .set_default("identity.method", "jwks")?
            .set_default("identity.jwks_url", DEFAULT_JWKS_URL)?
            .set_default("identity.jwks_ttl_secs", 3600)?
            .set_default("storage.endpoint", "https://storage.googleapis.com")?
            .set_default("storage.url_ttl_secs", 300)?
            .set_default("mail.method", "relay")?
            .set_default("mail.from", "CollabUp <no-reply@collabup.app>")?)
    }

    /// ## Summary
    /// Loads configuration from defaults, an optional `config.toml` and environment variables.
    /// Environment variables use `__` as the nesting separator and take precedence over the file.
    /// `PORT` and `GOOGLE_APPLICATION_CREDENTIALS` are honoured for compatibility with hosting platforms.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        let mut builder = Self::defaults()?;

        if let Ok(path) = std::env::var("GOOGLE_APPLICATION_CREDENTIALS") {
            builder = builder.set_default("storage.credentials_file", path)?;
        }

        builder = builder
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Env
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .ignore_empty(true)
                    .try_parsing(true),
            );

        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        Ok(builder.build()?.try_deserialize::<Settings>()?)
    }

    /// ## Summary
    /// Builds settings from defaults plus a TOML document.
    ///
    /// ## Errors
    /// Returns an error if the document is invalid or required keys are missing.
    pub fn from_toml(toml: &str) -> Result<Self> {
        Ok(Self::defaults()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [storage]
        bucket = "collabup-test.appspot.com"
    "#;

    #[test]
    fn defaults_fill_everything_but_the_bucket() {
        let settings = Settings::from_toml(MINIMAL).expect("minimal config should load");

        assert_eq!(settings.server.port, 5050);
        assert_eq!(settings.server.bind_addr(), "0.0.0.0:5050");
        assert_eq!(settings.database.backend, DocumentBackend::Postgres);
        assert_eq!(settings.identity.method, IdentityMethod::Jwks);
        assert_eq!(settings.identity.jwks_url, DEFAULT_JWKS_URL);
        assert_eq!(settings.storage.url_ttl_secs, 300);
        assert_eq!(settings.mail.method, MailMethod::Relay);
        assert!(settings.cors.allowed_origins.is_empty());
    }

    #[test]
    fn missing_bucket_is_rejected() {
        assert!(Settings::from_toml("").is_err());
    }

    #[test]
    fn issuer_is_derived_from_project_id() {
        let settings = Settings::from_toml(
            r#"
            [identity]
            project_id = "collabup-prod"

            [storage]
            bucket = "b"
            "#,
        )
        .expect("config should load");

        assert_eq!(
            settings.identity.issuer().as_deref(),
            Some("https://securetoken.google.com/collabup-prod")
        );
    }

    #[test]
    fn cors_origins_merge_without_duplicates() {
        let cors = CorsConfig {
            allowed_origins: vec![
                "https://staging.collabup.app/".to_string(),
                "http://localhost:3000".to_string(),
                "  ".to_string(),
            ],
        };

        let origins = cors.origins();
        assert_eq!(origins.len(), DEFAULT_ALLOWED_ORIGINS.len() + 1);
        assert_eq!(
            origins.last().map(String::as_str),
            Some("https://staging.collabup.app")
        );
    }

    #[test]
    fn secrets_are_redacted_in_debug_output() {
        let secret = Secret::new("hunter2");
        assert_eq!(format!("{secret:?}"), "Secret(***)");
        assert_eq!(secret.expose(), "hunter2");
    }
}
