//! [`Config`]-related definitions.

use std::time;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Service configuration.
    pub service: Service,

    /// Content lake configuration.
    pub content_lake: ContentLake,

    /// Mail delivery configuration.
    pub mail: Mail,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Service configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// [JWT] secret.
    ///
    /// [JWT]: https://wikipedia.org/wiki/JSON_Web_Token
    #[default("secret".to_owned())]
    pub jwt_secret: String,

    /// Password reset configuration.
    pub password_reset: PasswordReset,

    /// Service tasks configuration.
    pub tasks: Tasks,
}

impl From<Service> for service::Config {
    fn from(value: Service) -> Self {
        let Service {
            jwt_secret,
            password_reset,
            tasks: Tasks { reconcile_orders },
        } = value;
        Self {
            jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(
                jwt_secret.as_bytes(),
            ),
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                jwt_secret.as_bytes(),
            ),
            password_reset_url: password_reset.url,
            password_reset_lifetime: password_reset.lifetime,
            reconcile_orders: service::task::reconcile_orders::Config {
                interval: reconcile_orders.interval,
                threshold: reconcile_orders.threshold,
            },
        }
    }
}

/// Password reset configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct PasswordReset {
    /// Base URL the mailed reset links point at.
    #[default("http://localhost:3000/reset-password".to_owned())]
    pub url: String,

    /// Lifetime of a reset token.
    #[default(time::Duration::from_secs(60 * 60))]
    #[serde(with = "humantime_serde")]
    pub lifetime: time::Duration,
}

/// Service tasks configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Tasks {
    /// `ReconcileOrders` task configuration.
    pub reconcile_orders: ReconcileOrders,
}

/// `ReconcileOrders` task configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct ReconcileOrders {
    /// Task execution interval.
    #[default(time::Duration::from_secs(60 * 10))]
    #[serde(with = "humantime_serde")]
    pub interval: time::Duration,

    /// Age after which a pending free order counts as dangling.
    #[default(time::Duration::from_secs(60 * 5))]
    #[serde(with = "humantime_serde")]
    pub threshold: time::Duration,
}

/// Content lake configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct ContentLake {
    /// Base URL of the content lake API.
    #[default("http://127.0.0.1:3333".to_owned())]
    pub endpoint: String,

    /// Dataset to address within the content lake.
    #[default("production".to_owned())]
    pub dataset: String,

    /// Bearer token authorizing writes.
    pub token: String,
}

impl From<ContentLake> for service::infra::content_lake::Config {
    fn from(value: ContentLake) -> Self {
        let ContentLake {
            endpoint,
            dataset,
            token,
        } = value;
        Self {
            endpoint,
            dataset,
            token: token.into(),
        }
    }
}

/// Mail delivery configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Mail {
    /// URL of the mail delivery API.
    #[default("http://127.0.0.1:2525/send".to_owned())]
    pub endpoint: String,

    /// Bearer token authorizing deliveries.
    pub token: String,

    /// Sender address letters are delivered from.
    #[default("noreply@localhost".to_owned())]
    pub from: String,
}

impl From<Mail> for service::infra::mail::Config {
    fn from(value: Mail) -> Self {
        let Mail {
            endpoint,
            token,
            from,
        } = value;
        Self {
            endpoint,
            token: token.into(),
            from,
        }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
