use secrecy::SecretString;
use serde::Deserialize;
use std::fmt;

pub const DEFAULT_PORT: u16 = 5432;

/// TLS negotiation mode, following libpq's `sslmode` names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SslMode {
    Disable,
    #[default]
    Prefer,
    Require,
}

/// Parameters for one database session.
///
/// Fields are optional at this level so that a missing value surfaces as a
/// connection error naming the field rather than a parse failure.
#[derive(Clone, Deserialize)]
pub struct ConnectionConfig {
    pub host: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<SecretString>,
    #[serde(default)]
    pub sslmode: SslMode,
    pub application_name: Option<String>,
    pub connect_timeout_secs: Option<u64>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl ConnectionConfig {
    pub fn new(host: &str, database: &str, user: &str, password: &str) -> Self {
        Self {
            host: Some(host.to_string()),
            port: DEFAULT_PORT,
            database: Some(database.to_string()),
            user: Some(user.to_string()),
            password: Some(SecretString::new(password.to_string())),
            sslmode: SslMode::default(),
            application_name: None,
            connect_timeout_secs: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_sslmode(mut self, sslmode: SslMode) -> Self {
        self.sslmode = sslmode;
        self
    }

    /// `user@host:port/database`, safe to log.
    pub fn endpoint(&self) -> String {
        format!(
            "{}@{}:{}/{}",
            self.user.as_deref().unwrap_or("?"),
            self.host.as_deref().unwrap_or("?"),
            self.port,
            self.database.as_deref().unwrap_or("?")
        )
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("sslmode", &self.sslmode)
            .field("application_name", &self.application_name)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{ConnectionConfig, SslMode};

    #[test]
    fn test_endpoint_hides_password() {
        let config = ConnectionConfig::new("db1", "app", "reader", "hunter2").with_port(6543);
        assert_eq!(config.endpoint(), "reader@db1:6543/app");
        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: ConnectionConfig =
            serde_json::from_str(r#"{"host":"db1","database":"app","user":"u"}"#).unwrap();
        assert_eq!(config.port, 5432);
        assert_eq!(config.sslmode, SslMode::Prefer);
        assert!(config.password.is_none());
    }
}
