use crate::sql::{
    base::error::ConnectionError,
    postgres::{
        error::{PgDriverError, driver_error},
        options::{DEFAULT_APPLICATION_NAME, SessionOptions},
    },
};
use model::execution::connection::{ConnectionConfig, SslMode};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, Config, NoTls, config::SslMode as PgSslMode};
use tracing::{error, warn};

/// A live client plus the task driving its socket. Dropping the client ends
/// the task.
pub(crate) struct PgConnection {
    pub client: Client,
    pub driver: JoinHandle<()>,
}

pub(crate) fn build_config(config: &ConnectionConfig) -> Result<Config, ConnectionError> {
    let host = required(config.host.as_deref(), "host")?;
    let database = required(config.database.as_deref(), "database")?;
    let user = required(config.user.as_deref(), "user")?;
    let password = config
        .password
        .as_ref()
        .map(|p| p.expose_secret().as_str())
        .ok_or(ConnectionError::MissingField("password"))?;

    let mut pg = Config::new();
    pg.host(host)
        .port(config.port)
        .dbname(database)
        .user(user)
        .password(password)
        .application_name(
            config
                .application_name
                .as_deref()
                .unwrap_or(DEFAULT_APPLICATION_NAME),
        )
        .options(&SessionOptions::default().to_options_string())
        .ssl_mode(match config.sslmode {
            SslMode::Disable => PgSslMode::Disable,
            SslMode::Prefer => PgSslMode::Prefer,
            SslMode::Require => PgSslMode::Require,
        });

    if let Some(secs) = config.connect_timeout_secs {
        pg.connect_timeout(Duration::from_secs(secs));
    }

    Ok(pg)
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ConnectionError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConnectionError::MissingField(field))
}

pub(crate) async fn connect_client(
    config: &ConnectionConfig,
) -> Result<PgConnection, ConnectionError> {
    let pg = build_config(config)?;
    let endpoint = config.endpoint();

    match config.sslmode {
        SslMode::Disable => connect_without_tls(pg, &endpoint).await,
        SslMode::Require => connect_with_tls(pg, &endpoint).await,
        SslMode::Prefer => match connect_with_tls(pg.clone(), &endpoint).await {
            Ok(conn) => Ok(conn),
            Err(error) => {
                warn!(%error, endpoint = %endpoint, "Postgres TLS handshake failed, retrying without TLS");
                connect_without_tls(pg, &endpoint).await
            }
        },
    }
}

pub(crate) async fn connect_with_tls(
    config: Config,
    endpoint: &str,
) -> Result<PgConnection, ConnectionError> {
    let connector = TlsConnector::builder().build()?;
    let tls = MakeTlsConnector::new(connector);
    let (client, connection) =
        config
            .connect(tls)
            .await
            .map_err(|e| ConnectionError::Connect {
                endpoint: endpoint.to_string(),
                source: driver_error(e),
            })?;
    let driver = tokio::spawn(async move {
        if let Err(err) = connection.await {
            error!(error = %PgDriverError::from(err), "Postgres connection error");
        }
    });
    Ok(PgConnection { client, driver })
}

pub(crate) async fn connect_without_tls(
    config: Config,
    endpoint: &str,
) -> Result<PgConnection, ConnectionError> {
    let (client, connection) =
        config
            .connect(NoTls)
            .await
            .map_err(|e| ConnectionError::Connect {
                endpoint: endpoint.to_string(),
                source: driver_error(e),
            })?;
    let driver = tokio::spawn(async move {
        if let Err(err) = connection.await {
            error!(error = %PgDriverError::from(err), "Postgres connection error");
        }
    });
    Ok(PgConnection { client, driver })
}

pub(crate) async fn ping(client: &Client, endpoint: &str) -> Result<(), ConnectionError> {
    client
        .simple_query("SELECT 1")
        .await
        .map(|_| ())
        .map_err(|e| ConnectionError::Ping {
            endpoint: endpoint.to_string(),
            source: driver_error(e),
        })
}

/// Drops the client and waits for the socket task to wind down.
pub(crate) async fn shutdown(conn: PgConnection, endpoint: &str) -> Result<(), ConnectionError> {
    let PgConnection { client, driver } = conn;
    drop(client);
    driver.await.map_err(|e| ConnectionError::Close {
        endpoint: endpoint.to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::build_config;
    use crate::sql::base::error::ConnectionError;
    use model::execution::connection::ConnectionConfig;

    #[test]
    fn test_build_config_requires_fields() {
        let mut config = ConnectionConfig::new("db1", "app", "reader", "secret");
        config.user = None;
        assert!(matches!(
            build_config(&config),
            Err(ConnectionError::MissingField("user"))
        ));

        let mut config = ConnectionConfig::new("db1", "app", "reader", "secret");
        config.password = None;
        assert!(matches!(
            build_config(&config),
            Err(ConnectionError::MissingField("password"))
        ));
    }

    #[test]
    fn test_build_config_passes_empty_password_through() {
        // trust and .pgpass setups configure an empty password
        let config = ConnectionConfig::new("db1", "app", "reader", "");
        let pg = build_config(&config).unwrap();
        assert_eq!(pg.get_password(), Some(&b""[..]));
    }

    #[test]
    fn test_build_config_sets_session_options() {
        let config = ConnectionConfig::new("db1", "app", "reader", "secret").with_port(6543);
        let pg = build_config(&config).unwrap();
        assert_eq!(pg.get_ports(), &[6543]);
        assert_eq!(pg.get_dbname(), Some("app"));
        assert_eq!(pg.get_application_name(), Some("tablecopy"));
        assert!(pg.get_options().unwrap().contains("datestyle=ISO"));
    }
}
