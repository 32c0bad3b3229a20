//! One-off checks against a single side of a job, without transferring data.

use crate::error::TransferError;
use connectors::sql::{
    base::{error::ConnectionError, provider::ConnectionProvider, session::Session},
    postgres::provider::PgConnectionProvider,
};
use engine_core::events::Side;
use model::{
    core::identifiers::TableRef,
    execution::{connection::ConnectionConfig, job::InsertMode},
    records::columns::ColumnList,
};
use std::sync::Arc;
use tracing::{info, warn};

pub struct Inspector {
    provider: Arc<dyn ConnectionProvider>,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new(Arc::new(PgConnectionProvider))
    }
}

impl Inspector {
    pub fn new(provider: Arc<dyn ConnectionProvider>) -> Self {
        Self { provider }
    }

    /// Connects, round-trips `SELECT 1` and disconnects. Returns the endpoint.
    pub async fn test_connection(
        &self,
        side: Side,
        config: &ConnectionConfig,
    ) -> Result<String, TransferError> {
        let connection = |source: ConnectionError| TransferError::Connection { side, source };

        let endpoint = match side {
            Side::Source => {
                let mut session = self.provider.open_source(config).await.map_err(connection)?;
                let endpoint = session.endpoint().to_string();
                let pinged = session.ping().await;
                close(side, session).await;
                pinged.map_err(connection)?;
                endpoint
            }
            Side::Target => {
                let mut session = self
                    .provider
                    .open_target(config, InsertMode::default())
                    .await
                    .map_err(connection)?;
                let endpoint = session.endpoint().to_string();
                let pinged = session.ping().await;
                close(side, session).await;
                pinged.map_err(connection)?;
                endpoint
            }
        };

        info!(side = %side, endpoint = %endpoint, "Connection OK");
        Ok(endpoint)
    }

    /// Column list of `table` as the transfer would see it.
    pub async fn column_list(
        &self,
        side: Side,
        config: &ConnectionConfig,
        table: &TableRef,
    ) -> Result<ColumnList, TransferError> {
        let connection = |source: ConnectionError| TransferError::Connection { side, source };

        match side {
            Side::Source => {
                let mut session = self.provider.open_source(config).await.map_err(connection)?;
                let columns = session.column_list(table).await;
                close(side, session).await;
                Ok(columns?)
            }
            Side::Target => {
                let mut session = self
                    .provider
                    .open_target(config, InsertMode::default())
                    .await
                    .map_err(connection)?;
                let columns = session.column_list(table).await;
                close(side, session).await;
                Ok(columns?)
            }
        }
    }
}

async fn close<S: Session + ?Sized>(side: Side, session: Box<S>) {
    let endpoint = session.endpoint().to_string();
    if let Err(error) = session.close().await {
        warn!(side = %side, endpoint = %endpoint, %error, "Failed to close session");
    }
}
