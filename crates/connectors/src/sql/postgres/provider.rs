use crate::sql::{
    base::{
        error::ConnectionError,
        provider::ConnectionProvider,
        session::{SourceSession, TargetSession},
    },
    postgres::{destination::PgDestination, source::PgSource, utils::connect_client},
};
use async_trait::async_trait;
use model::execution::{connection::ConnectionConfig, job::InsertMode};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct PgConnectionProvider;

#[async_trait]
impl ConnectionProvider for PgConnectionProvider {
    async fn open_source(
        &self,
        config: &ConnectionConfig,
    ) -> Result<Box<dyn SourceSession>, ConnectionError> {
        let conn = connect_client(config).await?;
        let endpoint = config.endpoint();
        info!(endpoint = %endpoint, "Connected to source");
        Ok(Box::new(PgSource::new(conn, endpoint)))
    }

    async fn open_target(
        &self,
        config: &ConnectionConfig,
        insert_mode: InsertMode,
    ) -> Result<Box<dyn TargetSession>, ConnectionError> {
        let conn = connect_client(config).await?;
        let endpoint = config.endpoint();
        info!(endpoint = %endpoint, ?insert_mode, "Connected to target");
        Ok(Box::new(PgDestination::new(conn, endpoint, insert_mode)))
    }
}
