use crate::sql::base::{
    error::ConnectionError,
    session::{SourceSession, TargetSession},
};
use async_trait::async_trait;
use model::execution::{connection::ConnectionConfig, job::InsertMode};

/// Opens sessions from connection parameters. Fails fast: no retries and no
/// pooling, each call yields a fresh, independent session.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    async fn open_source(
        &self,
        config: &ConnectionConfig,
    ) -> Result<Box<dyn SourceSession>, ConnectionError>;

    async fn open_target(
        &self,
        config: &ConnectionConfig,
        insert_mode: InsertMode,
    ) -> Result<Box<dyn TargetSession>, ConnectionError>;
}
