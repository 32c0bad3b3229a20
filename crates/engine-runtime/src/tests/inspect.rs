#[cfg(test)]
mod tests {
    use crate::{
        error::TransferError,
        execution::inspect::Inspector,
        tests::fakes::{FakeDb, FakeProvider},
    };
    use engine_core::events::Side;
    use model::{core::identifiers::TableRef, execution::connection::ConnectionConfig};
    use std::sync::Arc;

    fn config() -> ConnectionConfig {
        ConnectionConfig::new("db1", "app", "reader", "pw")
    }

    #[tokio::test]
    async fn test_column_list_is_idempotent() {
        let table = TableRef::new("public", "Mixed Case");
        let provider = Arc::new(FakeProvider::new(
            FakeDb::new().table(&table, &["id", "Name", "value"], Vec::new()),
            FakeDb::new(),
        ));
        let inspector = Inspector::new(provider.clone());

        let first = inspector.column_list(Side::Source, &config(), &table).await.unwrap();
        let second = inspector.column_list(Side::Source, &config(), &table).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.iter().collect::<Vec<_>>(), vec!["id", "Name", "value"]);
        assert_eq!(provider.source.stats().column_lookups, 2);
        assert_eq!(provider.source.stats().sessions_closed, 2);
    }

    #[tokio::test]
    async fn test_connection_check() {
        let provider = Arc::new(FakeProvider::new(FakeDb::new(), FakeDb::new()).failing_target());
        let inspector = Inspector::new(provider.clone());

        let endpoint = inspector.test_connection(Side::Source, &config()).await.unwrap();
        assert_eq!(endpoint, "reader@db1:5432/app");
        assert_eq!(provider.source.stats().sessions_closed, 1);

        let result = inspector.test_connection(Side::Target, &config()).await;
        assert!(matches!(
            result,
            Err(TransferError::Connection {
                side: Side::Target,
                ..
            })
        ));
    }
}
