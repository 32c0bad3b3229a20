use crate::error::CliError;
use engine_core::{events::Side, report::TransferReport};
use model::{core::identifiers::TableRef, records::columns::ColumnList};
use std::path::Path;

pub async fn write_report(report: &TransferReport, path: &Path) -> Result<(), CliError> {
    let report_json = report.to_json()?;
    tokio::fs::write(path, report_json).await?;
    Ok(())
}

pub fn columns_json(side: Side, table: &TableRef, columns: &ColumnList) -> Result<String, CliError> {
    let json = serde_json::json!({
        "side": side,
        "table": table,
        "columns": columns.names(),
    });
    Ok(serde_json::to_string_pretty(&json)?)
}

pub fn print_columns(side: Side, table: &TableRef, columns: &ColumnList) -> Result<(), CliError> {
    println!("{}", columns_json(side, table, columns)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::columns_json;
    use engine_core::events::Side;
    use model::{core::identifiers::TableRef, records::columns::ColumnList};

    #[test]
    fn test_columns_json() {
        let columns = ColumnList::new(vec!["id".to_string(), "Name".to_string()]).unwrap();
        let json = columns_json(Side::Target, &TableRef::new("archive", "orders"), &columns).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["side"], "target");
        assert_eq!(value["table"]["schema"], "archive");
        assert_eq!(value["columns"][1], "Name");
    }
}
