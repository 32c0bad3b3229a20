use crate::{error::ConfigError, file::JobFile};
use std::collections::HashSet;
use tracing::warn;

/// `FETCH FORWARD` takes a 32-bit row count.
pub const MAX_BATCH_SIZE: usize = i32::MAX as usize;

/// Collects every problem in the file instead of stopping at the first.
pub fn validate(file: &JobFile) -> Result<(), ConfigError> {
    let mut issues = Vec::new();
    let job = &file.job;

    if job.batch_size == 0 {
        issues.push("job.batch_size must be greater than zero".to_string());
    } else if job.batch_size > MAX_BATCH_SIZE {
        issues.push(format!("job.batch_size must not exceed {MAX_BATCH_SIZE}"));
    }

    for (field, value) in [
        ("job.source_schema", &job.source_schema),
        ("job.source_table", &job.source_table),
        ("job.target_schema", &job.target_schema),
        ("job.target_table", &job.target_table),
    ] {
        if value.trim().is_empty() {
            issues.push(format!("{field} must not be empty"));
        }
    }

    let mut seen = HashSet::new();
    for column in &job.order_by {
        if column.trim().is_empty() {
            issues.push("job.order_by contains an empty column name".to_string());
        } else if !seen.insert(column.as_str()) {
            issues.push(format!("job.order_by lists `{column}` more than once"));
        }
    }

    if !matches!(
        file.logging.level.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    ) {
        issues.push(format!("logging.level `{}` is not a log level", file.logging.level));
    }

    if job.source_schema == job.target_schema
        && job.source_table == job.target_table
        && file.source.host == file.target.host
        && file.source.port == file.target.port
        && file.source.database == file.target.database
    {
        warn!(
            table = %job.source_table,
            "Source and target point at the same table"
        );
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(issues))
    }
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::{env::EnvManager, error::ConfigError, file::JobFile};

    fn file(job: &str) -> JobFile {
        let content = format!(
            r#"
[source]
host = "h"
database = "d"
user = "u"
password = "p"

[target]
host = "h"
database = "d2"
user = "u"
password = "p"

[job]
{job}
"#
        );
        JobFile::parse(&content, &EnvManager::from_vars(Vec::<(String, String)>::new())).unwrap()
    }

    #[test]
    fn test_valid_file() {
        assert!(validate(&file("source_table = \"a\"\ntarget_table = \"b\"")).is_ok());
    }

    #[test]
    fn test_collects_all_issues() {
        let f = file(
            "source_table = \"\"\ntarget_table = \"b\"\nbatch_size = 0\norder_by = [\"id\", \"id\"]",
        );
        let Err(ConfigError::Invalid(issues)) = validate(&f) else {
            panic!("expected validation failure");
        };
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().any(|i| i.contains("batch_size")));
        assert!(issues.iter().any(|i| i.contains("source_table")));
        assert!(issues.iter().any(|i| i.contains("`id` more than once")));
    }

    #[test]
    fn test_batch_size_upper_bound() {
        let largest = file("source_table = \"a\"\ntarget_table = \"b\"\nbatch_size = 2147483647");
        assert!(validate(&largest).is_ok());

        let too_large = file("source_table = \"a\"\ntarget_table = \"b\"\nbatch_size = 2147483648");
        let Err(ConfigError::Invalid(issues)) = validate(&too_large) else {
            panic!("expected validation failure");
        };
        assert_eq!(issues, vec!["job.batch_size must not exceed 2147483647".to_string()]);
    }
}
