use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Environment variables from the process, optionally overlaid with a
/// `.env` file.
#[derive(Debug, Clone, Default)]
pub struct EnvManager {
    vars: HashMap<String, String>,
}

impl EnvManager {
    pub fn new() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Load variables from a .env file. File entries win over the process
    /// environment.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        self.parse_env_content(&content)
            .map_err(|(line, message)| ConfigError::EnvFile {
                path: path.to_path_buf(),
                line,
                message,
            })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), (usize, String)> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);
            let Some((key, value)) = line.split_once('=') else {
                return Err((line_num + 1, "expected KEY=VALUE".to_string()));
            };

            let key = key.trim();
            if key.is_empty() {
                return Err((line_num + 1, "empty key".to_string()));
            }

            self.vars
                .insert(key.to_string(), Self::unquote_value(value));
        }

        Ok(())
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();

        for quote in ['"', '\''] {
            if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
                return value[1..value.len() - 1].to_string();
            }
        }

        value.to_string()
    }

    /// Replaces every `${NAME}` in `text`. Unknown names are an error, `$`
    /// not followed by `{` is kept as is.
    pub fn interpolate(&self, text: &str) -> Result<String, ConfigError> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                return Err(ConfigError::UnterminatedPlaceholder(text.to_string()));
            };

            let name = after[..end].trim();
            let value = self
                .get(name)
                .ok_or_else(|| ConfigError::UndefinedVariable(name.to_string()))?;
            out.push_str(value);
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> EnvManager {
        EnvManager::from_vars(Vec::<(String, String)>::new())
    }

    #[test]
    fn test_parse_basic_env() {
        let mut env = empty();
        let content = r#"
# Comment
KEY1=value1
export KEY2=value2
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.get("KEY1"), Some("value1"));
        assert_eq!(env.get("KEY2"), Some("value2"));
    }

    #[test]
    fn test_parse_quoted_values() {
        let mut env = empty();
        let content = r#"
QUOTED="value with spaces"
SINGLE='single quoted'
WITH_EQ=a=b
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.get("QUOTED"), Some("value with spaces"));
        assert_eq!(env.get("SINGLE"), Some("single quoted"));
        assert_eq!(env.get("WITH_EQ"), Some("a=b"));
    }

    #[test]
    fn test_invalid_env_format() {
        let mut env = empty();
        assert_eq!(
            env.parse_env_content("OK=1\nINVALID LINE").unwrap_err().0,
            2
        );
    }

    #[test]
    fn test_interpolate() {
        let env = EnvManager::from_vars([("USER", "app"), ("PASS", "p$w")]);
        assert_eq!(
            env.interpolate("${USER}:${ PASS }@$host").unwrap(),
            "app:p$w@$host"
        );
        assert!(matches!(
            env.interpolate("${MISSING}"),
            Err(ConfigError::UndefinedVariable(name)) if name == "MISSING"
        ));
        assert!(matches!(
            env.interpolate("${USER"),
            Err(ConfigError::UnterminatedPlaceholder(_))
        ));
    }
}
