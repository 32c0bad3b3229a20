//! Session parameters pinned on every connection so that values read as text
//! on one server parse back identically on the other.

const COMMON_DATESTYLE: &str = "ISO";
const COMMON_INTERVALSTYLE: &str = "postgres";
const COMMON_EXTRA_FLOAT_DIGITS: i32 = 3;
const COMMON_CLIENT_ENCODING: &str = "UTF8";
const COMMON_TIMEZONE: &str = "UTC";
const COMMON_BYTEA_OUTPUT: &str = "hex";

pub const DEFAULT_APPLICATION_NAME: &str = "tablecopy";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub datestyle: String,
    pub intervalstyle: String,
    pub extra_float_digits: i32,
    pub client_encoding: String,
    pub timezone: String,
    pub bytea_output: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            datestyle: COMMON_DATESTYLE.to_string(),
            intervalstyle: COMMON_INTERVALSTYLE.to_string(),
            extra_float_digits: COMMON_EXTRA_FLOAT_DIGITS,
            client_encoding: COMMON_CLIENT_ENCODING.to_string(),
            timezone: COMMON_TIMEZONE.to_string(),
            bytea_output: COMMON_BYTEA_OUTPUT.to_string(),
        }
    }
}

impl SessionOptions {
    /// Value for the startup `options` parameter.
    pub fn to_options_string(&self) -> String {
        format!(
            "-c datestyle={} -c intervalstyle={} -c extra_float_digits={} -c client_encoding={} -c timezone={} -c bytea_output={}",
            self.datestyle,
            self.intervalstyle,
            self.extra_float_digits,
            self.client_encoding,
            self.timezone,
            self.bytea_output,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::SessionOptions;

    #[test]
    fn test_options_string() {
        let options = SessionOptions::default().to_options_string();
        assert!(options.starts_with("-c datestyle=ISO "));
        assert!(options.contains("-c extra_float_digits=3"));
        assert!(options.ends_with("-c bytea_output=hex"));
    }
}
