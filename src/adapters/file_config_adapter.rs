//! INI file configuration adapter.

use crate::domain::error::AnalyticsError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    ini: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AnalyticsError> {
        let path = path.as_ref();
        let mut ini = Ini::new();
        ini.load(path).map_err(|reason| AnalyticsError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { ini })
    }

    pub fn from_string(content: &str) -> Result<Self, AnalyticsError> {
        let mut ini = Ini::new();
        ini.read(content.to_string())
            .map_err(|reason| AnalyticsError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { ini })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.ini.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.ini
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.ini
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.ini
            .get(section, key)
            .as_deref()
            .and_then(Self::parse_bool)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[analytics]
risk_free_rate = 0.03
forecast_periods = 12
risk_tolerance = conservative

[data]
directory = /srv/prices

[output]
pretty = no
"#;

    #[test]
    fn from_string_reads_every_section() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_double("analytics", "risk_free_rate", 0.0), 0.03);
        assert_eq!(adapter.get_int("analytics", "forecast_periods", 0), 12);
        assert_eq!(
            adapter.get_string("analytics", "risk_tolerance"),
            Some("conservative".to_string())
        );
        assert_eq!(
            adapter.get_string("data", "directory"),
            Some("/srv/prices".to_string())
        );
        assert!(!adapter.get_bool("output", "pretty", true));
    }

    #[test]
    fn missing_keys_fall_back() {
        let adapter = FileConfigAdapter::from_string("[analytics]\n").unwrap();
        assert_eq!(adapter.get_string("analytics", "seed"), None);
        assert_eq!(adapter.get_string("nowhere", "seed"), None);
        assert_eq!(adapter.get_int("analytics", "forecast_periods", 24), 24);
        assert_eq!(adapter.get_double("analytics", "var_confidence", 0.95), 0.95);
        assert!(adapter.get_bool("output", "pretty", true));
    }

    #[test]
    fn malformed_numbers_fall_back() {
        let adapter = FileConfigAdapter::from_string(
            "[analytics]\nforecast_periods = many\nrisk_free_rate = low\n",
        )
        .unwrap();
        assert_eq!(adapter.get_int("analytics", "forecast_periods", 24), 24);
        assert_eq!(adapter.get_double("analytics", "risk_free_rate", 0.02), 0.02);
    }

    #[test]
    fn bool_spellings() {
        let adapter =
            FileConfigAdapter::from_string("[output]\na = Yes\nb = off\nc = 1\nd = maybe\n")
                .unwrap();
        assert!(adapter.get_bool("output", "a", false));
        assert!(!adapter.get_bool("output", "b", true));
        assert!(adapter.get_bool("output", "c", false));
        assert!(adapter.get_bool("output", "d", true));
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_int("analytics", "forecast_periods", 0), 12);
    }

    #[test]
    fn from_file_missing_is_config_parse_error() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/marketlens.ini").unwrap_err();
        assert!(
            matches!(err, AnalyticsError::ConfigParse { file, .. } if file.contains("marketlens.ini"))
        );
    }
}
