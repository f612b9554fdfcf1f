//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config
            .get(section, key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[data]
format = csv
path = /srv/eod

[merge]
bounds = exclusive
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(adapter.get_string("data", "format"), Some("csv".to_string()));
        assert_eq!(adapter.get_string("data", "path"), Some("/srv/eod".to_string()));
        assert_eq!(
            adapter.get_string("merge", "bounds"),
            Some("exclusive".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_or_blank() {
        let adapter = FileConfigAdapter::from_string("[data]\npath =\n").unwrap();
        assert_eq!(adapter.get_string("data", "path"), None);
        assert_eq!(adapter.get_string("data", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_value_or_default() {
        let adapter =
            FileConfigAdapter::from_string("[risk]\nrolling_period = 12\nbad = abc\n").unwrap();
        assert_eq!(adapter.get_int("risk", "rolling_period", 6), 12);
        assert_eq!(adapter.get_int("risk", "missing", 6), 6);
        assert_eq!(adapter.get_int("risk", "bad", 6), 6);
    }

    #[test]
    fn get_list_splits_and_trims() {
        let adapter =
            FileConfigAdapter::from_string("[request]\ncodes = VWRL.LSE , IGLT.LSE,,SPY.US\n")
                .unwrap();
        assert_eq!(
            adapter.get_list("request", "codes"),
            vec!["VWRL.LSE", "IGLT.LSE", "SPY.US"]
        );
        assert!(adapter.get_list("request", "ids").is_empty());
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[issuers]\npath = /srv/issuers.csv\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("issuers", "path"),
            Some("/srv/issuers.csv".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}
