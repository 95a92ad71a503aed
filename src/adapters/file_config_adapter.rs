//! INI file configuration adapter.

use crate::domain::error::LakaspiacError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LakaspiacError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LakaspiacError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| LakaspiacError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" | "igen" => Some(true),
            "false" | "no" | "0" | "nem" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
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

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    const FULL: &str = r#"
[data]
path = /srv/lakaspiac/budapest_lakaspiac_osszefuzve.csv

[filter]
years = 2021,2022,2023
districts = 1,2,5
property_type = panel

[report]
top_n = 15
histogram_bins = 20
rows = yes
"#;

    #[test]
    fn from_string_parses_sections() {
        let adapter = FileConfigAdapter::from_string(FULL).unwrap();
        assert_eq!(
            adapter.get_string("data", "path"),
            Some("/srv/lakaspiac/budapest_lakaspiac_osszefuzve.csv".to_string())
        );
        assert_eq!(
            adapter.get_string("filter", "years"),
            Some("2021,2022,2023".to_string())
        );
        assert_eq!(
            adapter.get_string("filter", "property_type"),
            Some("panel".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[filter]\nyears = 2022\n").unwrap();
        assert_eq!(adapter.get_string("filter", "districts"), None);
        assert_eq!(adapter.get_string("nope", "years"), None);
    }

    #[test]
    fn get_int_and_usize() {
        let adapter = FileConfigAdapter::from_string(FULL).unwrap();
        assert_eq!(adapter.get_int("report", "top_n", 0), 15);
        assert_eq!(adapter.get_usize("report", "histogram_bins", 5), 20);
        assert_eq!(adapter.get_usize("report", "missing", 5), 5);
    }

    #[test]
    fn get_usize_rejects_non_positive() {
        let adapter = FileConfigAdapter::from_string("[report]\ntop_n = -3\nbins = 0\n").unwrap();
        assert_eq!(adapter.get_usize("report", "top_n", 10), 10);
        assert_eq!(adapter.get_usize("report", "bins", 20), 20);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[report]\ntop_n = lots\n").unwrap();
        assert_eq!(adapter.get_int("report", "top_n", 10), 10);
    }

    #[test]
    fn get_bool_accepts_english_and_hungarian() {
        let adapter = FileConfigAdapter::from_string(
            "[report]\na = yes\nb = igen\nc = 0\nd = nem\ne = maybe\n",
        )
        .unwrap();
        assert!(adapter.get_bool("report", "a", false));
        assert!(adapter.get_bool("report", "b", false));
        assert!(!adapter.get_bool("report", "c", true));
        assert!(!adapter.get_bool("report", "d", true));
        assert!(adapter.get_bool("report", "e", true));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config(FULL);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert!(adapter.get_bool("report", "rows", false));
    }

    #[test]
    fn from_file_missing_is_file_not_found() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/lakaspiac.ini");
        assert!(matches!(result, Err(LakaspiacError::FileNotFound { .. })));
    }
}
