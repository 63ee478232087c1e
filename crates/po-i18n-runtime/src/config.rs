use std::fs;
use std::path::{Path, PathBuf};

use po_i18n_core::{LocaleCode, simplified_locale};
use serde::{Deserialize, Serialize};

use crate::error::{RuntimeError, RuntimeResult};
use crate::locale::DEFAULT_DOMAIN;

pub const DEFAULT_LIBRARY: &str = "/usr/local/share/locale";
pub const DEFAULT_LANGUAGE: &str = "en_US";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GettextConfig {
    pub library: PathBuf,
    pub language: String,
    pub domain: String,
}

impl Default for GettextConfig {
    fn default() -> Self {
        Self {
            library: PathBuf::from(DEFAULT_LIBRARY),
            language: DEFAULT_LANGUAGE.to_string(),
            domain: DEFAULT_DOMAIN.to_string(),
        }
    }
}

impl GettextConfig {
    pub fn new(library: impl Into<PathBuf>, language: &str, domain: &str) -> Self {
        Self {
            library: library.into(),
            language: simplified_locale(language),
            domain: domain.to_string(),
        }
    }

    pub fn validate(&self) -> RuntimeResult<()> {
        LocaleCode::parse(&self.language)?;
        if self.domain.trim().is_empty() {
            return Err(RuntimeError::InvalidConfig("domain is empty".to_string()));
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> RuntimeResult<GettextConfig> {
    let contents = fs::read_to_string(path)?;
    let mut config: GettextConfig = toml::from_str(&contents)?;
    config.language = simplified_locale(&config.language);
    config.validate()?;
    Ok(config)
}

pub fn load_config_or_default(path: &Path) -> RuntimeResult<GettextConfig> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(GettextConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{GettextConfig, load_config, load_config_or_default};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        path.push(format!("po_i18n_{name}_{nanos}.toml"));
        path
    }

    #[test]
    fn uses_default_when_missing() {
        let path = temp_path("missing");
        let config = load_config_or_default(&path).expect("config");
        assert_eq!(config, GettextConfig::default());
        assert_eq!(config.language, "en_US");
        assert_eq!(config.domain, "default");
    }

    #[test]
    fn loads_and_simplifies_language() {
        let path = temp_path("config");
        let contents = r#"
library = "locales"
language = "de_DE.UTF-8@euro"
domain = "app"
"#;
        fs::write(&path, contents).expect("write");
        let config = load_config_or_default(&path).expect("config");
        assert_eq!(config.library, PathBuf::from("locales"));
        assert_eq!(config.language, "de_DE");
        assert_eq!(config.domain, "app");
        fs::remove_file(&path).ok();
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let path = temp_path("partial");
        fs::write(&path, "language = \"fr\"\n").expect("write");
        let config = load_config(&path).expect("config");
        assert_eq!(config.language, "fr");
        assert_eq!(config.domain, "default");
        assert_eq!(config.library, PathBuf::from("/usr/local/share/locale"));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn rejects_empty_domain() {
        let path = temp_path("empty_domain");
        fs::write(&path, "domain = \"\"\n").expect("write");
        let err = load_config(&path).expect_err("empty domain");
        assert_eq!(err.to_string(), "invalid config: domain is empty");
        fs::remove_file(&path).ok();
    }

    #[test]
    fn rejects_malformed_toml() {
        let path = temp_path("malformed");
        fs::write(&path, "language = [").expect("write");
        let err = load_config(&path).expect_err("malformed");
        assert!(err.to_string().starts_with("toml error"));
        fs::remove_file(&path).ok();
    }
}
