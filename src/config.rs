use anyhow::Result;
use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::PathBuf;

const APP_NAME: &str = "garble";
const MAPPING_FILE: &str = "word_mapping.json";

#[derive(Debug, Deserialize, Clone)]
pub struct Theme {
    pub bg: String,      // background
    pub main: String,    // brand color (header, status)
    pub caret: String,   // input cursor block
    pub text: String,    // garbled output
    pub sub: String,     // hints, samples
    #[serde(alias = "subAlt", alias = "subalt")]
    pub sub_alt: String, // borders
    pub error: String,   // busy / warning states
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: "#2c2e34".to_string(),
            main: "#e2b714".to_string(),
            caret: "#e2b714".to_string(),
            text: "#d1d0c5".to_string(),
            sub: "#646669".to_string(),
            sub_alt: "#45474d".to_string(),
            error: "#ca4754".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MappingConfig {
    /// Overrides `<data dir>/word_mapping.json`.
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerativeConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
    pub attempts: u32,
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            timeout_secs: 30,
            attempts: 2,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub theme: Theme,
    #[serde(default)]
    pub mapping: MappingConfig,
    pub generative: GenerativeConfig,
    pub confirm_quit: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            mapping: MappingConfig::default(),
            generative: GenerativeConfig::default(),
            confirm_quit: true,
        }
    }
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// Directory for the mapping file and the log.
pub fn data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let config_path = project_dirs().map(|dirs| dirs.config_dir().join("config.toml"));
        Self::load_from(config_path)
    }

    /// defaults → config file (if present) → `GARBLE_*` environment
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let defaults = AppConfig::default();
        let theme = defaults.theme;
        let generative = defaults.generative;

        let mut builder = Config::builder()
            .set_default("theme.bg", theme.bg)?
            .set_default("theme.main", theme.main)?
            .set_default("theme.caret", theme.caret)?
            .set_default("theme.text", theme.text)?
            .set_default("theme.sub", theme.sub)?
            .set_default("theme.subAlt", theme.sub_alt)?
            .set_default("theme.error", theme.error)?
            .set_default("generative.endpoint", generative.endpoint)?
            .set_default("generative.model", generative.model)?
            .set_default("generative.timeout_secs", generative.timeout_secs as i64)?
            .set_default("generative.attempts", i64::from(generative.attempts))?
            .set_default("confirm_quit", defaults.confirm_quit)?;

        if let Some(config_path) = config_path {
            if config_path.exists() {
                builder = builder.add_source(File::from(config_path));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("GARBLE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;

        // map "subAlt"  to "sub_alt"
        let app_config: AppConfig = cfg.try_deserialize()?;

        Ok(app_config)
    }

    pub fn mapping_path(&self) -> PathBuf {
        match &self.mapping.path {
            Some(path) => PathBuf::from(path),
            None => data_dir().join(MAPPING_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let cfg = AppConfig::load_from(None).unwrap();
        assert_eq!(cfg.generative.model, "llama3.2:3b");
        assert_eq!(cfg.generative.timeout_secs, 30);
        assert_eq!(cfg.generative.attempts, 2);
        assert!(cfg.confirm_quit);
        assert_eq!(cfg.theme.sub_alt, "#45474d");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r##"
confirm_quit = false

[theme]
subAlt = "#000000"

[mapping]
path = "/tmp/custom_mapping.json"

[generative]
model = "qwen2.5:7b"
timeout_secs = 5
"##,
        )
        .unwrap();

        let cfg = AppConfig::load_from(Some(path)).unwrap();
        assert!(!cfg.confirm_quit);
        assert_eq!(cfg.theme.sub_alt, "#000000");
        assert_eq!(cfg.theme.bg, "#2c2e34");
        assert_eq!(cfg.generative.model, "qwen2.5:7b");
        assert_eq!(cfg.generative.timeout_secs, 5);
        assert_eq!(cfg.generative.endpoint, "http://localhost:11434");
        assert_eq!(cfg.mapping_path(), PathBuf::from("/tmp/custom_mapping.json"));
    }

    #[test]
    fn test_broken_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "this is = = not toml").unwrap();
        assert!(AppConfig::load_from(Some(path)).is_err());
    }

    #[test]
    fn test_default_mapping_path_is_in_data_dir() {
        let cfg = AppConfig::default();
        assert!(cfg.mapping_path().ends_with(MAPPING_FILE));
    }
}
