use crate::error::AppError;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    pub source_directory: String,
    pub output_path: String,
    #[serde(default)]
    pub remote_base_url: Option<String>,
    pub geocoding_language: String,
    pub geocoding_url: String,
    pub geocoding_user_agent: String,
    pub geocoding_timeout_secs: u64,
    pub geocoding_min_interval_ms: u64,
    pub geocoding_enabled: bool,
    pub allowed_extensions: Vec<String>,
    pub static_directory: String,
    pub web_port: u16,
    pub log_level: String,
}

/// Values supplied on the command line; they win over every other source.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub source_directory: Option<String>,
    pub output_path: Option<String>,
    pub remote_base_url: Option<String>,
    pub geocoding_language: Option<String>,
    pub geocoding_enabled: Option<bool>,
    pub web_port: Option<u16>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_directory: "images".into(),
            output_path: "images_metadata.json".into(),
            remote_base_url: None,
            geocoding_language: "fr".into(),
            geocoding_url: "https://nominatim.openstreetmap.org/".into(),
            geocoding_user_agent: "image_metadata_extractor_v1".into(),
            geocoding_timeout_secs: 1,
            geocoding_min_interval_ms: 1000,
            geocoding_enabled: true,
            allowed_extensions: ["png", "jpg", "jpeg", "tiff", "bmp", "gif"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            static_directory: "static".into(),
            web_port: 5000,
            log_level: "info".into(),
        }
    }
}

impl AppConfig {
    /// Layers defaults, the `config/` directory, an optional explicit file,
    /// `IMGMETA_*` environment variables and command-line overrides.
    pub fn load(file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, AppError> {
        let env = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let defaults = AppConfig::default();

        let mut builder = Config::builder()
            .set_default("source_directory", defaults.source_directory)?
            .set_default("output_path", defaults.output_path)?
            .set_default("geocoding_language", defaults.geocoding_language)?
            .set_default("geocoding_url", defaults.geocoding_url)?
            .set_default("geocoding_user_agent", defaults.geocoding_user_agent)?
            .set_default("geocoding_timeout_secs", defaults.geocoding_timeout_secs as i64)?
            .set_default("geocoding_min_interval_ms", defaults.geocoding_min_interval_ms as i64)?
            .set_default("geocoding_enabled", defaults.geocoding_enabled)?
            .set_default("allowed_extensions", defaults.allowed_extensions)?
            .set_default("static_directory", defaults.static_directory)?
            .set_default("web_port", defaults.web_port as i64)?
            .set_default("log_level", defaults.log_level)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let s = builder
            .add_source(Environment::with_prefix("IMGMETA"))
            .set_override_option("source_directory", overrides.source_directory.clone())?
            .set_override_option("output_path", overrides.output_path.clone())?
            .set_override_option("remote_base_url", overrides.remote_base_url.clone())?
            .set_override_option("geocoding_language", overrides.geocoding_language.clone())?
            .set_override_option("geocoding_enabled", overrides.geocoding_enabled)?
            .set_override_option("web_port", overrides.web_port.map(i64::from))?
            .build()?;

        Ok(s.try_deserialize()?)
    }

    /// Lower-cased extension allow-list used by the directory walker.
    pub fn extension_set(&self) -> HashSet<String> {
        self.allowed_extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect()
    }
}
