use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReflectConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8766,
        }
    }
}

/// Upstream text-generation settings. The credential itself never lives in
/// the file; `api_key_env` names the environment variable that holds it.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GenerationConfig {
    pub base_url: String,
    pub model: String,
    pub api_key_env: String,
    pub temperature: f32,
    pub question_max_tokens: u32,
    pub report_max_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            temperature: 0.7,
            question_max_tokens: 300,
            report_max_tokens: 2000,
            timeout_seconds: 30,
        }
    }
}

impl GenerationConfig {
    /// Read the credential from the configured environment variable.
    /// Returns `None` when unset or blank, which selects fallback-only mode.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub log_path: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            log_path: "analytics.json".to_string(),
        }
    }
}

impl ReflectConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path).required(false))
            .build()?;
        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = ReflectConfig::load("/nonexistent/reflect-config-test").unwrap();
        assert_eq!(config.http.port, 8766);
        assert_eq!(config.generation.question_max_tokens, 300);
        assert_eq!(config.generation.report_max_tokens, 2000);
        assert_eq!(config.analytics.log_path, "analytics.json");
    }

    #[test]
    fn test_partial_file_overrides_only_named_fields() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[http]\nhost = \"0.0.0.0\"\nport = 9000\n\n[generation]\nmodel = \"test-model\"\n"
        )
        .unwrap();

        let config = ReflectConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.generation.model, "test-model");
        // Untouched fields in a partially specified section keep their defaults
        assert_eq!(config.generation.api_key_env, "GROQ_API_KEY");
        assert!((config.generation.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.service.log_level, "info");
    }

    #[test]
    fn test_blank_api_key_is_treated_as_absent() {
        let generation = GenerationConfig {
            api_key_env: "REFLECT_TEST_BLANK_KEY".to_string(),
            ..Default::default()
        };
        std::env::set_var("REFLECT_TEST_BLANK_KEY", "   ");
        assert!(generation.api_key().is_none());
        std::env::remove_var("REFLECT_TEST_BLANK_KEY");
        assert!(generation.api_key().is_none());
    }
}
