use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

const DEFAULT_APP_NAME: &str = "Contract Summariser";
const DEFAULT_HF_MODEL: &str = "microsoft/DialoGPT-medium";
const DEFAULT_HF_BASE_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL_NAME: &str = "gpt-4o-mini";
const DEFAULT_TRANSLATE_URL: &str = "https://libretranslate.com";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the contract assistant.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Human-readable service name reported by the health endpoint.
    pub app_name: String,
    /// Deployment environment label (`development`, `production`, ...).
    pub environment: String,
    /// HuggingFace inference token; the provider is disabled when absent.
    pub hf_api_key: Option<String>,
    /// HuggingFace model used for text generation.
    pub hf_model: String,
    /// Base URL of the HuggingFace inference API.
    pub hf_base_url: String,
    /// OpenAI API key; the provider is disabled when absent.
    pub openai_api_key: Option<String>,
    /// Base URL of the OpenAI-compatible chat completions API.
    pub openai_base_url: String,
    /// Chat model requested from the OpenAI-compatible provider.
    pub model_name: String,
    /// LibreTranslate endpoint used for bilingual answers.
    pub translate_url: String,
    /// Optional LibreTranslate API key.
    pub translate_api_key: Option<String>,
    /// Whether bilingual answers may call the translation service.
    pub enable_translation: bool,
    /// Maximum accepted upload size in megabytes.
    pub max_upload_mb: usize,
    /// Character window used when splitting contracts for summarization.
    pub summary_chunk_chars: usize,
    /// Character overlap between adjacent summarization windows.
    pub summary_chunk_overlap: usize,
    /// Whether image-only PDF pages are sent through OCR.
    pub enable_ocr: bool,
    /// Rasterization resolution for OCR.
    pub ocr_dpi: u32,
    /// Tesseract language code.
    pub ocr_language: String,
    /// Request timeout applied by the HTTP capability clients.
    pub llm_timeout_secs: u64,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app_name: load_env_or("APP_NAME", DEFAULT_APP_NAME),
            environment: load_env_or("ENV", "development"),
            hf_api_key: load_env_optional("HF_API_KEY"),
            hf_model: load_env_or("HF_MODEL", DEFAULT_HF_MODEL),
            hf_base_url: load_env_or("HF_BASE_URL", DEFAULT_HF_BASE_URL),
            openai_api_key: load_env_optional("OPENAI_API_KEY"),
            openai_base_url: load_env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            model_name: load_env_or("MODEL_NAME", DEFAULT_MODEL_NAME),
            translate_url: load_env_or("TRANSLATE_URL", DEFAULT_TRANSLATE_URL),
            translate_api_key: load_env_optional("TRANSLATE_API_KEY"),
            enable_translation: load_flag("ENABLE_TRANSLATION", true),
            max_upload_mb: load_parsed("MAX_UPLOAD_MB", 20)?,
            summary_chunk_chars: require_positive(
                "SUMMARY_CHUNK_CHARS",
                load_parsed("SUMMARY_CHUNK_CHARS", 6000)?,
            )?,
            summary_chunk_overlap: load_parsed("SUMMARY_CHUNK_OVERLAP", 400)?,
            enable_ocr: load_flag("ENABLE_OCR", true),
            ocr_dpi: load_parsed("OCR_DPI", 300)?,
            ocr_language: load_env_or("OCR_LANGUAGE", "eng"),
            llm_timeout_secs: load_parsed("LLM_TIMEOUT_SECS", 60)?,
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }

    /// Upload size limit expressed in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for Config {
    /// Configuration with every provider disabled, matching an empty environment.
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.into(),
            environment: "development".into(),
            hf_api_key: None,
            hf_model: DEFAULT_HF_MODEL.into(),
            hf_base_url: DEFAULT_HF_BASE_URL.into(),
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.into(),
            model_name: DEFAULT_MODEL_NAME.into(),
            translate_url: DEFAULT_TRANSLATE_URL.into(),
            translate_api_key: None,
            enable_translation: true,
            max_upload_mb: 20,
            summary_chunk_chars: 6000,
            summary_chunk_overlap: 400,
            enable_ocr: true,
            ocr_dpi: 300,
            ocr_language: "eng".into(),
            llm_timeout_secs: 60,
            server_port: None,
        }
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn load_env_or(key: &str, default: &str) -> String {
    load_env_optional(key).unwrap_or_else(|| default.to_string())
}

fn load_parsed<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match load_env_optional(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Summary windows of zero characters cannot be split.
fn require_positive(key: &str, value: usize) -> Result<usize, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue(key.to_string()));
    }
    Ok(value)
}

fn load_flag(key: &str, default: bool) -> bool {
    load_env_optional(key)
        .map(|value| parse_flag(&value))
        .unwrap_or(default)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        app_name = %config.app_name,
        environment = %config.environment,
        huggingface = config.hf_api_key.is_some(),
        openai = config.openai_api_key.is_some(),
        enable_ocr = config.enable_ocr,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flag_accepts_common_truthy_values() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" TRUE "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("nope"));
    }

    #[test]
    fn default_config_matches_documented_limits() {
        let config = Config::default();
        assert_eq!(config.max_upload_bytes(), 20 * 1024 * 1024);
        assert_eq!(config.summary_chunk_chars, 6000);
        assert_eq!(config.summary_chunk_overlap, 400);
        assert_eq!(config.ocr_dpi, 300);
        assert!(config.hf_api_key.is_none());
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn zero_summary_window_is_invalid() {
        let error = require_positive("SUMMARY_CHUNK_CHARS", 0).unwrap_err();
        assert!(matches!(error, ConfigError::InvalidValue(key) if key == "SUMMARY_CHUNK_CHARS"));
        assert_eq!(require_positive("SUMMARY_CHUNK_CHARS", 6000).unwrap(), 6000);
    }
}
