use failure::Error;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://www.csgt.vn";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    pub port: u16,
    pub max_retries: u32,
    pub processing_delay: Duration,
    pub http_timeout: Duration,
    pub tesseract: TesseractConfig,
}

#[derive(Debug, Clone)]
pub struct TesseractConfig {
    pub command: String,
    pub language: String,
}

impl Config {
    pub fn from_env() -> Result<Config, Error> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("CSGT_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url)
            .map_err(|e| format_err!("CSGT_BASE_URL {:?} is not a valid URL: {}", base_url, e))?;
        if base_url.cannot_be_a_base() {
            return Err(format_err!("CSGT_BASE_URL {} cannot be a base URL", base_url));
        }
        Ok(Config {
            base_url,
            port: parse_or(&lookup, "PORT", 8080)?,
            max_retries: parse_or(&lookup, "MAX_RETRIES", 5)?,
            processing_delay: Duration::from_millis(parse_or(&lookup, "PROCESSING_DELAY_MS", 1500)?),
            http_timeout: Duration::from_secs(parse_or(&lookup, "HTTP_TIMEOUT_SECS", 30)?),
            tesseract: TesseractConfig {
                command: lookup("TESSERACT_CMD").unwrap_or_else(|| "tesseract".to_string()),
                language: lookup("TESSERACT_LANG").unwrap_or_else(|| "eng".to_string()),
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format_err!("{} has invalid value {:?}: {}", key, raw, e)),
    }
}
