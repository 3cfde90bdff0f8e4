use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// Keys absent from the file keep their defaults.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so two runs can be matched to the settings they used.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let config_content = r#"
[source]
base-url = "https://movie.example.com/top250"
page-size = 20
page-count = 5

[request]
user-agent = "TestAgent/1.0"
accept-language = "en"
connection = "keep-alive"
timeout-secs = 3

[crawler]
max-retries = 2
delay-min-ms = 0
delay-max-ms = 10
challenge-cooldown-ms = 50
error-backoff-ms = 20
challenge-marker = "blocked"
max-workers = 8

[output]
dataset-path = "./out/movies.csv"
image-dir = "./out/img"
archive-dir = "./out/raw"
chart-path = "./out/chart.svg"
summary-path = "./out/summary.md"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.source.page_size, 20);
        assert_eq!(config.source.page_count, 5);
        assert_eq!(config.request.user_agent, "TestAgent/1.0");
        assert_eq!(config.crawler.max_retries, 2);
        assert_eq!(config.crawler.max_workers, 8);
        assert_eq!(config.crawler.challenge_marker, "blocked");
        assert_eq!(config.output.image_dir, "./out/img");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config_content = r#"
[crawler]
max-workers = 2
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_workers, 2);
        assert_eq!(config.crawler.max_retries, 3);
        assert_eq!(config.crawler.delay_min_ms, 1000);
        assert_eq!(config.crawler.delay_max_ms, 3000);
        assert_eq!(config.source.base_url, "https://movie.douban.com/top250");
        assert_eq!(config.source.page_count, 10);
        assert_eq!(config.request.timeout_secs, 10);
        assert_eq!(config.output.archive_dir, "html_pages");
    }

    #[test]
    fn test_empty_file_is_default_config() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.source.page_size, 25);
        assert_eq!(config.crawler.challenge_marker, "检测到有异常请求");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/top-reel.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
max-workers = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("top-reel.toml");
        let config = load_config(&path).unwrap();
        let defaults = Config::default();

        assert_eq!(config.source.base_url, defaults.source.base_url);
        assert_eq!(config.request.user_agent, defaults.request.user_agent);
        assert_eq!(config.crawler.challenge_marker, defaults.crawler.challenge_marker);
        assert_eq!(config.output.chart_path, defaults.output.chart_path);
    }
}
