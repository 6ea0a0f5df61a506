//! Configuration loader with environment variable support

use super::Config;
use crate::error::Result;
use config::{Environment, File};
use std::path::Path;

/// Environment variable prefix for gateway settings, e.g. `GENAI_API__SERVER__PORT`
const ENV_PREFIX: &str = "GENAI_API";

/// Load configuration: built-in defaults, then the TOML file if present, then
/// environment overrides.
///
/// The platform variables `GOOGLE_CLOUD_PROJECT`, `GOOGLE_CLOUD_LOCATION` and `PORT`
/// take precedence over everything else.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let defaults = config::Config::try_from(&Config::default_config())?;

    let config = config::Config::builder()
        .add_source(defaults)
        .add_source(File::from(path.as_ref()).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
        )
        .set_override_option("vertex.project", non_empty_env("GOOGLE_CLOUD_PROJECT"))?
        .set_override_option("vertex.location", non_empty_env("GOOGLE_CLOUD_LOCATION"))?
        .set_override_option("server.port", port_from_env())?
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    Ok(cfg)
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn port_from_env() -> Option<i64> {
    non_empty_env("PORT")
        .and_then(|p| p.trim().parse::<u16>().ok())
        .map(i64::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let cfg = load_config("does-not-exist.toml").unwrap();

        assert_eq!(cfg.generation.model, "gemini-2.5-flash");
        assert_eq!(cfg.analysis.default_model, "gemini-2.5-flash");
        assert!(cfg.vertex.timeout_secs > 0);
        assert!(cfg.vertex.access_token.is_none());
    }

    #[test]
    fn test_non_empty_env_ignores_blank_values() {
        assert_eq!(non_empty_env("GENAI_API_TEST_SURELY_UNSET_VARIABLE"), None);
    }
}
