//! System instruction resources loaded at startup

use crate::error::{GatewayError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Persona instructions read once and shared verbatim
#[derive(Debug, Clone)]
pub struct SystemInstructions {
    styleco: Arc<str>,
    source: PathBuf,
}

impl SystemInstructions {
    /// Read the styleco customer service instruction from `dir/file`
    pub async fn load(dir: impl AsRef<Path>, file: &str) -> Result<Self> {
        let path = dir.as_ref().join(file);

        let text = tokio::fs::read_to_string(&path).await.map_err(|e| {
            error!("Failed to read system instruction {}: {}", path.display(), e);
            GatewayError::Config(format!(
                "Cannot read system instruction {}: {}",
                path.display(),
                e
            ))
        })?;

        info!("Loaded system instruction from {} ({} bytes)", path.display(), text.len());

        Ok(Self {
            styleco: Arc::from(text),
            source: path,
        })
    }

    /// Build from in-memory text
    pub fn from_text(styleco: impl Into<String>) -> Self {
        Self {
            styleco: Arc::from(styleco.into()),
            source: PathBuf::new(),
        }
    }

    /// The styleco customer service persona
    pub fn styleco(&self) -> &str {
        &self.styleco
    }

    /// File the instruction was read from, empty for in-memory text
    pub fn source(&self) -> &Path {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instructions_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("instructions")
    }

    #[tokio::test]
    async fn test_load_bundled_instruction() {
        let instructions = SystemInstructions::load(instructions_dir(), "styleco_customer_service.txt")
            .await
            .unwrap();

        assert!(instructions.styleco().contains("StyleCo"));
        assert!(instructions.source().ends_with("styleco_customer_service.txt"));
    }

    #[tokio::test]
    async fn test_missing_instruction_is_config_error() {
        let result = SystemInstructions::load(instructions_dir(), "does_not_exist.txt").await;
        tokio_test::assert_err!(&result);
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_text_is_kept_verbatim() {
        let text = "  Be kind.\n\nAlways answer in English.\n";
        assert_eq!(SystemInstructions::from_text(text).styleco(), text);
    }
}
