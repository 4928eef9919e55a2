use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "docsort";

/// API key lookup: environment first, then a key file in the config dir
pub struct CredentialManager;

impl CredentialManager {
    /// Environment variable consulted for a provider, e.g. `OPENAI_API_KEY`
    fn env_var(provider: &str) -> String {
        format!("{}_API_KEY", provider.to_uppercase())
    }

    /// Key file path, `<config dir>/docsort/<provider>_key`
    fn key_file_path(provider: &str) -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(format!("{}_key", provider)))
    }

    /// Get an API key from the environment or the key file
    pub fn get_api_key(provider: &str) -> Result<String, String> {
        if let Ok(key) = std::env::var(Self::env_var(provider)) {
            if !key.trim().is_empty() {
                return Ok(key.trim().to_string());
            }
        }

        if let Some(path) = Self::key_file_path(provider) {
            if path.exists() {
                let encoded = fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read API key: {}", e))?;
                tracing::debug!(path = %path.display(), "Retrieved API key from file");
                return decode_key(&encoded);
            }
        }

        Err(format!(
            "API key not found: set {} or store one in the config directory",
            Self::env_var(provider)
        ))
    }
}

fn decode_key(encoded: &str) -> Result<String, String> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| format!("Invalid key file: {}", e))?;
    String::from_utf8(bytes).map_err(|e| format!("Invalid UTF-8: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_name() {
        assert_eq!(CredentialManager::env_var("openai"), "OPENAI_API_KEY");
    }

    #[test]
    fn test_decode_key_roundtrip() {
        let encoded = STANDARD.encode("sk-test-123");
        assert_eq!(decode_key(&format!("{}\n", encoded)).unwrap(), "sk-test-123");
        assert!(decode_key("not base64 !!").is_err());
    }

    #[test]
    fn test_key_file_lives_under_app_dir() {
        if let Some(path) = CredentialManager::key_file_path("openai") {
            assert!(path.ends_with("docsort/openai_key"));
        }
    }
}
