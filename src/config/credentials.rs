use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use super::settings::AuthenticatorConfig;
use crate::error::{DdnsError, Result};

/// Endpoint and token used to reach the DDNS module.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub endpoint: String,
    pub token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint", &self.endpoint)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

#[derive(Deserialize)]
struct CredentialsFile {
    endpoint: Option<String>,
    token: Option<String>,
}

fn load_credentials_file(path: &Path) -> Result<CredentialsFile> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        if let Ok(metadata) = fs::metadata(path) {
            let mode = metadata.permissions().mode() & 0o777;
            if mode & 0o077 != 0 {
                warn!(
                    path = %path.display(),
                    mode = %format!("{:o}", mode),
                    "Credentials file is accessible by other users (should be 0600 or 0400)"
                );
            }
        }
    }

    let content = fs::read_to_string(path).map_err(|e| {
        DdnsError::config(format!(
            "Failed to read credentials file {}: {}",
            path.display(),
            e
        ))
    })?;

    toml::from_str(&content).map_err(|e| {
        DdnsError::config(format!(
            "Failed to parse credentials file {}: {}",
            path.display(),
            e
        ))
    })
}

/// Resolve endpoint and token for the authenticator.
///
/// Each field uses the direct value from `config` when present. The
/// credentials file is only read when a field is still missing.
pub fn resolve_credentials(config: &AuthenticatorConfig) -> Result<Credentials> {
    if let (Some(endpoint), Some(token)) = (&config.endpoint, &config.token) {
        debug!("Using endpoint and token given directly");
        return Ok(Credentials {
            endpoint: endpoint.clone(),
            token: token.clone(),
        });
    }

    let path = config.credentials.as_deref().ok_or_else(|| {
        DdnsError::config(
            "Missing credentials: set both endpoint and token, or a credentials file",
        )
    })?;

    let file = load_credentials_file(path)?;
    debug!(path = %path.display(), "Loaded credentials file");

    let endpoint = config
        .endpoint
        .clone()
        .or(file.endpoint)
        .ok_or_else(|| missing_key(path, "endpoint"))?;
    let token = config
        .token
        .clone()
        .or(file.token)
        .ok_or_else(|| missing_key(path, "token"))?;

    Ok(Credentials { endpoint, token })
}

fn missing_key(path: &Path, key: &str) -> DdnsError {
    DdnsError::config(format!(
        "Missing property in credentials file {}: {}",
        path.display(),
        key
    ))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn credentials_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_from_file() {
        let file = credentials_file(
            r#"
endpoint = "http://endpoint"
token = "token123"
"#,
        );
        let config = AuthenticatorConfig::with_credentials_file(file.path());

        let creds = resolve_credentials(&config).unwrap();
        assert_eq!(creds.endpoint, "http://endpoint");
        assert_eq!(creds.token, "token123");
    }

    #[test]
    fn test_direct_values_skip_file() {
        let mut config = AuthenticatorConfig::with_direct("http://endpoint", "token123");
        config.credentials = Some("/nonexistent/credentials.toml".into());

        let creds = resolve_credentials(&config).unwrap();
        assert_eq!(creds.endpoint, "http://endpoint");
        assert_eq!(creds.token, "token123");
    }

    #[test]
    fn test_direct_value_overrides_file_field() {
        let file = credentials_file(
            r#"
endpoint = "http://from-file"
token = "file-token"
"#,
        );
        let mut config = AuthenticatorConfig::with_credentials_file(file.path());
        config.token = Some("cli-token".to_string());

        let creds = resolve_credentials(&config).unwrap();
        assert_eq!(creds.endpoint, "http://from-file");
        assert_eq!(creds.token, "cli-token");
    }

    #[test]
    fn test_missing_key() {
        let file = credentials_file("endpoint = \"http://endpoint\"\n");
        let config = AuthenticatorConfig::with_credentials_file(file.path());

        let err = resolve_credentials(&config).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().ends_with(": token"), "{err}");
    }

    #[test]
    fn test_missing_file() {
        let config = AuthenticatorConfig::with_credentials_file("/nonexistent/credentials.toml");

        let err = resolve_credentials(&config).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("Failed to read credentials file"));
    }

    #[test]
    fn test_unparseable_file() {
        let file = credentials_file("endpoint = http://unquoted\n");
        let config = AuthenticatorConfig::with_credentials_file(file.path());

        let err = resolve_credentials(&config).unwrap_err();
        assert!(err.to_string().contains("Failed to parse credentials file"));
    }

    #[test]
    fn test_nothing_configured() {
        let err = resolve_credentials(&AuthenticatorConfig::default()).unwrap_err();
        assert!(err.to_string().starts_with("Missing credentials"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let creds = Credentials {
            endpoint: "http://endpoint".to_string(),
            token: "token123".to_string(),
        };
        assert!(!format!("{:?}", creds).contains("token123"));
    }
}
