use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// ACME challenge record label
pub const ACME_CHALLENGE_RECORD: &str = "_acme-challenge";

/// A pending DNS-01 challenge as handed over by the ACME client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dns01Challenge {
    domain: String,
    validation: String,
}

impl Dns01Challenge {
    /// `validation` is the TXT value itself (certbot's `CERTBOT_VALIDATION`).
    pub fn new(domain: impl Into<String>, validation: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            validation: validation.into(),
        }
    }

    /// Derive the TXT value from a key authorization:
    /// base64url(SHA-256(key_authorization)) without padding.
    pub fn from_key_authorization(domain: impl Into<String>, key_authorization: &str) -> Self {
        let digest = Sha256::digest(key_authorization.as_bytes());
        Self::new(domain, URL_SAFE_NO_PAD.encode(digest))
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn validation(&self) -> &str {
        &self.validation
    }

    /// Name of the TXT record to publish, e.g. `_acme-challenge.example.org`.
    ///
    /// Wildcard names share the record of their base domain.
    pub fn validation_name(&self) -> String {
        let domain = self.domain.strip_prefix("*.").unwrap_or(&self.domain);
        format!("{}.{}", ACME_CHALLENGE_RECORD, domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_name() {
        let challenge = Dns01Challenge::new("example.org", "bar");
        assert_eq!(challenge.validation_name(), "_acme-challenge.example.org");
        assert_eq!(challenge.validation(), "bar");
    }

    #[test]
    fn test_wildcard_validation_name() {
        let challenge = Dns01Challenge::new("*.example.org", "bar");
        assert_eq!(challenge.validation_name(), "_acme-challenge.example.org");
        assert_eq!(challenge.domain(), "*.example.org");
    }

    #[test]
    fn test_from_key_authorization() {
        let challenge = Dns01Challenge::from_key_authorization(
            "example.org",
            "evaGxfADs6pSRb2LAv9IZf17Dt3juxGJ-PCt92wr-oA.nP1qzpXGymHBrUEepNY9HCsQk7K8KhOypzEt62jcerQ",
        );

        let value = challenge.validation();
        assert_eq!(value.len(), 43);
        assert!(!value.contains('='));
        assert!(value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_from_key_authorization_is_deterministic() {
        let a = Dns01Challenge::from_key_authorization("example.org", "token.thumbprint");
        let b = Dns01Challenge::from_key_authorization("example.org", "token.thumbprint");
        let c = Dns01Challenge::from_key_authorization("example.org", "token.other");
        assert_eq!(a, b);
        assert_ne!(a.validation(), c.validation());
    }
}
