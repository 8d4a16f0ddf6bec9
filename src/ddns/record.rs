use async_trait::async_trait;

use crate::error::Result;

/// Record-level operations the authenticator needs from a DNS backend.
#[async_trait]
pub trait TxtRecordClient: Send + Sync {
    /// Add (or update) the TXT record `fqdn` with `value`
    async fn set_txt_record(&self, fqdn: &str, value: &str) -> Result<()>;

    /// Remove the TXT record `fqdn` holding `value`
    async fn del_txt_record(&self, fqdn: &str, value: &str) -> Result<()>;
}
