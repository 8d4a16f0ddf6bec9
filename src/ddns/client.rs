use std::fmt;

use async_trait::async_trait;
use reqwest::{Method, Url};
use tracing::{debug, info, warn};

use super::record::TxtRecordClient;
use super::transport::{HttpTransport, ReqwestTransport};
use crate::error::{DdnsError, Result};

/// Hard limit of the ISPConfig DDNS module for TXT data.
pub const MAX_TXT_LENGTH: usize = 255;

const UPDATE_PATH: &str = "ddns/update.php";
const RECORD_TYPE: &str = "TXT";

#[derive(Debug, Clone, Copy)]
enum Action {
    Add,
    Delete,
}

impl Action {
    fn as_str(self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Delete => "delete",
        }
    }

    fn method(self) -> Method {
        match self {
            Action::Add => Method::POST,
            Action::Delete => Method::DELETE,
        }
    }
}

/// Client for the ISPConfig DDNS update endpoint.
///
/// Each call maps to exactly one request against `{endpoint}/ddns/update.php`.
/// The client keeps no state between calls besides its credentials.
pub struct DdnsClient<T = ReqwestTransport> {
    endpoint: String,
    token: String,
    update_url: Url,
    transport: T,
}

impl DdnsClient<ReqwestTransport> {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        let token = token.into();
        let update_url = update_url(&endpoint, &token)?;

        Ok(Self {
            endpoint,
            token,
            update_url,
            transport: ReqwestTransport::new()?,
        })
    }
}

impl<T: HttpTransport> DdnsClient<T> {
    pub fn with_transport(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        transport: T,
    ) -> Result<Self> {
        let endpoint = endpoint.into();
        let token = token.into();
        let update_url = update_url(&endpoint, &token)?;

        Ok(Self {
            endpoint,
            token,
            update_url,
            transport,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[cfg(test)]
    pub(crate) fn token(&self) -> &str {
        &self.token
    }

    fn request_url(&self, action: Action, fqdn: &str, value: &str) -> Url {
        let mut url = self.update_url.clone();
        url.query_pairs_mut()
            .append_pair("action", action.as_str())
            .append_pair("type", RECORD_TYPE)
            .append_pair("record", fqdn)
            .append_pair("data", value);
        url
    }

    async fn update(&self, action: Action, fqdn: &str, value: &str) -> Result<()> {
        if value.len() > MAX_TXT_LENGTH {
            return Err(DdnsError::config(format!(
                "TXT record is too big, max {} chars allowed",
                MAX_TXT_LENGTH
            )));
        }

        let url = self.request_url(action, fqdn, value);
        let url_str = url.to_string();
        debug!(action = action.as_str(), url = %url_str, "Sending DDNS update");

        let response = self.transport.send(action.method(), url).await?;

        if !response.status.is_success() {
            return Err(DdnsError::Http {
                status: response.status,
                url: url_str,
                body: response.body,
            });
        }

        if response.body.trim() != "OK" {
            warn!(
                record = %fqdn,
                status = %response.status,
                body = %response.body.trim(),
                "DDNS endpoint accepted the request with an unexpected body"
            );
        }

        info!(action = action.as_str(), record = %fqdn, "TXT record updated");
        Ok(())
    }
}

#[async_trait]
impl<T: HttpTransport> TxtRecordClient for DdnsClient<T> {
    async fn set_txt_record(&self, fqdn: &str, value: &str) -> Result<()> {
        self.update(Action::Add, fqdn, value).await
    }

    async fn del_txt_record(&self, fqdn: &str, value: &str) -> Result<()> {
        self.update(Action::Delete, fqdn, value).await
    }
}

impl<T> fmt::Debug for DdnsClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DdnsClient")
            .field("endpoint", &self.endpoint)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

fn update_url(endpoint: &str, token: &str) -> Result<Url> {
    if endpoint.is_empty() {
        return Err(DdnsError::config(format!("Missing endpoint: {}", endpoint)));
    }
    if token.is_empty() {
        return Err(DdnsError::config(format!("Missing token: {}", token)));
    }

    let base = endpoint.trim_end_matches('/');
    Url::parse(&format!("{}/{}", base, UPDATE_PATH))
        .map_err(|e| DdnsError::config(format!("Invalid endpoint {}: {}", endpoint, e)))
}
