use std::time::Duration;

use tracing::{debug, info};

use super::challenge::Dns01Challenge;
use crate::config::{resolve_credentials, AuthenticatorConfig};
use crate::ddns::{DdnsClient, TxtRecordClient};
use crate::error::{Operation, PluginError, Result};

const DESCRIPTION: &str =
    "Obtain certificates using a DNS TXT record for ISPConfig domains with DDNS module tokens";

/// DNS-01 authenticator backed by the ISPConfig DDNS module.
///
/// Challenges are handled one at a time in the order given. The first
/// failure aborts the operation and is returned as a [`PluginError`].
#[derive(Debug)]
pub struct Authenticator<C = DdnsClient> {
    client: C,
    propagation: Duration,
    attempt_cleanup: bool,
}

impl Authenticator<DdnsClient> {
    /// Resolve credentials and build the DDNS client.
    ///
    /// Configuration problems are returned directly, before any request is made.
    pub fn new(config: &AuthenticatorConfig) -> Result<Self> {
        let credentials = resolve_credentials(config)?;
        let client = DdnsClient::new(credentials.endpoint, credentials.token)?;

        info!(endpoint = %client.endpoint(), "ISPConfig DDNS authenticator ready");
        Ok(Self::with_client(client, config.propagation_delay()))
    }

    pub fn description() -> &'static str {
        DESCRIPTION
    }

    pub fn more_info() -> &'static str {
        "This plugin publishes the DNS-01 TXT record through the DDNS module of an \
         ISPConfig installation, using a module token scoped to the domain's records."
    }
}

impl<C: TxtRecordClient> Authenticator<C> {
    pub fn with_client(client: C, propagation: Duration) -> Self {
        Self {
            client,
            propagation,
            attempt_cleanup: false,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn propagation(&self) -> Duration {
        self.propagation
    }

    /// Publish every challenge record, then wait for DNS propagation.
    pub async fn perform(
        &mut self,
        challenges: &[Dns01Challenge],
    ) -> std::result::Result<(), PluginError> {
        if challenges.is_empty() {
            return Ok(());
        }

        self.attempt_cleanup = true;

        for challenge in challenges {
            let record = challenge.validation_name();
            debug!(record = %record, "Publishing challenge record");
            self.client
                .set_txt_record(&record, challenge.validation())
                .await
                .map_err(|e| PluginError::new(Operation::Perform, record, e))?;
        }

        if !self.propagation.is_zero() {
            info!(
                seconds = self.propagation.as_secs(),
                "Waiting for DNS changes to propagate"
            );
            tokio::time::sleep(self.propagation).await;
        }

        Ok(())
    }

    /// Remove the records published by [`perform`](Self::perform).
    ///
    /// Does nothing unless a perform was attempted (or [`arm_cleanup`](Self::arm_cleanup)
    /// was called).
    pub async fn cleanup(
        &mut self,
        challenges: &[Dns01Challenge],
    ) -> std::result::Result<(), PluginError> {
        if !self.attempt_cleanup {
            debug!("No perform attempted, skipping cleanup");
            return Ok(());
        }

        for challenge in challenges {
            let record = challenge.validation_name();
            debug!(record = %record, "Removing challenge record");
            self.client
                .del_txt_record(&record, challenge.validation())
                .await
                .map_err(|e| PluginError::new(Operation::Cleanup, record, e))?;
        }

        Ok(())
    }

    /// Allow cleanup when perform ran in another process, as with certbot hooks.
    pub fn arm_cleanup(&mut self) {
        self.attempt_cleanup = true;
    }
}
