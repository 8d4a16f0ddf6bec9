//! ACME DNS-01 authenticator for ISPConfig domains.
//!
//! The TXT record is published through the ISPConfig DDNS module
//! (`/ddns/update.php`) using a module token instead of the remote API.

pub mod acme;
pub mod config;
pub mod ddns;
pub mod error;

pub use acme::{Authenticator, Dns01Challenge};
pub use config::{AuthenticatorConfig, Credentials};
pub use ddns::{DdnsClient, TxtRecordClient};
pub use error::{DdnsError, Operation, PluginError};
