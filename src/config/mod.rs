mod credentials;
mod settings;

pub use credentials::{resolve_credentials, Credentials};
pub use settings::{AuthenticatorConfig, DEFAULT_PROPAGATION_SECONDS};
