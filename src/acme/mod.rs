mod authenticator;
mod challenge;

pub use authenticator::Authenticator;
pub use challenge::{Dns01Challenge, ACME_CHALLENGE_RECORD};
