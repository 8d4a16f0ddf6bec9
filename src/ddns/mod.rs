mod client;
mod record;
mod transport;

pub use client::{DdnsClient, MAX_TXT_LENGTH};
pub use record::TxtRecordClient;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
