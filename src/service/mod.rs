//! Service layer: outbound proxying and credential persistence.

pub mod credential;
pub mod proxy;

pub use credential::CredentialStore;
pub use proxy::{NETWORK_SENTINEL, NO_CREDENTIAL_SENTINEL, ProxyError, ProxyService};
