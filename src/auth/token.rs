//! Access token models: the redacted secret and the scoped, expiring token value.

pub mod access;
pub mod secret;
