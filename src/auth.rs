//! Identity-domain identifiers, scope sets, sessions, and access tokens.

pub mod id;
pub mod scope;
pub mod session;
pub mod token;

pub use id::*;
pub use scope::*;
pub use session::*;
pub use token::{access::*, secret::*};
