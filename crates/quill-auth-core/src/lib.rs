//! Quill Auth Core - Authentication and authorization logic
//!
//! Credential hashing, signed token issuance and validation, and
//! resource-ownership decisions. Persistence is reached only through the
//! `quill-db` repository traits.

pub mod config;
pub mod crypto;
pub mod error;
pub mod ownership;
pub mod password;
pub mod service;
pub mod token;

pub use config::*;
pub use crypto::*;
pub use error::*;
pub use ownership::*;
pub use password::*;
pub use service::*;
pub use token::*;
