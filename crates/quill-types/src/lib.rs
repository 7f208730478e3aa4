//! Quill Types - Shared domain types
//!
//! This crate contains domain types used across Quill crates:
//! - User identity and the request-scoped principal
//! - Owned resource references

pub mod principal;
pub mod resource;
pub mod user;

pub use principal::*;
pub use resource::*;
pub use user::*;
