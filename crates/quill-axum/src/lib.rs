//! Quill Axum Integration
//!
//! Tower middleware and extractors that put Quill bearer-token auth in front
//! of Axum handlers.
//!
//! # Overview
//!
//! - **Middleware**: [`AuthLayer`] validates `Authorization: Bearer <token>`
//!   and attaches the caller's [`AuthContext`] to the request
//! - **Extractors**: [`RequireAuth`] and [`MaybeAuth`] read that context back
//!
//! # Quick Start
//!
//! ```ignore
//! use quill_axum::{AuthLayer, RequireAuth};
//! use axum::{Router, routing::get};
//!
//! async fn profile(auth: RequireAuth) -> String {
//!     format!("Hello, {}!", auth.username())
//! }
//!
//! let app = Router::new()
//!     .route("/profile", get(profile))
//!     .layer(AuthLayer::required(validator));
//! ```
//!
//! # Gate modes
//!
//! - [`GateMode::Required`] - rejects with 401 before the handler runs
//! - [`GateMode::Optional`] - any missing or bad credential means anonymous

pub mod context;
pub mod error;
pub mod extractors;
pub mod layer;

pub use context::AuthContext;
pub use error::GateError;
pub use extractors::{AuthContextExt, MaybeAuth, RequireAuth};
pub use layer::{bearer_token, AuthGate, AuthGateFuture, AuthLayer, GateMode};
