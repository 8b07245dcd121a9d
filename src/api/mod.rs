//! CandiDash API access: typed client, auth token storage, error taxonomy,
//! and the [`Backend`] seam the wizard is driven through.

pub mod auth;
pub mod backend;
pub mod client;
pub mod error;

pub use auth::{AuthToken, TokenStore};
pub use backend::Backend;
pub use client::ApiClient;
pub use error::ApiError;
