//! HTTP client for the CropSage diagnosis backend.
//!
//! Covers the public endpoints used by the diagnosis page (`classify/`,
//! `nearby_stores/`, `add_store/`) and the token-authenticated admin CRUD on
//! problems and stores.

pub mod admin;
pub mod client;
pub mod error;
pub mod token_store;
pub mod types;

pub use admin::AdminSession;
pub use client::CropSageClient;
pub use error::ApiError;
pub use token_store::TokenStore;
pub use types::AdminToken;
