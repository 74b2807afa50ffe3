//! Typed access to the seller platform's remote HTTP API.
//!
//! This crate owns everything both the `server` gateway and the `sellerctl`
//! CLI need to talk to the PHP backend: configuration, envelope decoding,
//! entity mirrors with required-field checks, the resource catalogue, and the
//! small pure utilities (pagination defaults, GST arithmetic, number
//! formatting, Excel export).
//!
//! The remote API is the system of record. Nothing here caches or owns
//! entity state; every call is a single authenticated request.

pub mod backend;
pub mod billing;
pub mod client;
pub mod config;
pub mod de;
pub mod envelope;
pub mod error;
pub mod export;
pub mod format;
pub mod models;
pub mod pagination;
pub mod resource;
pub mod upload;

pub use backend::{Credentials, LoginSession, SellerBackend};
pub use client::ApiClient;
pub use config::ApiConfig;
pub use envelope::{Ack, Envelope, Page};
pub use error::ApiError;
pub use pagination::PageQuery;
pub use resource::{Resource, SettingsKind};
