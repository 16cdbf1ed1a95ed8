//! GCP API interaction module
//!
//! Transport for the Compute Engine REST API: authentication, an HTTP
//! wrapper, and one versioned client per API family.
//!
//! # Module Structure
//!
//! - [`auth`] - GCP authentication using Application Default Credentials
//! - [`client`] - Versioned Compute Engine client
//! - [`http`] - HTTP utilities for REST API calls
//! - [`transport`] - The trait adapters dispatch through
//!
//! # Example
//!
//! ```ignore
//! use gce_cloud::gcp::{ComputeClient, Transport};
//! use gce_cloud::Version;
//!
//! async fn example() -> gce_cloud::Result<()> {
//!     let client = ComputeClient::new(Version::Ga).await?;
//!     let zones = client.get("projects/my-project/zones").await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
pub mod transport;

pub use auth::{GcpCredentials, TokenSource};
pub use client::ComputeClient;
pub use transport::Transport;
