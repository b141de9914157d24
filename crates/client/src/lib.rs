//! Client for the MMS media-management REST API.
//!
//! Provides the authenticated session client ([`session::MmsClient`]),
//! its environment-driven configuration, the HTTP transport seam used to
//! drive it (with a `reqwest`-backed implementation and a mockable
//! trait), and chunked binary upload for ingestion jobs.

pub mod config;
pub mod error;
pub mod session;
pub mod transport;
pub mod upload;
