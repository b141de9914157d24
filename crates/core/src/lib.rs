//! Domain model and JSON decoding layer for the MMS media-management API.
//!
//! Provides the typed value snapshots returned by the server (user
//! profile, workspace details, encoding profiles, encoder pools, channel
//! configurations) together with the field-extraction helpers that apply
//! the protocol's defaulting rules: a missing field is never an error,
//! a present field of the wrong JSON type always is.

pub mod channel;
pub mod encoder;
pub mod error;
pub mod formats;
pub mod ingestion;
pub mod json;
pub mod profile;
pub mod types;
pub mod user;
pub mod workspace;
