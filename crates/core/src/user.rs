//! Authenticated-user snapshot returned by the login endpoint.

use serde::Serialize;
use serde_json::Value;

use crate::error::DecodeError;
use crate::json;
use crate::types::{EpochSecs, Key};

/// Profile of the authenticated user, created once per successful login.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserProfile {
    pub user_key: Key,
    pub ldap_enabled: bool,
    pub name: String,
    pub email: String,
    pub country: String,
    pub timezone: String,
    pub creation_date: EpochSecs,
    pub expiration_date: EpochSecs,
    pub insolvent: bool,
    /// Session-local; never part of the server payload. Injected by the
    /// client after a successful login.
    pub password: String,
}

impl UserProfile {
    const CONTEXT: &'static str = "UserProfile";

    pub fn from_json(root: &Value) -> Result<Self, DecodeError> {
        let ctx = Self::CONTEXT;
        Ok(Self {
            user_key: json::i64_field(root, ctx, "userKey", -1)?,
            ldap_enabled: json::bool_field(root, ctx, "ldapEnabled", false)?,
            name: json::str_field(root, ctx, "name", "")?,
            email: json::str_field(root, ctx, "email", "")?,
            country: json::str_field(root, ctx, "country", "")?,
            timezone: json::str_field(root, ctx, "timezone", "")?,
            creation_date: json::timestamp_field(root, ctx, "creationDate")?,
            expiration_date: json::timestamp_field(root, ctx, "expirationDate")?,
            insolvent: json::bool_field(root, ctx, "insolvent", false)?,
            password: String::new(),
        })
    }
}
