//! Encoder pools: the groups of encoding workers a workspace can use.

use serde::Serialize;
use serde_json::Value;

use crate::error::DecodeError;
use crate::json;
use crate::types::Key;

/// One encoding worker inside a pool.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Encoder {
    pub encoder_key: Key,
    pub label: String,
    pub external: bool,
    pub enabled: bool,
    pub protocol: String,
    pub public_server_name: String,
    pub internal_server_name: String,
    pub port: i32,
    pub running: bool,
    pub cpu_usage: i32,
    /// Raw association payload (workspace grants on this encoder).
    pub workspaces_associated: Value,
}

impl Encoder {
    const CONTEXT: &'static str = "Encoder";

    pub fn from_json(root: &Value) -> Result<Self, DecodeError> {
        let ctx = Self::CONTEXT;
        Ok(Self {
            encoder_key: json::i64_field(root, ctx, "encoderKey", -1)?,
            label: json::str_field(root, ctx, "label", "")?,
            external: json::bool_field(root, ctx, "external", false)?,
            enabled: json::bool_field(root, ctx, "enabled", false)?,
            protocol: json::str_field(root, ctx, "protocol", "")?,
            public_server_name: json::str_field(root, ctx, "publicServerName", "")?,
            internal_server_name: json::str_field(root, ctx, "internalServerName", "")?,
            port: json::i32_field(root, ctx, "port", -1)?,
            running: json::bool_field(root, ctx, "running", false)?,
            cpu_usage: json::i32_field(root, ctx, "cpuUsage", -1)?,
            workspaces_associated: root
                .get("workspacesAssociated")
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new())),
        })
    }
}

/// Named pool of encoders.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EncodersPool {
    pub encoders_pool_key: Key,
    pub label: String,
    pub encoders: Vec<Encoder>,
}

impl EncodersPool {
    const CONTEXT: &'static str = "EncodersPool";

    pub fn from_json(root: &Value) -> Result<Self, DecodeError> {
        let ctx = Self::CONTEXT;

        let mut pool = Self {
            encoders_pool_key: json::i64_field(root, ctx, "encodersPoolKey", -1)?,
            label: json::str_field(root, ctx, "label", "")?,
            encoders: Vec::new(),
        };
        for entry in json::array(root, ctx, "encoders")? {
            pool.encoders.push(Encoder::from_json(entry)?);
        }

        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn pool_with_encoders_decodes_in_order() {
        let doc = json!({
            "encodersPoolKey": 5,
            "label": "gpu-pool",
            "encoders": [
                {"encoderKey": 1, "label": "enc-a", "enabled": true, "running": true,
                 "publicServerName": "enc-a.example.com", "port": 8086, "cpuUsage": 40,
                 "workspacesAssociated": [{"workspaceKey": 9}]},
                {"encoderKey": 2, "label": "enc-b"},
            ],
        });
        let pool = EncodersPool::from_json(&doc).unwrap();
        assert_eq!(pool.encoders_pool_key, 5);
        assert_eq!(pool.label, "gpu-pool");
        assert_eq!(pool.encoders.len(), 2);

        let first = &pool.encoders[0];
        assert_eq!(first.encoder_key, 1);
        assert!(first.enabled);
        assert!(first.running);
        assert_eq!(first.port, 8086);
        assert_eq!(first.cpu_usage, 40);
        assert_eq!(first.workspaces_associated, json!([{"workspaceKey": 9}]));

        let second = &pool.encoders[1];
        assert_eq!(second.encoder_key, 2);
        assert!(!second.enabled);
        assert_eq!(second.port, -1);
        assert_eq!(second.workspaces_associated, json!([]));
    }

    #[test]
    fn pool_without_encoders_is_empty() {
        let pool = EncodersPool::from_json(&json!({"label": "empty"})).unwrap();
        assert!(pool.encoders.is_empty());
        assert_eq!(pool.encoders_pool_key, -1);
    }

    #[test]
    fn encoder_wrong_type_is_an_error() {
        let doc = json!({"encoders": [{"enabled": "yes"}]});
        assert_matches!(
            EncodersPool::from_json(&doc),
            Err(DecodeError::WrongType { field, .. }) if field == "enabled"
        );
    }
}
