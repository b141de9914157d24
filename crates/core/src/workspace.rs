//! Workspace snapshot: quotas, permission grant, and cost breakdown.
//!
//! The server transmits two optional sub-objects. `userAPIKey` carries
//! the API key plus the caller's capability flags; `cost` carries the
//! per-resource quota and current-cost figures. Either may be missing
//! (e.g. a non-owner view), in which case the corresponding fields stay
//! at their defaults.

use serde::Serialize;
use serde_json::Value;

use crate::error::DecodeError;
use crate::json;
use crate::types::{EpochSecs, Key};

/// Active workspace plus the authenticated user's grant on it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkspaceDetails {
    pub workspace_key: Key,
    pub enabled: bool,
    pub name: String,
    pub max_encoding_priority: String,
    pub encoding_period: String,
    pub max_ingestions_number: i64,
    pub usage_in_mb: i64,
    pub language_code: String,
    pub timezone: String,
    pub creation_date: EpochSecs,
    pub workspace_owner_user_key: Key,
    pub workspace_owner_user_name: String,

    /// Free-form GUI payload, transmitted as JSON encoded in a string.
    pub preferences: Option<Value>,
    /// Free-form delivery-target payload, same encoding as `preferences`.
    pub external_deliveries: Option<Value>,

    // userAPIKey block
    pub api_key: String,
    pub owner: bool,
    pub default_workspace: bool,
    pub expiration_date: EpochSecs,
    pub admin: bool,
    pub create_remove_workspace: bool,
    pub ingest_workflow: bool,
    pub create_profiles: bool,
    pub delivery_authorization: bool,
    pub share_workspace: bool,
    pub edit_media: bool,
    pub edit_configuration: bool,
    pub kill_encoding: bool,
    pub cancel_ingestion_job: bool,
    pub edit_encoders_pool: bool,
    pub application_recorder: bool,

    // cost block
    pub max_storage_in_gb: i64,
    pub current_cost_for_storage: i64,
    pub dedicated_encoder_power_1: i64,
    pub current_cost_for_dedicated_encoder_power_1: i64,
    pub dedicated_encoder_power_2: i64,
    pub current_cost_for_dedicated_encoder_power_2: i64,
    pub dedicated_encoder_power_3: i64,
    pub current_cost_for_dedicated_encoder_power_3: i64,
    pub cdn_type_1: i64,
    pub current_cost_for_cdn_type_1: i64,
    pub support_type_1: bool,
    pub current_cost_for_support_type_1: i64,
}

impl WorkspaceDetails {
    const CONTEXT: &'static str = "WorkspaceDetails";

    pub fn from_json(root: &Value) -> Result<Self, DecodeError> {
        let ctx = Self::CONTEXT;

        let mut details = Self {
            workspace_key: json::i64_field(root, ctx, "workspaceKey", -1)?,
            enabled: json::bool_field(root, ctx, "enabled", false)?,
            name: json::str_field(root, ctx, "workspaceName", "")?,
            max_encoding_priority: json::str_field(root, ctx, "maxEncodingPriority", "")?,
            encoding_period: json::str_field(root, ctx, "encodingPeriod", "")?,
            max_ingestions_number: json::i64_field(root, ctx, "maxIngestionsNumber", -1)?,
            usage_in_mb: json::i64_field(root, ctx, "workSpaceUsageInMB", -1)?,
            language_code: json::str_field(root, ctx, "languageCode", "")?,
            timezone: json::str_field(root, ctx, "timezone", "")?,
            creation_date: json::timestamp_field(root, ctx, "creationDate")?,
            workspace_owner_user_key: json::i64_field(root, ctx, "workspaceOwnerUserKey", -1)?,
            workspace_owner_user_name: json::str_field(root, ctx, "workspaceOwnerUserName", "")?,
            preferences: json::embedded_json(root, ctx, "preferences")?,
            external_deliveries: json::embedded_json(root, ctx, "externalDeliveries")?,
            ..Self::default()
        };

        if let Some(grant) = json::object(root, ctx, "userAPIKey")? {
            details.api_key = json::str_field(grant, ctx, "apiKey", "")?;
            details.owner = json::bool_field(grant, ctx, "owner", false)?;
            details.default_workspace = json::bool_field(grant, ctx, "default", false)?;
            details.expiration_date = json::timestamp_field(grant, ctx, "expirationDate")?;
            details.admin = json::bool_field(grant, ctx, "admin", false)?;
            details.create_remove_workspace =
                json::bool_field(grant, ctx, "createRemoveWorkspace", false)?;
            details.ingest_workflow = json::bool_field(grant, ctx, "ingestWorkflow", false)?;
            details.create_profiles = json::bool_field(grant, ctx, "createProfiles", false)?;
            details.delivery_authorization =
                json::bool_field(grant, ctx, "deliveryAuthorization", false)?;
            details.share_workspace = json::bool_field(grant, ctx, "shareWorkspace", false)?;
            details.edit_media = json::bool_field(grant, ctx, "editMedia", false)?;
            details.edit_configuration = json::bool_field(grant, ctx, "editConfiguration", false)?;
            details.kill_encoding = json::bool_field(grant, ctx, "killEncoding", false)?;
            details.cancel_ingestion_job =
                json::bool_field(grant, ctx, "cancelIngestionJob", false)?;
            details.edit_encoders_pool = json::bool_field(grant, ctx, "editEncodersPool", false)?;
            details.application_recorder =
                json::bool_field(grant, ctx, "applicationRecorder", false)?;
        }

        if let Some(cost) = json::object(root, ctx, "cost")? {
            details.max_storage_in_gb = json::i64_field(cost, ctx, "maxStorageInGB", -1)?;
            details.current_cost_for_storage =
                json::i64_field(cost, ctx, "currentCostForStorage", -1)?;
            details.dedicated_encoder_power_1 =
                json::i64_field(cost, ctx, "dedicatedEncoder_power_1", -1)?;
            details.current_cost_for_dedicated_encoder_power_1 =
                json::i64_field(cost, ctx, "currentCostForDedicatedEncoder_power_1", -1)?;
            details.dedicated_encoder_power_2 =
                json::i64_field(cost, ctx, "dedicatedEncoder_power_2", -1)?;
            details.current_cost_for_dedicated_encoder_power_2 =
                json::i64_field(cost, ctx, "currentCostForDedicatedEncoder_power_2", -1)?;
            details.dedicated_encoder_power_3 =
                json::i64_field(cost, ctx, "dedicatedEncoder_power_3", -1)?;
            details.current_cost_for_dedicated_encoder_power_3 =
                json::i64_field(cost, ctx, "currentCostForDedicatedEncoder_power_3", -1)?;
            details.cdn_type_1 = json::i64_field(cost, ctx, "CDN_type_1", -1)?;
            details.current_cost_for_cdn_type_1 =
                json::i64_field(cost, ctx, "currentCostForCDN_type_1", -1)?;
            details.support_type_1 = json::bool_field(cost, ctx, "support_type_1", false)?;
            details.current_cost_for_support_type_1 =
                json::i64_field(cost, ctx, "currentCostForSupport_type_1", -1)?;
        }

        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn base_fields_decode() {
        let doc = json!({
            "workspaceKey": 9,
            "enabled": true,
            "workspaceName": "prod",
            "maxEncodingPriority": "High",
            "encodingPeriod": "Daily",
            "maxIngestionsNumber": 200,
            "workSpaceUsageInMB": 1536,
            "languageCode": "en",
            "timezone": "UTC",
            "creationDate": "2024-05-01T12:00:00Z",
        });
        let details = WorkspaceDetails::from_json(&doc).unwrap();
        assert_eq!(details.workspace_key, 9);
        assert!(details.enabled);
        assert_eq!(details.name, "prod");
        assert_eq!(details.max_ingestions_number, 200);
        assert_eq!(details.usage_in_mb, 1536);
        assert_eq!(details.creation_date, 1_714_564_800);
        // No grant block: capability flags stay at defaults.
        assert!(!details.admin);
        assert!(details.api_key.is_empty());
        // No cost block: quota figures stay at defaults.
        assert_eq!(details.max_storage_in_gb, -1);
    }

    #[test]
    fn grant_block_populates_capabilities() {
        let doc = json!({
            "workspaceKey": 9,
            "userAPIKey": {
                "apiKey": "k-123",
                "owner": true,
                "default": true,
                "admin": true,
                "editMedia": true,
                "killEncoding": false,
            },
        });
        let details = WorkspaceDetails::from_json(&doc).unwrap();
        assert_eq!(details.api_key, "k-123");
        assert!(details.owner);
        assert!(details.default_workspace);
        assert!(details.admin);
        assert!(details.edit_media);
        assert!(!details.kill_encoding);
        assert!(!details.ingest_workflow);
    }

    #[test]
    fn cost_block_populates_quota_figures() {
        let doc = json!({
            "cost": {
                "maxStorageInGB": 500,
                "currentCostForStorage": 25,
                "dedicatedEncoder_power_2": 1,
                "CDN_type_1": 3,
                "support_type_1": true,
            },
        });
        let details = WorkspaceDetails::from_json(&doc).unwrap();
        assert_eq!(details.max_storage_in_gb, 500);
        assert_eq!(details.current_cost_for_storage, 25);
        assert_eq!(details.dedicated_encoder_power_2, 1);
        assert_eq!(details.dedicated_encoder_power_1, -1);
        assert_eq!(details.cdn_type_1, 3);
        assert!(details.support_type_1);
    }

    #[test]
    fn preferences_valid_payload_parses() {
        let doc = json!({"preferences": "{\"a\":1}"});
        let details = WorkspaceDetails::from_json(&doc).unwrap();
        assert_eq!(details.preferences.unwrap(), json!({"a": 1}));
    }

    #[test]
    fn preferences_malformed_payload_is_left_unset() {
        let doc = json!({"preferences": "{not json"});
        let details = WorkspaceDetails::from_json(&doc).unwrap();
        assert!(details.preferences.is_none());
    }

    #[test]
    fn external_deliveries_follow_the_same_rule() {
        let doc = json!({"externalDeliveries": "[{\"target\":\"cdn\"}]"});
        let details = WorkspaceDetails::from_json(&doc).unwrap();
        assert_eq!(details.external_deliveries.unwrap(), json!([{"target": "cdn"}]));
    }

    #[test]
    fn grant_block_with_wrong_type_is_an_error() {
        let doc = json!({"userAPIKey": {"admin": "yes"}});
        assert_matches!(
            WorkspaceDetails::from_json(&doc),
            Err(DecodeError::WrongType { field, .. }) if field == "admin"
        );
    }
}
