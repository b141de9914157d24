//! Results returned by workflow ingestion.

use serde::Serialize;
use serde_json::Value;

use crate::error::DecodeError;
use crate::json;
use crate::types::Key;

/// Reference to a created workflow root or ingestion task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestionResult {
    pub key: Key,
    pub label: String,
}

/// Decode a workflow-submission response into the workflow root result
/// and one result per created task, in server order.
pub fn decode_workflow_response(
    root: &Value,
) -> Result<(IngestionResult, Vec<IngestionResult>), DecodeError> {
    let ctx = "IngestionResult";

    let workflow = match json::object(root, ctx, "workflow")? {
        Some(w) => w.clone(),
        None => Value::Null,
    };
    let workflow_result = IngestionResult {
        key: json::i64_field(&workflow, ctx, "ingestionRootKey", -1)?,
        label: json::str_field(&workflow, ctx, "label", "")?,
    };

    let mut tasks = Vec::new();
    for entry in json::array(root, ctx, "tasks")? {
        tasks.push(IngestionResult {
            key: json::i64_field(entry, ctx, "ingestionJobKey", -1)?,
            label: json::str_field(entry, ctx, "label", "")?,
        });
    }

    Ok((workflow_result, tasks))
}
