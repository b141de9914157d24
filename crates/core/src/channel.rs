//! Delivery-channel configurations, one struct per CDN/protocol variant.
//!
//! All variants share the key/label/type/reservation fields; the
//! protocol-specific URL and credential fields differ. A channel with
//! `reserved_by_ingestion_job_key != -1` is currently held by that
//! ingestion job.

use serde::Serialize;
use serde_json::Value;

use crate::error::DecodeError;
use crate::json;
use crate::types::Key;

/// RTMP push-delivery channel.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RtmpChannelConf {
    pub conf_key: Key,
    pub label: String,
    pub rtmp_url: String,
    pub stream_name: String,
    pub user_name: String,
    pub password: String,
    /// Play-side URL payload; shape varies per CDN, kept verbatim.
    pub play_url_details: Value,
    pub channel_type: String,
    pub output_index: i64,
    pub reserved_by_ingestion_job_key: Key,
    pub configuration_label: String,
}

impl RtmpChannelConf {
    const CONTEXT: &'static str = "RtmpChannelConf";

    pub fn from_json(root: &Value) -> Result<Self, DecodeError> {
        let ctx = Self::CONTEXT;
        Ok(Self {
            conf_key: json::i64_field(root, ctx, "confKey", -1)?,
            label: json::str_field(root, ctx, "label", "")?,
            rtmp_url: json::str_field(root, ctx, "rtmpURL", "")?,
            stream_name: json::str_field(root, ctx, "streamName", "")?,
            user_name: json::str_field(root, ctx, "userName", "")?,
            password: json::str_field(root, ctx, "password", "")?,
            play_url_details: root.get("playURLDetails").cloned().unwrap_or(Value::Null),
            channel_type: json::str_field(root, ctx, "type", "")?,
            output_index: json::i64_field(root, ctx, "outputIndex", -1)?,
            reserved_by_ingestion_job_key: json::i64_field(
                root,
                ctx,
                "reservedByIngestionJobKey",
                -1,
            )?,
            configuration_label: json::str_field(root, ctx, "configurationLabel", "")?,
        })
    }
}

/// SRT delivery channel.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SrtChannelConf {
    pub conf_key: Key,
    pub label: String,
    pub srt_url: String,
    /// SRT connection mode; the server defaults this to `caller`.
    pub mode: String,
    pub stream_id: String,
    pub passphrase: String,
    pub play_url: String,
    pub channel_type: String,
    pub output_index: i64,
    pub reserved_by_ingestion_job_key: Key,
    pub configuration_label: String,
}

impl SrtChannelConf {
    const CONTEXT: &'static str = "SrtChannelConf";

    pub fn from_json(root: &Value) -> Result<Self, DecodeError> {
        let ctx = Self::CONTEXT;
        Ok(Self {
            conf_key: json::i64_field(root, ctx, "confKey", -1)?,
            label: json::str_field(root, ctx, "label", "")?,
            srt_url: json::str_field(root, ctx, "srtURL", "")?,
            mode: json::str_field(root, ctx, "mode", "caller")?,
            stream_id: json::str_field(root, ctx, "streamId", "")?,
            passphrase: json::str_field(root, ctx, "passphrase", "")?,
            play_url: json::str_field(root, ctx, "playURL", "")?,
            channel_type: json::str_field(root, ctx, "type", "")?,
            output_index: json::i64_field(root, ctx, "outputIndex", -1)?,
            reserved_by_ingestion_job_key: json::i64_field(
                root,
                ctx,
                "reservedByIngestionJobKey",
                -1,
            )?,
            configuration_label: json::str_field(root, ctx, "configurationLabel", "")?,
        })
    }
}

/// AWS MediaLive delivery channel.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AwsChannelConf {
    pub conf_key: Key,
    pub label: String,
    pub channel_id: String,
    pub rtmp_url: String,
    pub play_url: String,
    pub channel_type: String,
    pub output_index: i64,
    pub reserved_by_ingestion_job_key: Key,
    pub configuration_label: String,
}

impl AwsChannelConf {
    const CONTEXT: &'static str = "AwsChannelConf";

    pub fn from_json(root: &Value) -> Result<Self, DecodeError> {
        let ctx = Self::CONTEXT;
        Ok(Self {
            conf_key: json::i64_field(root, ctx, "confKey", -1)?,
            label: json::str_field(root, ctx, "label", "")?,
            channel_id: json::str_field(root, ctx, "channelId", "")?,
            rtmp_url: json::str_field(root, ctx, "rtmpURL", "")?,
            play_url: json::str_field(root, ctx, "playURL", "")?,
            channel_type: json::str_field(root, ctx, "type", "")?,
            output_index: json::i64_field(root, ctx, "outputIndex", -1)?,
            reserved_by_ingestion_job_key: json::i64_field(
                root,
                ctx,
                "reservedByIngestionJobKey",
                -1,
            )?,
            configuration_label: json::str_field(root, ctx, "configurationLabel", "")?,
        })
    }
}

/// CDN77 delivery channel.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Cdn77ChannelConf {
    pub conf_key: Key,
    pub label: String,
    pub rtmp_url: String,
    pub resource_url: String,
    pub file_path: String,
    pub secure_token: String,
    pub channel_type: String,
    pub output_index: i64,
    pub reserved_by_ingestion_job_key: Key,
    pub configuration_label: String,
}

impl Cdn77ChannelConf {
    const CONTEXT: &'static str = "Cdn77ChannelConf";

    pub fn from_json(root: &Value) -> Result<Self, DecodeError> {
        let ctx = Self::CONTEXT;
        Ok(Self {
            conf_key: json::i64_field(root, ctx, "confKey", -1)?,
            label: json::str_field(root, ctx, "label", "")?,
            rtmp_url: json::str_field(root, ctx, "rtmpURL", "")?,
            resource_url: json::str_field(root, ctx, "resourceURL", "")?,
            file_path: json::str_field(root, ctx, "filePath", "")?,
            secure_token: json::str_field(root, ctx, "secureToken", "")?,
            channel_type: json::str_field(root, ctx, "type", "")?,
            output_index: json::i64_field(root, ctx, "outputIndex", -1)?,
            reserved_by_ingestion_job_key: json::i64_field(
                root,
                ctx,
                "reservedByIngestionJobKey",
                -1,
            )?,
            configuration_label: json::str_field(root, ctx, "configurationLabel", "")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn rtmp_conf_decodes() {
        let doc = json!({
            "confKey": 21,
            "label": "primary",
            "rtmpURL": "rtmp://ingest.example.com/live",
            "streamName": "stream-1",
            "userName": "push",
            "password": "secret",
            "playURLDetails": {"hls": "https://cdn.example.com/live.m3u8"},
            "type": "SHARED",
            "outputIndex": 0,
            "reservedByIngestionJobKey": 900,
            "configurationLabel": "primary-0",
        });
        let conf = RtmpChannelConf::from_json(&doc).unwrap();
        assert_eq!(conf.conf_key, 21);
        assert_eq!(conf.rtmp_url, "rtmp://ingest.example.com/live");
        assert_eq!(conf.channel_type, "SHARED");
        assert_eq!(conf.output_index, 0);
        assert_eq!(conf.reserved_by_ingestion_job_key, 900);
        assert_eq!(
            conf.play_url_details,
            json!({"hls": "https://cdn.example.com/live.m3u8"})
        );
    }

    #[test]
    fn rtmp_conf_empty_decodes_to_defaults() {
        let conf = RtmpChannelConf::from_json(&json!({})).unwrap();
        assert_eq!(conf.conf_key, -1);
        assert_eq!(conf.output_index, -1);
        assert_eq!(conf.reserved_by_ingestion_job_key, -1);
        assert!(conf.play_url_details.is_null());
    }

    #[test]
    fn srt_mode_defaults_to_caller() {
        let conf = SrtChannelConf::from_json(&json!({"confKey": 1})).unwrap();
        assert_eq!(conf.mode, "caller");

        let conf =
            SrtChannelConf::from_json(&json!({"confKey": 1, "mode": "listener"})).unwrap();
        assert_eq!(conf.mode, "listener");
    }

    #[test]
    fn aws_conf_decodes() {
        let doc = json!({
            "confKey": 7,
            "channelId": "ml-123",
            "rtmpURL": "rtmp://medialive.example.com/in",
            "playURL": "https://play.example.com/out.m3u8",
        });
        let conf = AwsChannelConf::from_json(&doc).unwrap();
        assert_eq!(conf.channel_id, "ml-123");
        assert_eq!(conf.play_url, "https://play.example.com/out.m3u8");
    }

    #[test]
    fn cdn77_conf_decodes() {
        let doc = json!({
            "confKey": 8,
            "resourceURL": "https://123.rsc.cdn77.org",
            "filePath": "/live/stream",
            "secureToken": "tok",
        });
        let conf = Cdn77ChannelConf::from_json(&doc).unwrap();
        assert_eq!(conf.resource_url, "https://123.rsc.cdn77.org");
        assert_eq!(conf.secure_token, "tok");
    }

    #[test]
    fn reservation_key_wrong_type_is_an_error() {
        let doc = json!({"reservedByIngestionJobKey": "job-900"});
        assert_matches!(
            SrtChannelConf::from_json(&doc),
            Err(DecodeError::WrongType { field, .. }) if field == "reservedByIngestionJobKey"
        );
    }
}
