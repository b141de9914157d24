//! Authenticated session client for the MMS REST API.
//!
//! [`MmsClient`] starts unauthenticated; a successful
//! [`MmsClient::login`] stores the user profile, the primary workspace,
//! and the credentials used for every subsequent call (user key as
//! basic-auth user, workspace API key as password). Every other
//! operation fails with [`ClientError::NotLoggedIn`] before touching the
//! network if no login has succeeded.

use std::path::Path;

use serde_json::Value;

use mms_core::channel::{AwsChannelConf, Cdn77ChannelConf, RtmpChannelConf, SrtChannelConf};
use mms_core::encoder::EncodersPool;
use mms_core::ingestion::{decode_workflow_response, IngestionResult};
use mms_core::json;
use mms_core::profile::{ContentType, EncodingProfile, EncodingProfilesSet};
use mms_core::types::Key;
use mms_core::user::UserProfile;
use mms_core::workspace::WorkspaceDetails;

use crate::config::{MmsConfig, API_BASE_PATH};
use crate::error::ClientError;
use crate::transport::{HttpTransport, ProgressFn, RequestOpts, Transport};

/// Public IP echo service used when the caller does not supply its own
/// address at login.
const IP_ECHO_URL: &str = "https://api.ipify.org?format=json";

/// Request header asking the server to compress the response body.
const COMPRESSED_RESPONSE_HEADER: &str = "X-ResponseBodyCompressed";

/// State recorded by a successful login.
#[derive(Debug, Clone)]
struct Session {
    user: UserProfile,
    workspace: WorkspaceDetails,
    version: String,
}

/// Client for one logical MMS session.
///
/// Holds mutable session state; callers needing concurrent requests
/// should use one instance per session.
pub struct MmsClient {
    config: MmsConfig,
    transport: Box<dyn Transport>,
    session: Option<Session>,
}

impl MmsClient {
    /// Create a client backed by the production HTTP transport.
    pub fn new(config: MmsConfig) -> Self {
        Self::with_transport(config, Box::new(HttpTransport::new()))
    }

    /// Create a client with a caller-supplied transport (used by tests).
    pub fn with_transport(config: MmsConfig, transport: Box<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            session: None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// Profile of the authenticated user, if logged in.
    pub fn user_profile(&self) -> Option<&UserProfile> {
        self.session.as_ref().map(|s| &s.user)
    }

    /// Active workspace of the authenticated user, if logged in.
    pub fn workspace(&self) -> Option<&WorkspaceDetails> {
        self.session.as_ref().map(|s| &s.workspace)
    }

    /// Server version string reported at login.
    pub fn server_version(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.version.as_str())
    }

    // -----------------------------------------------------------------
    // Login
    // -----------------------------------------------------------------

    /// Authenticate and load the user's primary workspace.
    ///
    /// When `client_ip` is not supplied, a best-effort lookup against a
    /// public IP echo service fills it in; that lookup never fails the
    /// login. The response must carry a `workspace` object; a user
    /// without one cannot use any other operation.
    pub async fn login(
        &mut self,
        user_name: &str,
        password: &str,
        client_ip: Option<&str>,
    ) -> Result<(), ClientError> {
        let result = self.login_inner(user_name, password, client_ip).await;
        log_failure("login", result)
    }

    async fn login_inner(
        &mut self,
        user_name: &str,
        password: &str,
        client_ip: Option<&str>,
    ) -> Result<(), ClientError> {
        self.session = None;

        let client_ip = match client_ip {
            Some(ip) => ip.to_string(),
            None => self.lookup_client_ip().await,
        };

        let mut body = serde_json::json!({
            "email": user_name,
            "password": password,
        });
        if !client_ip.is_empty() {
            body["remoteClientIPAddress"] = Value::String(client_ip);
        }

        let url = format!("{}{}/login", self.config.api_base(), API_BASE_PATH);
        tracing::info!(url = %url, user_name, "Logging in");

        let opts = RequestOpts::new(self.config.api_timeout_secs)
            .with_basic_auth(user_name, password)
            .with_max_retries(self.config.api_max_retries);
        let root = self
            .transport
            .post_json(&url, &opts, body.to_string())
            .await?;

        let mut user = UserProfile::from_json(&root)?;
        user.password = password.to_string();

        let workspace_root = json::required_object(&root, "LoginResponse", "workspace")?;
        let workspace = WorkspaceDetails::from_json(workspace_root)?;
        let version = json::str_field(&root, "LoginResponse", "mmsVersion", "")?;

        tracing::info!(
            user_key = user.user_key,
            workspace_key = workspace.workspace_key,
            "Login succeeded",
        );
        self.session = Some(Session {
            user,
            workspace,
            version,
        });
        Ok(())
    }

    /// Best-effort lookup of this client's public IP address. Any
    /// failure is logged and yields an empty address.
    async fn lookup_client_ip(&self) -> String {
        let opts = RequestOpts::new(self.config.api_timeout_secs);
        match self.transport.get_json(IP_ECHO_URL, &opts).await {
            Ok(root) => match json::str_field(&root, "IpEcho", "ip", "") {
                Ok(ip) => ip,
                Err(e) => {
                    tracing::warn!(error = %e, "IP echo response malformed, proceeding without client IP");
                    String::new()
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Client IP lookup failed, proceeding without client IP");
                String::new()
            }
        }
    }

    // -----------------------------------------------------------------
    // Read operations
    // -----------------------------------------------------------------

    /// Fetch encoding profiles of one content type, optionally narrowed
    /// to a single profile key or a label filter. Profiles come back
    /// shallow: their detail variants stay unspecified.
    pub async fn get_encoding_profiles(
        &self,
        content_type: ContentType,
        profile_key: Option<Key>,
        label: Option<&str>,
        cache_allowed: bool,
    ) -> Result<Vec<EncodingProfile>, ClientError> {
        let result = self
            .get_encoding_profiles_inner(content_type, profile_key, label, cache_allowed)
            .await;
        log_failure("getEncodingProfiles", result)
    }

    async fn get_encoding_profiles_inner(
        &self,
        content_type: ContentType,
        profile_key: Option<Key>,
        label: Option<&str>,
        cache_allowed: bool,
    ) -> Result<Vec<EncodingProfile>, ClientError> {
        let session = self.session("getEncodingProfiles")?;

        let mut path = format!("/encodingProfiles/{}", content_type.as_str());
        if let Some(key) = profile_key {
            path.push_str(&format!("/{key}"));
        }
        let mut pairs = Vec::new();
        push_label(&mut pairs, label);
        push_cache(&mut pairs, cache_allowed);

        let root = self.api_get(session, &path, &pairs).await?;
        let response = json::required_object(&root, "ApiResponse", "response")?;

        let mut profiles = Vec::new();
        for entry in json::array(response, "ApiResponse", "encodingProfiles")? {
            profiles.push(EncodingProfile::from_json(entry, false)?);
        }
        Ok(profiles)
    }

    /// Fetch encoding-profile sets of one content type, each with its
    /// profile list fully (deeply) decoded.
    pub async fn get_encoding_profiles_sets(
        &self,
        content_type: ContentType,
        cache_allowed: bool,
    ) -> Result<Vec<EncodingProfilesSet>, ClientError> {
        let result = self
            .get_encoding_profiles_sets_inner(content_type, cache_allowed)
            .await;
        log_failure("getEncodingProfilesSets", result)
    }

    async fn get_encoding_profiles_sets_inner(
        &self,
        content_type: ContentType,
        cache_allowed: bool,
    ) -> Result<Vec<EncodingProfilesSet>, ClientError> {
        let session = self.session("getEncodingProfilesSets")?;

        let path = format!("/encodingProfilesSets/{}", content_type.as_str());
        let mut pairs = Vec::new();
        push_cache(&mut pairs, cache_allowed);

        let root = self.api_get(session, &path, &pairs).await?;
        let response = json::required_object(&root, "ApiResponse", "response")?;

        let mut sets = Vec::new();
        for entry in json::array(response, "ApiResponse", "encodingProfilesSets")? {
            sets.push(EncodingProfilesSet::from_json(entry, true)?);
        }
        Ok(sets)
    }

    /// Fetch the encoder pools visible to the workspace, label-ordered.
    pub async fn get_encoders_pool(
        &self,
        cache_allowed: bool,
    ) -> Result<Vec<EncodersPool>, ClientError> {
        let result = self.get_encoders_pool_inner(cache_allowed).await;
        log_failure("getEncodersPool", result)
    }

    async fn get_encoders_pool_inner(
        &self,
        cache_allowed: bool,
    ) -> Result<Vec<EncodersPool>, ClientError> {
        let session = self.session("getEncodersPool")?;

        let mut pairs = vec![("labelOrder".to_string(), "asc".to_string())];
        push_cache(&mut pairs, cache_allowed);

        let root = self.api_get(session, "/encodersPool", &pairs).await?;
        let response = json::required_object(&root, "ApiResponse", "response")?;

        let mut pools = Vec::new();
        for entry in json::array(response, "ApiResponse", "encodersPool")? {
            pools.push(EncodersPool::from_json(entry)?);
        }
        Ok(pools)
    }

    /// Fetch RTMP delivery-channel configurations.
    pub async fn get_rtmp_channel_conf(
        &self,
        label: Option<&str>,
        label_like: bool,
        channel_type: Option<&str>,
        cache_allowed: bool,
    ) -> Result<Vec<RtmpChannelConf>, ClientError> {
        let result = self
            .channel_conf_docs(
                "getRTMPChannelConf",
                "rtmp",
                "rtmpChannelConf",
                label,
                label_like,
                channel_type,
                cache_allowed,
            )
            .await
            .and_then(|docs| {
                docs.iter()
                    .map(|doc| RtmpChannelConf::from_json(doc).map_err(ClientError::from))
                    .collect()
            });
        log_failure("getRTMPChannelConf", result)
    }

    /// Fetch SRT delivery-channel configurations.
    pub async fn get_srt_channel_conf(
        &self,
        label: Option<&str>,
        label_like: bool,
        channel_type: Option<&str>,
        cache_allowed: bool,
    ) -> Result<Vec<SrtChannelConf>, ClientError> {
        let result = self
            .channel_conf_docs(
                "getSRTChannelConf",
                "srt",
                "srtChannelConf",
                label,
                label_like,
                channel_type,
                cache_allowed,
            )
            .await
            .and_then(|docs| {
                docs.iter()
                    .map(|doc| SrtChannelConf::from_json(doc).map_err(ClientError::from))
                    .collect()
            });
        log_failure("getSRTChannelConf", result)
    }

    /// Fetch AWS delivery-channel configurations.
    pub async fn get_aws_channel_conf(
        &self,
        label: Option<&str>,
        label_like: bool,
        channel_type: Option<&str>,
        cache_allowed: bool,
    ) -> Result<Vec<AwsChannelConf>, ClientError> {
        let result = self
            .channel_conf_docs(
                "getAWSChannelConf",
                "aws",
                "awsChannelConf",
                label,
                label_like,
                channel_type,
                cache_allowed,
            )
            .await
            .and_then(|docs| {
                docs.iter()
                    .map(|doc| AwsChannelConf::from_json(doc).map_err(ClientError::from))
                    .collect()
            });
        log_failure("getAWSChannelConf", result)
    }

    /// Fetch CDN77 delivery-channel configurations.
    pub async fn get_cdn77_channel_conf(
        &self,
        label: Option<&str>,
        label_like: bool,
        channel_type: Option<&str>,
        cache_allowed: bool,
    ) -> Result<Vec<Cdn77ChannelConf>, ClientError> {
        let result = self
            .channel_conf_docs(
                "getCDN77ChannelConf",
                "cdn77",
                "cdn77ChannelConf",
                label,
                label_like,
                channel_type,
                cache_allowed,
            )
            .await
            .and_then(|docs| {
                docs.iter()
                    .map(|doc| Cdn77ChannelConf::from_json(doc).map_err(ClientError::from))
                    .collect()
            });
        log_failure("getCDN77ChannelConf", result)
    }

    /// Shared fetch for the four channel-configuration endpoints.
    async fn channel_conf_docs(
        &self,
        operation: &'static str,
        kind: &str,
        array_key: &str,
        label: Option<&str>,
        label_like: bool,
        channel_type: Option<&str>,
        cache_allowed: bool,
    ) -> Result<Vec<Value>, ClientError> {
        let session = self.session(operation)?;

        let path = format!("/conf/cdn/{kind}/channel");
        let mut pairs = Vec::new();
        push_label(&mut pairs, label);
        pairs.push(("labelLike".to_string(), label_like.to_string()));
        if let Some(channel_type) = channel_type.filter(|t| !t.is_empty()) {
            pairs.push((
                "type".to_string(),
                urlencoding::encode(channel_type).into_owned(),
            ));
        }
        push_cache(&mut pairs, cache_allowed);

        let root = self.api_get(session, &path, &pairs).await?;
        let response = json::required_object(&root, "ApiResponse", "response")?;
        Ok(json::array(response, "ApiResponse", array_key)?.to_vec())
    }

    // -----------------------------------------------------------------
    // Ingestion
    // -----------------------------------------------------------------

    /// Submit a caller-supplied workflow document. Returns the created
    /// workflow root and one result per created task.
    pub async fn ingestion_workflow(
        &self,
        workflow: &Value,
    ) -> Result<(IngestionResult, Vec<IngestionResult>), ClientError> {
        let result = self.ingestion_workflow_inner(workflow).await;
        log_failure("ingestionWorkflow", result)
    }

    async fn ingestion_workflow_inner(
        &self,
        workflow: &Value,
    ) -> Result<(IngestionResult, Vec<IngestionResult>), ClientError> {
        let session = self.session("ingestionWorkflow")?;

        let url = format!("{}{}/workflow", self.config.api_base(), API_BASE_PATH);
        tracing::info!(url = %url, "Submitting ingestion workflow");

        let opts = self.api_opts(session, false);
        let body =
            serde_json::to_string(workflow).expect("workflow JSON is always serialisable");
        let root = self.transport.post_json(&url, &opts, body).await?;

        Ok(decode_workflow_response(&root)?)
    }

    /// Upload the content file for an ingestion job in chunks,
    /// reporting `(bytes_sent, total_bytes)` after each chunk. The
    /// callback returning `false` aborts the upload with
    /// [`ClientError::Cancelled`].
    pub async fn ingestion_binary(
        &self,
        ingestion_job_key: Key,
        path: &Path,
        on_chunk: ProgressFn<'_>,
    ) -> Result<(), ClientError> {
        let result = self
            .ingestion_binary_inner(ingestion_job_key, path, on_chunk)
            .await;
        log_failure("ingestionBinary", result)
    }

    async fn ingestion_binary_inner(
        &self,
        ingestion_job_key: Key,
        path: &Path,
        on_chunk: ProgressFn<'_>,
    ) -> Result<(), ClientError> {
        let session = self.session("ingestionBinary")?;

        let url = format!(
            "{}{}/binary/{}",
            self.config.binary_base(),
            API_BASE_PATH,
            ingestion_job_key
        );
        tracing::info!(url = %url, path = %path.display(), "Uploading ingestion binary");

        let opts = RequestOpts::new(self.config.binary_timeout_secs)
            .with_basic_auth(
                session.user.user_key.to_string(),
                session.workspace.api_key.clone(),
            )
            .with_max_retries(self.config.binary_max_retries);
        self.transport
            .post_file_chunked(
                &url,
                &opts,
                path,
                self.config.upload_chunk_size_bytes,
                on_chunk,
            )
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    fn session(&self, operation: &'static str) -> Result<&Session, ClientError> {
        self.session
            .as_ref()
            .ok_or(ClientError::NotLoggedIn { operation })
    }

    /// Per-call options for API endpoints: workspace credentials plus,
    /// for reads, the compressed-response request header.
    fn api_opts(&self, session: &Session, compressed: bool) -> RequestOpts {
        let mut opts = RequestOpts::new(self.config.api_timeout_secs)
            .with_basic_auth(
                session.user.user_key.to_string(),
                session.workspace.api_key.clone(),
            )
            .with_max_retries(self.config.api_max_retries);
        if compressed {
            opts = opts.with_header(COMPRESSED_RESPONSE_HEADER, "true");
        }
        opts
    }

    async fn api_get(
        &self,
        session: &Session,
        path: &str,
        pairs: &[(String, String)],
    ) -> Result<Value, ClientError> {
        let url = format!(
            "{}{}{}{}",
            self.config.api_base(),
            API_BASE_PATH,
            path,
            query_string(pairs)
        );
        tracing::info!(url = %url, "GET");

        let opts = self.api_opts(session, self.config.compress_responses);
        Ok(self.transport.get_json(&url, &opts).await?)
    }
}

/// Assemble a query string from pre-escaped pairs.
fn query_string(pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return String::new();
    }
    let joined = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("?{joined}")
}

fn push_label(pairs: &mut Vec<(String, String)>, label: Option<&str>) {
    if let Some(label) = label.filter(|l| !l.is_empty()) {
        pairs.push(("label".to_string(), urlencoding::encode(label).into_owned()));
    }
}

fn push_cache(pairs: &mut Vec<(String, String)>, cache_allowed: bool) {
    pairs.push((
        "should_bypass_cache".to_string(),
        cache_allowed.to_string(),
    ));
}

/// Log a failed operation with its name before handing the error back
/// unchanged.
fn log_failure<T>(
    operation: &'static str,
    result: Result<T, ClientError>,
) -> Result<T, ClientError> {
    if let Err(e) = &result {
        tracing::error!(operation, error = %e, "MMS operation failed");
    }
    result
}
