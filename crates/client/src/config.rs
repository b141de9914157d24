//! Client configuration loaded from environment variables.

/// Fixed versioned path segment under which every API endpoint lives.
pub const API_BASE_PATH: &str = "/catramms/1.0.1";

/// Connection and per-call settings for the API and binary endpoints.
///
/// All fields have defaults suitable for talking to a local deployment.
/// Override via environment variables in production.
#[derive(Debug, Clone)]
pub struct MmsConfig {
    /// API endpoint scheme (default: `https`).
    pub api_protocol: String,
    /// API endpoint host (default: `localhost`).
    pub api_hostname: String,
    /// API endpoint port (default: `443`).
    pub api_port: u16,
    /// Per-call API timeout in seconds (default: `15`).
    pub api_timeout_secs: u64,
    /// Additional attempts after a failed API call (default: `1`).
    pub api_max_retries: u32,
    /// Binary-upload endpoint scheme (default: `https`).
    pub binary_protocol: String,
    /// Binary-upload endpoint host (default: `localhost`).
    pub binary_hostname: String,
    /// Binary-upload endpoint port (default: `80`).
    pub binary_port: u16,
    /// Per-chunk upload timeout in seconds (default: `180`).
    pub binary_timeout_secs: u64,
    /// Additional attempts after a failed upload call (default: `1`).
    pub binary_max_retries: u32,
    /// Timeout for statistics calls in seconds (default: `30`).
    pub statistics_timeout_secs: u64,
    /// Additional attempts for delivery-side calls (default: `2`).
    pub delivery_max_retries: u32,
    /// Ask the server for compressed response bodies (default: `true`).
    pub compress_responses: bool,
    /// Upload chunk size in bytes (default: 100 MiB).
    pub upload_chunk_size_bytes: u64,
}

impl Default for MmsConfig {
    fn default() -> Self {
        Self {
            api_protocol: "https".into(),
            api_hostname: "localhost".into(),
            api_port: 443,
            api_timeout_secs: 15,
            api_max_retries: 1,
            binary_protocol: "https".into(),
            binary_hostname: "localhost".into(),
            binary_port: 80,
            binary_timeout_secs: 180,
            binary_max_retries: 1,
            statistics_timeout_secs: 30,
            delivery_max_retries: 2,
            compress_responses: true,
            upload_chunk_size_bytes: 100 * 1024 * 1024,
        }
    }
}

impl MmsConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default     |
    /// |-------------------------------|-------------|
    /// | `MMS_API_PROTOCOL`            | `https`     |
    /// | `MMS_API_HOSTNAME`            | `localhost` |
    /// | `MMS_API_PORT`                | `443`       |
    /// | `MMS_API_TIMEOUT_SECS`        | `15`        |
    /// | `MMS_API_MAX_RETRIES`         | `1`         |
    /// | `MMS_BINARY_PROTOCOL`         | `https`     |
    /// | `MMS_BINARY_HOSTNAME`         | `localhost` |
    /// | `MMS_BINARY_PORT`             | `80`        |
    /// | `MMS_BINARY_TIMEOUT_SECS`     | `180`       |
    /// | `MMS_BINARY_MAX_RETRIES`      | `1`         |
    /// | `MMS_STATISTICS_TIMEOUT_SECS` | `30`        |
    /// | `MMS_DELIVERY_MAX_RETRIES`    | `2`         |
    /// | `MMS_COMPRESS_RESPONSES`      | `true`      |
    /// | `MMS_UPLOAD_CHUNK_SIZE_BYTES` | `104857600` |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_protocol: env_str("MMS_API_PROTOCOL", defaults.api_protocol),
            api_hostname: env_str("MMS_API_HOSTNAME", defaults.api_hostname),
            api_port: env_parse("MMS_API_PORT", defaults.api_port),
            api_timeout_secs: env_parse("MMS_API_TIMEOUT_SECS", defaults.api_timeout_secs),
            api_max_retries: env_parse("MMS_API_MAX_RETRIES", defaults.api_max_retries),
            binary_protocol: env_str("MMS_BINARY_PROTOCOL", defaults.binary_protocol),
            binary_hostname: env_str("MMS_BINARY_HOSTNAME", defaults.binary_hostname),
            binary_port: env_parse("MMS_BINARY_PORT", defaults.binary_port),
            binary_timeout_secs: env_parse("MMS_BINARY_TIMEOUT_SECS", defaults.binary_timeout_secs),
            binary_max_retries: env_parse("MMS_BINARY_MAX_RETRIES", defaults.binary_max_retries),
            statistics_timeout_secs: env_parse(
                "MMS_STATISTICS_TIMEOUT_SECS",
                defaults.statistics_timeout_secs,
            ),
            delivery_max_retries: env_parse(
                "MMS_DELIVERY_MAX_RETRIES",
                defaults.delivery_max_retries,
            ),
            compress_responses: env_parse("MMS_COMPRESS_RESPONSES", defaults.compress_responses),
            upload_chunk_size_bytes: env_parse(
                "MMS_UPLOAD_CHUNK_SIZE_BYTES",
                defaults.upload_chunk_size_bytes,
            ),
        }
    }

    /// Base URL for API endpoints, without the versioned path segment.
    pub fn api_base(&self) -> String {
        format!(
            "{}://{}:{}",
            self.api_protocol, self.api_hostname, self.api_port
        )
    }

    /// Base URL for the binary-upload endpoint.
    pub fn binary_base(&self) -> String {
        format!(
            "{}://{}:{}",
            self.binary_protocol, self.binary_hostname, self.binary_port
        )
    }
}

fn env_str(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a valid {}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_protocol_contract() {
        let config = MmsConfig::default();
        assert_eq!(config.api_protocol, "https");
        assert_eq!(config.api_port, 443);
        assert_eq!(config.api_timeout_secs, 15);
        assert_eq!(config.api_max_retries, 1);
        assert_eq!(config.binary_port, 80);
        assert_eq!(config.binary_timeout_secs, 180);
        assert_eq!(config.binary_max_retries, 1);
        assert_eq!(config.statistics_timeout_secs, 30);
        assert_eq!(config.delivery_max_retries, 2);
        assert!(config.compress_responses);
        assert_eq!(config.upload_chunk_size_bytes, 104_857_600);
    }

    #[test]
    fn base_urls_assemble_from_parts() {
        let config = MmsConfig {
            api_hostname: "mms.example.com".into(),
            api_port: 8443,
            binary_protocol: "http".into(),
            binary_hostname: "upload.example.com".into(),
            binary_port: 8080,
            ..MmsConfig::default()
        };
        assert_eq!(config.api_base(), "https://mms.example.com:8443");
        assert_eq!(config.binary_base(), "http://upload.example.com:8080");
    }
}
