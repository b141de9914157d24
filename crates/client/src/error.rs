//! Error taxonomy for the client layer.
//!
//! The mapping layer distinguishes four failure kinds: calling an
//! operation before login, a payload that does not decode, a transport
//! failure, and a chunked upload cancelled by its progress callback.
//! Errors cross this layer unchanged in kind; there is no retry or
//! suppression here.

use mms_core::error::DecodeError;

/// Failures raised by the transport collaborator.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP request itself failed (connectivity, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status after any configured
    /// retries.
    #[error("Server error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The upload source file could not be read.
    #[error("Upload file error: {0}")]
    Io(#[from] std::io::Error),

    /// The progress callback asked to stop a chunked upload.
    #[error("Upload cancelled after {bytes_sent} bytes")]
    Cancelled { bytes_sent: u64 },
}

/// Failures surfaced to callers of the session client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An operation other than `login` was invoked before a successful
    /// login.
    #[error("{operation} requires a successful login first")]
    NotLoggedIn { operation: &'static str },

    /// A response payload did not decode into its target type.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The transport collaborator failed; surfaced unchanged.
    #[error(transparent)]
    Transport(TransportError),

    /// A chunked upload was aborted by its progress callback.
    #[error("Upload cancelled after {bytes_sent} bytes")]
    Cancelled { bytes_sent: u64 },
}

impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Cancelled { bytes_sent } => ClientError::Cancelled { bytes_sent },
            other => ClientError::Transport(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn cancellation_keeps_its_own_kind() {
        let err: ClientError = TransportError::Cancelled { bytes_sent: 1024 }.into();
        assert_matches!(err, ClientError::Cancelled { bytes_sent: 1024 });
    }

    #[test]
    fn status_errors_stay_transport_errors() {
        let err: ClientError = TransportError::Status {
            status: 503,
            body: "unavailable".into(),
        }
        .into();
        assert_matches!(
            err,
            ClientError::Transport(TransportError::Status { status: 503, .. })
        );
    }
}
