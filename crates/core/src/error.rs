#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A field is present but its JSON type does not match the target type.
    #[error("{context}.{field}: expected {expected}")]
    WrongType {
        context: &'static str,
        field: String,
        expected: &'static str,
    },

    /// An embedded object the protocol requires is missing entirely.
    #[error("{context}.{field}: required field is missing")]
    MissingField {
        context: &'static str,
        field: String,
    },

    /// A date-valued field holds a non-empty string that is not a valid
    /// RFC 3339 timestamp.
    #[error("{context}.{field}: invalid timestamp {value:?}")]
    InvalidTimestamp {
        context: &'static str,
        field: String,
        value: String,
    },
}
