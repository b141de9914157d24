/// Server-side numeric keys. `-1` means the key was absent from the payload.
pub type Key = i64;

/// UTC timestamps as whole seconds since the Unix epoch. `0` means unset.
pub type EpochSecs = i64;
