use thiserror::Error;

/// Result type alias for call-cleared parameter operations.
pub type CallClearedResult<T> = Result<T, CallClearedError>;

/// Centralized error enum for the call-cleared binding layer.
///
/// Every failure is reported synchronously to the immediate caller; nothing
/// is retried internally. Release races are handled by idempotence rather
/// than by raising errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CallClearedError {
    /// Native allocation of a parameter block failed.
    #[error("native allocation failed: {0}")]
    Allocation(String),

    /// An accessor was invoked after the handle was released.
    ///
    /// This indicates a usage bug (use-after-free at the API level) and is
    /// never retried.
    #[error("parameter block already released")]
    InvalidHandle,

    /// The native reason field holds a value outside the engine's call-end
    /// taxonomy. Surfaced rather than coerced to a default, so callers are
    /// never handed a wrong-but-plausible reason.
    #[error("unknown call end reason code: {0}")]
    UnknownReasonCode(i32),

    /// A token string cannot cross the native boundary in either direction.
    #[error("token conversion failed: {0}")]
    Conversion(String),
}

impl From<std::ffi::NulError> for CallClearedError {
    fn from(err: std::ffi::NulError) -> Self {
        Self::Conversion(format!("token contains an embedded NUL byte: {err}"))
    }
}

impl From<std::str::Utf8Error> for CallClearedError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::Conversion(format!("native token is not valid UTF-8: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nul_error_maps_to_conversion() {
        let err = CallClearedError::from(std::ffi::CString::new("a\0b").unwrap_err());
        assert!(matches!(err, CallClearedError::Conversion(_)));
    }

    #[test]
    fn display_names_the_released_state() {
        assert_eq!(
            CallClearedError::InvalidHandle.to_string(),
            "parameter block already released"
        );
        assert_eq!(
            CallClearedError::UnknownReasonCode(999).to_string(),
            "unknown call end reason code: 999"
        );
    }
}
