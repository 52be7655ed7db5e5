// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in scintilla-gtk return `error::Result<T>`.
// This layer deliberately has few recoverable errors: out-of-range indexes
// are clamped, unrecognised notification codes are dropped, and undecodable
// notification text degrades to an empty string. What remains are genuine
// caller-facing failures on the outer editing API.

/// Every error that scintilla-gtk can produce.
#[derive(Debug)]
pub enum SciError {
    /// `scintilla_new()` returned a null widget pointer.
    WidgetCreate,

    /// A range-mutating operation was given a position/length pair that does
    /// not fit inside the document.
    InvalidRange {
        /// Character position the caller passed.
        position: usize,
        /// Character length the caller passed.
        length: usize,
        /// Character length of the document at the time of the call.
        limit: usize,
    },

    /// A caller-supplied string contained an interior NUL byte and cannot be
    /// passed to the native control.
    Nul(std::ffi::NulError),

    /// The lexer library has no lexer with the requested name.
    LexerNotFound(String),
}

impl std::fmt::Display for SciError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WidgetCreate => write!(f, "scintilla_new() failed to create a widget"),
            Self::InvalidRange {
                position,
                length,
                limit,
            } => {
                write!(
                    f,
                    "range [{position}, {position}+{length}) lies outside the document (length {limit})"
                )
            }
            Self::Nul(e) => write!(f, "string contains an interior NUL byte: {e}"),
            Self::LexerNotFound(name) => write!(f, "no lexer named {name:?}"),
        }
    }
}

impl std::error::Error for SciError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Nul(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::ffi::NulError> for SciError {
    fn from(e: std::ffi::NulError) -> Self {
        Self::Nul(e)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SciError>;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_range_display() {
        let e = SciError::InvalidRange {
            position: 4,
            length: 3,
            limit: 5,
        };
        assert_eq!(
            e.to_string(),
            "range [4, 4+3) lies outside the document (length 5)"
        );
    }

    #[test]
    fn nul_error_wraps_source() {
        let nul = std::ffi::CString::new("a\0b").unwrap_err();
        let e = SciError::from(nul);
        assert!(std::error::Error::source(&e).is_some());
    }
}
