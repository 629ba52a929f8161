//! Optional external capabilities (generation, translation, OCR) and their shared error type.
//!
//! A capability is either wired in at construction time or explicitly absent. The pipeline never
//! probes credentials or the environment itself; callers decide availability when they build the
//! service and the core simply moves on to the next fallback tier when a capability is missing or
//! fails.

use thiserror::Error;

/// Errors surfaced by optional capabilities. None of them are fatal to the pipeline.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// Capability is not configured or its backend could not be reached.
    #[error("capability unavailable: {0}")]
    Unavailable(String),
    /// Backend answered with an error.
    #[error("capability failed: {0}")]
    Failed(String),
    /// Backend response could not be decoded.
    #[error("malformed capability response: {0}")]
    InvalidResponse(String),
    /// Backend succeeded but produced no usable text.
    #[error("capability returned an empty result")]
    Empty,
}

/// An injected dependency that may be absent.
#[derive(Debug, Clone)]
pub enum Capability<T> {
    /// The capability is configured and ready to use.
    Available(T),
    /// The capability was not configured for this process.
    Unavailable,
}

impl<T> Capability<T> {
    /// Borrow the capability handle when it is available.
    pub fn as_available(&self) -> Option<&T> {
        match self {
            Self::Available(handle) => Some(handle),
            Self::Unavailable => None,
        }
    }

    /// Consume the capability, returning its handle when available.
    pub fn into_available(self) -> Option<T> {
        match self {
            Self::Available(handle) => Some(handle),
            Self::Unavailable => None,
        }
    }

    /// Whether a handle is present.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl<T> From<Option<T>> for Capability<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unavailable, Self::Available)
    }
}

/// Reject blank capability output so callers can treat it as a failed tier.
pub fn non_empty(text: String) -> Result<String, CapabilityError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(CapabilityError::Empty)
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_conversion_maps_to_variants() {
        let present: Capability<u8> = Some(3).into();
        let absent: Capability<u8> = None.into();
        assert_eq!(present.as_available(), Some(&3));
        assert!(!absent.is_available());
        assert!(absent.into_available().is_none());
    }

    #[test]
    fn non_empty_trims_and_rejects_blank_output() {
        assert_eq!(non_empty("  ok \n".into()).unwrap(), "ok");
        assert!(matches!(non_empty(" \n".into()), Err(CapabilityError::Empty)));
    }
}
