// src/error.rs
use core::fmt;

/// Library-wide error for stream-tdigest.
///
/// Every failure is local to the call that raised it: the digest is left
/// exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TdError {
    /// A scalar argument was NaN/±inf or outside its domain
    /// (non-positive weight or compression, quantile outside `[0, 1]`, ...).
    /// `context` names the argument (e.g. "sample value", "sample weight").
    InvalidArgument {
        context: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// A centroid set supplied from outside (deserialization) breaks the
    /// digest invariants.
    Invariant { what: &'static str },
}

impl TdError {
    #[inline]
    pub(crate) fn invalid(context: &'static str, value: f64, expected: &'static str) -> Self {
        TdError::InvalidArgument {
            context,
            value,
            expected,
        }
    }

    /// `true` for the [`TdError::InvalidArgument`] category.
    #[inline]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, TdError::InvalidArgument { .. })
    }
}

impl fmt::Display for TdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TdError::InvalidArgument {
                context,
                value,
                expected,
            } => write!(
                f,
                "tdigest: invalid {} (got {}). hint: {} must be {}",
                context, value, context, expected
            ),
            TdError::Invariant { what } => {
                write!(f, "tdigest: invalid digest state: {}", what)
            }
        }
    }
}

impl std::error::Error for TdError {}

pub type TdResult<T> = Result<T, TdError>;

/// `x` must be finite.
#[inline]
pub(crate) fn ensure_finite(context: &'static str, x: f64) -> TdResult<()> {
    if x.is_finite() {
        Ok(())
    } else {
        Err(TdError::invalid(context, x, "a finite number"))
    }
}

/// `x` must be finite and strictly positive.
#[inline]
pub(crate) fn ensure_positive(context: &'static str, x: f64) -> TdResult<()> {
    if x.is_finite() && x > 0.0 {
        Ok(())
    } else {
        Err(TdError::invalid(context, x, "finite and > 0"))
    }
}
