//! The universal return shape for bridge and batch operations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::StructuredError;

/// Discriminated success/failure result, returned instead of thrown.
///
/// Exactly one of `data`/`error` is populated; the constructors enforce
/// this, callers branch on [`ExecutionOutcome::is_success`]. Panics are
/// reserved for programming errors and never cross this boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExecutionOutcome<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<StructuredError>,
}

impl<T> ExecutionOutcome<T> {
    /// Successful outcome carrying a payload.
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed outcome carrying a classified error.
    #[must_use]
    pub fn err(error: StructuredError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }

    /// Whether the operation succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Payload reference, present only on success.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Error reference, present only on failure.
    #[must_use]
    pub fn error(&self) -> Option<&StructuredError> {
        self.error.as_ref()
    }

    /// Convert into a `Result`, mapping a malformed failure (no error
    /// populated) to [`crate::ErrorKind::UnknownError`].
    ///
    /// # Errors
    /// Returns the carried [`StructuredError`] when the outcome is a failure.
    pub fn into_result(self) -> Result<T, StructuredError> {
        if self.success {
            match self.data {
                Some(data) => Ok(data),
                None => Err(StructuredError::new(
                    crate::ErrorKind::UnknownError,
                    "success outcome carried no data",
                )),
            }
        } else {
            Err(self.error.unwrap_or_else(|| {
                StructuredError::new(
                    crate::ErrorKind::UnknownError,
                    "failure outcome carried no error",
                )
            }))
        }
    }

    /// Map the success payload, leaving failures untouched.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ExecutionOutcome<U> {
        ExecutionOutcome {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
        }
    }
}

impl<T> From<StructuredError> for ExecutionOutcome<T> {
    fn from(error: StructuredError) -> Self {
        Self::err(error)
    }
}

/// One item the per-chunk script reported as failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BatchFailure {
    /// The identifier the operation was attempted on.
    pub id: String,
    /// The interpreter's error text for this item, verbatim.
    pub error: String,
}

/// Aggregate result of a chunked batch mutation.
///
/// Built incrementally across chunks by the batch engine; only the final
/// aggregate is ever handed to a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BatchResult<T> {
    /// Items the per-chunk scripts reported as succeeded, in chunk order.
    pub succeeded: Vec<T>,
    /// Items the per-chunk scripts reported as failed, in chunk order.
    pub failed: Vec<BatchFailure>,
    /// `succeeded.len()`, computed once at aggregation end.
    pub total_succeeded: usize,
    /// `failed.len()`, computed once at aggregation end.
    pub total_failed: usize,
}

impl<T> BatchResult<T> {
    /// Empty aggregate, extended chunk by chunk.
    #[must_use]
    pub fn new() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
            total_succeeded: 0,
            total_failed: 0,
        }
    }

    /// Merge one chunk's succeeded/failed lists into the aggregate.
    pub fn absorb(&mut self, succeeded: Vec<T>, failed: Vec<BatchFailure>) {
        self.succeeded.extend(succeeded);
        self.failed.extend(failed);
    }

    /// Recompute the totals from the merged lists.
    pub fn finalize(&mut self) {
        self.total_succeeded = self.succeeded.len();
        self.total_failed = self.failed.len();
    }
}

impl<T> Default for BatchResult<T> {
    fn default() -> Self {
        Self::new()
    }
}
