//! Signaler - acknowledgement capability
//!
//! The two-outcome interface every report site invokes.

use std::sync::Arc;

/// Signals the outcome of a potentially asynchronous output operation.
///
/// `completed` is called once all events of the unit of work were handed off.
/// `failed` is called when the unit of work did not complete, fully or partially.
///
/// Implementations must not block the caller and must be callable from any
/// thread without external locking.
pub trait Signaler: Send + Sync {
    /// The unit of work finished and all its data was handed off downstream.
    fn completed(&self);

    /// The unit of work did not complete.
    fn failed(&self);
}

/// Shared, type-erased signaler.
///
/// Optional signalers are passed as `Option<SignalerRef>`; `None` means nobody listens.
pub type SignalerRef = Arc<dyn Signaler>;

impl<S: Signaler + ?Sized> Signaler for Arc<S> {
    fn completed(&self) {
        (**self).completed();
    }

    fn failed(&self) {
        (**self).failed();
    }
}

/// Binary outcome of a unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Completed,
    Failed,
}

impl Outcome {
    /// `Err` maps to [`Outcome::Failed`], `Ok` to [`Outcome::Completed`]
    pub fn from_result<T, E>(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => Self::Completed,
            Err(_) => Self::Failed,
        }
    }

    pub fn is_failed(self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Invoke the matching method on `signaler`
    pub fn deliver(self, signaler: &dyn Signaler) {
        match self {
            Self::Completed => signaler.completed(),
            Self::Failed => signaler.failed(),
        }
    }

    /// Label used in logs and metrics
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
