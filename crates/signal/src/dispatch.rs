//! Nil-tolerant signalling helpers
//!
//! Report sites hold optional signalers; these helpers remove the `if let Some`
//! at every call site.

use contracts::{Outcome, Signaler, SignalerRef};

use crate::CompositeSignal;

/// Signal `completed` to `s` if present
pub fn signal_completed(s: Option<&dyn Signaler>) {
    if let Some(s) = s {
        s.completed();
    }
}

/// Signal `failed` to `s` if present
pub fn signal_failed(s: Option<&dyn Signaler>) {
    if let Some(s) = s {
        s.failed();
    }
}

/// Signal `failed` if `result` is an error, `completed` otherwise
///
/// No-op if `s` is absent.
pub fn signal<T, E>(s: Option<&dyn Signaler>, result: &Result<T, E>) {
    if let Some(s) = s {
        Outcome::from_result(result).deliver(s);
    }
}

/// Signal the outcome of `result` to every present signaler
///
/// No-op if the collection is absent or empty.
pub fn signal_all<T, E>(signalers: Option<&[Option<SignalerRef>]>, result: &Result<T, E>) {
    if let Some(signalers) = signalers {
        let composite = CompositeSignal::new(signalers.to_vec());
        signal(composite.as_ref().map(|c| c as &dyn Signaler), result);
    }
}
