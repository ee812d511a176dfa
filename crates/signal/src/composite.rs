//! CompositeSignal - fan-out of one report to many signalers

use std::sync::Arc;

use contracts::{Signaler, SignalerRef};

/// Forwards every report to all wrapped signalers.
///
/// Absent slots are skipped. Delivery follows construction order. The
/// composite holds no state besides its targets and can be reused freely.
pub struct CompositeSignal {
    signalers: Vec<Option<SignalerRef>>,
}

impl CompositeSignal {
    /// Combine `signalers`; returns `None` for an empty collection.
    pub fn new(signalers: Vec<Option<SignalerRef>>) -> Option<Self> {
        if signalers.is_empty() {
            return None;
        }
        Some(Self { signalers })
    }

    /// Number of slots, absent ones included
    pub fn len(&self) -> usize {
        self.signalers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signalers.is_empty()
    }

    fn present(&self) -> impl Iterator<Item = &SignalerRef> {
        self.signalers.iter().flatten()
    }
}

impl Signaler for CompositeSignal {
    fn completed(&self) {
        for s in self.present() {
            s.completed();
        }
    }

    fn failed(&self) {
        for s in self.present() {
            s.failed();
        }
    }
}

/// Shared form of [`CompositeSignal::new`]
pub fn composite(signalers: Vec<Option<SignalerRef>>) -> Option<SignalerRef> {
    CompositeSignal::new(signalers).map(|s| Arc::new(s) as SignalerRef)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SignalCounter;
    use std::sync::Mutex;

    #[test]
    fn test_empty_yields_none() {
        assert!(CompositeSignal::new(Vec::new()).is_none());
        assert!(composite(Vec::new()).is_none());
    }

    #[test]
    fn test_skips_absent_slots() {
        let a = Arc::new(SignalCounter::new());
        let b = Arc::new(SignalCounter::new());
        let slots = vec![Some(a.clone() as SignalerRef), None, Some(b.clone() as SignalerRef)];

        let cs = CompositeSignal::new(slots).unwrap();
        assert_eq!(cs.len(), 3);
        cs.completed();

        assert_eq!(a.snapshot().completed, 1);
        assert_eq!(b.snapshot().completed, 1);
        assert_eq!(a.total() + b.total(), 2);
    }

    #[test]
    fn test_all_slots_absent_is_noop() {
        let cs = CompositeSignal::new(vec![None, None]).unwrap();
        cs.completed();
        cs.failed();
    }

    #[test]
    fn test_forwards_failed_to_each_target() {
        let a = Arc::new(SignalCounter::new());
        let b = Arc::new(SignalCounter::new());
        let cs = composite(vec![Some(a.clone() as SignalerRef), Some(b.clone() as SignalerRef)])
            .unwrap();

        cs.failed();

        assert_eq!(a.snapshot().failed, 1);
        assert_eq!(b.snapshot().failed, 1);
        assert_eq!(a.snapshot().completed, 0);
    }

    #[test]
    fn test_reusable_across_calls() {
        let a = Arc::new(SignalCounter::new());
        let cs = CompositeSignal::new(vec![Some(a.clone() as SignalerRef)]).unwrap();

        cs.completed();
        cs.failed();
        cs.completed();

        assert_eq!(a.snapshot().completed, 2);
        assert_eq!(a.snapshot().failed, 1);
    }

    struct Ordered {
        id: usize,
        log: Arc<Mutex<Vec<usize>>>,
    }

    impl Signaler for Ordered {
        fn completed(&self) {
            self.log.lock().unwrap().push(self.id);
        }

        fn failed(&self) {}
    }

    #[test]
    fn test_delivery_follows_construction_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let slots = (0..4)
            .map(|id| {
                Some(Arc::new(Ordered {
                    id,
                    log: Arc::clone(&log),
                }) as SignalerRef)
            })
            .collect();

        let cs = CompositeSignal::new(slots).unwrap();
        cs.completed();
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3]);
    }
}
