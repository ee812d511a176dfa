//! # Integration Tests
//!
//! Cross-crate and end-to-end tests.
//!
//! Covers:
//! - Acknowledgement properties of the signalling core
//! - Config to dispatcher to outputs, with acks observed by the producer

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
        let _ = contracts::Outcome::Completed;
    }
}

/// Recording signaler shared by the tests below
#[cfg(test)]
mod support {
    use std::sync::Mutex;

    use contracts::{Outcome, Signaler};

    #[derive(Default)]
    pub struct Recorder {
        calls: Mutex<Vec<Outcome>>,
    }

    impl Recorder {
        pub fn calls(&self) -> Vec<Outcome> {
            self.calls.lock().unwrap().clone()
        }

        pub fn count(&self, outcome: Outcome) -> usize {
            self.calls().into_iter().filter(|o| *o == outcome).count()
        }
    }

    impl Signaler for Recorder {
        fn completed(&self) {
            self.calls.lock().unwrap().push(Outcome::Completed);
        }

        fn failed(&self) {
            self.calls.lock().unwrap().push(Outcome::Failed);
        }
    }
}

#[cfg(test)]
mod signal_tests {
    use std::sync::{Arc, Barrier};
    use std::thread;

    use contracts::{Outcome, Signaler, SignalerRef};
    use signal::{composite, signal, signal_all, split};

    use crate::support::Recorder;

    /// Deliver `reports` to a fresh aggregator from one thread each
    fn run_concurrently(reports: &[Outcome]) -> Arc<Recorder> {
        let downstream = Arc::new(Recorder::default());
        let agg = split(Some(downstream.clone() as SignalerRef), reports.len()).unwrap();
        let barrier = Arc::new(Barrier::new(reports.len()));

        let workers: Vec<_> = reports
            .iter()
            .map(|&outcome| {
                let agg = Arc::clone(&agg);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    outcome.deliver(agg.as_ref());
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }
        downstream
    }

    #[test]
    fn test_concurrent_reports_fire_exactly_once() {
        // Deterministic mix of patterns over several sizes
        for n in [1usize, 2, 3, 7, 16, 33] {
            for pattern in 0..4 {
                let reports: Vec<Outcome> = (0..n)
                    .map(|i| match pattern {
                        0 => Outcome::Completed,
                        1 => Outcome::Failed,
                        2 if i == n - 1 => Outcome::Failed,
                        3 if i % 3 == 1 => Outcome::Failed,
                        _ => Outcome::Completed,
                    })
                    .collect();
                let any_failed = reports.iter().any(|o| o.is_failed());

                let downstream = run_concurrently(&reports);
                let calls = downstream.calls();
                assert_eq!(calls.len(), 1, "n={n} pattern={pattern}");
                assert_eq!(calls[0].is_failed(), any_failed, "n={n} pattern={pattern}");
            }
        }
    }

    #[test]
    fn test_scenario_completed_failed_completed() {
        let downstream = Arc::new(Recorder::default());
        let agg = split(Some(downstream.clone() as SignalerRef), 3).unwrap();

        for outcome in [Outcome::Completed, Outcome::Failed, Outcome::Completed] {
            let agg = Arc::clone(&agg);
            thread::spawn(move || outcome.deliver(agg.as_ref()))
                .join()
                .unwrap();
        }

        assert_eq!(downstream.calls(), vec![Outcome::Failed]);
    }

    #[test]
    fn test_scenario_two_completed() {
        let downstream = Arc::new(Recorder::default());
        let agg = split(Some(downstream.clone() as SignalerRef), 2).unwrap();
        agg.completed();
        agg.completed();
        assert_eq!(downstream.calls(), vec![Outcome::Completed]);
    }

    #[test]
    fn test_absent_downstream_yields_absent_aggregator() {
        assert!(split(None, 4).is_none());
    }

    #[test]
    fn test_empty_broadcaster_is_absent() {
        let broadcaster = composite(Vec::new());
        assert!(broadcaster.is_none());
        // Invoking the absent broadcaster through the helpers is a no-op
        signal(broadcaster.as_deref(), &Ok::<(), ()>(()));
    }

    #[test]
    fn test_scenario_broadcaster_skips_nil_slot() {
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        let broadcaster = composite(vec![
            Some(a.clone() as SignalerRef),
            None,
            Some(b.clone() as SignalerRef),
        ])
        .unwrap();

        broadcaster.completed();

        assert_eq!(a.calls(), vec![Outcome::Completed]);
        assert_eq!(b.calls(), vec![Outcome::Completed]);
    }

    #[test]
    fn test_dispatch_by_error() {
        let d = Arc::new(Recorder::default());
        signal(Some(&*d), &Err::<(), _>("boom"));
        signal(Some(&*d), &Ok::<_, &str>(()));
        signal(None, &Err::<(), _>("ignored"));
        assert_eq!(d.calls(), vec![Outcome::Failed, Outcome::Completed]);
    }

    #[test]
    fn test_signal_all_reaches_present_entries() {
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        let targets = vec![Some(a.clone() as SignalerRef), None, Some(b.clone() as SignalerRef)];

        signal_all(Some(targets.as_slice()), &Err::<(), _>("boom"));
        signal_all(None, &Ok::<(), ()>(()));

        assert_eq!(a.calls(), vec![Outcome::Failed]);
        assert_eq!(b.calls(), vec![Outcome::Failed]);
    }

    #[test]
    fn test_split_of_composite() {
        // Fan-out to two observers, guarded by a fan-in over three outputs
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        let upstream = composite(vec![Some(a.clone() as SignalerRef), Some(b.clone() as SignalerRef)]);
        let guarded = split(upstream, 3).unwrap();

        guarded.completed();
        guarded.failed();
        assert!(a.calls().is_empty());
        guarded.completed();

        assert_eq!(a.count(Outcome::Failed), 1);
        assert_eq!(b.count(Outcome::Failed), 1);
        assert_eq!(a.count(Outcome::Completed), 0);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{Batch, ContractError, Event, Outcome, Output, SignalerRef};
    use dispatcher::{channel, create_dispatcher, Dispatcher, LogOutput, OutputHandle};
    use signal::{AckSignal, SignalCounter};

    use crate::support::Recorder;

    fn batch(id: u64, events: u64) -> Batch {
        Batch::new(
            id,
            (0..events)
                .map(|i| Event::new(id * 1000 + i, 0, format!("event-{i}")))
                .collect(),
        )
    }

    /// Output that fails every write after the first `ok_writes`
    struct FailingOutput {
        name: String,
        ok_writes: u64,
        writes: Arc<AtomicU64>,
    }

    impl Output for FailingOutput {
        fn name(&self) -> &str {
            &self.name
        }

        async fn write(&mut self, _batch_id: u64, _events: &[Event]) -> Result<(), ContractError> {
            let n = self.writes.fetch_add(1, Ordering::SeqCst);
            if n >= self.ok_writes {
                return Err(ContractError::output_write(&self.name, "disk full"));
            }
            Ok(())
        }

        async fn flush(&mut self) -> Result<(), ContractError> {
            Ok(())
        }

        async fn close(&mut self) -> Result<(), ContractError> {
            Ok(())
        }
    }

    /// Config file -> dispatcher -> file + log outputs, acks awaited by the producer
    #[tokio::test]
    async fn test_e2e_config_to_file_output() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!(
            r#"
[pipeline]
bulk_max_size = 3
queue_capacity = 8

[[outputs]]
name = "console"
output_type = "log"

[[outputs]]
name = "archive"
output_type = "file"
[outputs.params]
base_path = "{}"
"#,
            dir.path().display()
        );
        let blueprint = ConfigLoader::load_from_str(&content, ConfigFormat::Toml).unwrap();

        let (publisher, rx) = channel(blueprint.pipeline.queue_capacity);
        let dispatcher = create_dispatcher(&blueprint, rx).await.unwrap();
        assert_eq!(dispatcher.metrics().len(), 2);
        let task = dispatcher.spawn();

        let mut acks = Vec::new();
        for id in 0..5 {
            let (ack, ack_rx) = AckSignal::channel();
            publisher
                .publish(batch(id, 7), vec![Some(Arc::new(ack) as SignalerRef)])
                .await
                .unwrap();
            acks.push(ack_rx);
        }

        for ack_rx in acks {
            assert_eq!(ack_rx.wait().await, Some(Outcome::Completed));
        }

        drop(publisher);
        let snapshot = task.await.unwrap();
        assert_eq!(snapshot.completed, 5);
        assert_eq!(snapshot.failed, 0);

        let written = std::fs::read_to_string(dir.path().join("archive.jsonl")).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 35);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["sequence"], 0);
    }

    /// One healthy output and one failing output: every batch fails exactly once
    #[tokio::test]
    async fn test_e2e_failing_output_fails_every_batch_once() {
        let writes = Arc::new(AtomicU64::new(0));
        let handles = vec![
            OutputHandle::spawn(LogOutput::new("console"), 16, 4),
            OutputHandle::spawn(
                FailingOutput {
                    name: "broken".to_string(),
                    ok_writes: 0,
                    writes: Arc::clone(&writes),
                },
                16,
                4,
            ),
        ];

        let (publisher, rx) = channel(8);
        let task = Dispatcher::with_handles(handles, rx).spawn();

        let observers: Vec<Arc<Recorder>> = (0..4).map(|_| Arc::new(Recorder::default())).collect();
        let shared = Arc::new(SignalCounter::new());
        for (id, observer) in observers.iter().enumerate() {
            publisher
                .publish(
                    batch(id as u64, 10),
                    vec![
                        Some(observer.clone() as SignalerRef),
                        None,
                        Some(shared.clone() as SignalerRef),
                    ],
                )
                .await
                .unwrap();
        }
        drop(publisher);

        let snapshot = task.await.unwrap();
        assert_eq!(snapshot.failed, 4);
        assert_eq!(snapshot.completed, 0);

        for observer in &observers {
            assert_eq!(observer.calls(), vec![Outcome::Failed]);
        }
        assert_eq!(shared.snapshot().failed, 4);
        // 10 events in chunks of 4 -> 3 writes per batch
        assert_eq!(writes.load(Ordering::SeqCst), 12);
    }

    /// A single failing chunk in the middle of a batch fails only that batch
    #[tokio::test]
    async fn test_e2e_partial_failure_is_sticky_per_batch() {
        let writes = Arc::new(AtomicU64::new(0));
        let handles = vec![OutputHandle::spawn(
            FailingOutput {
                name: "flaky".to_string(),
                // first batch: 3 chunks ok; second batch: all chunks fail
                ok_writes: 3,
                writes: Arc::clone(&writes),
            },
            4,
            2,
        )];

        let (publisher, rx) = channel(4);
        let task = Dispatcher::with_handles(handles, rx).spawn();

        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());
        publisher
            .publish(batch(1, 6), vec![Some(first.clone() as SignalerRef)])
            .await
            .unwrap();
        publisher
            .publish(batch(2, 6), vec![Some(second.clone() as SignalerRef)])
            .await
            .unwrap();
        drop(publisher);

        task.await.unwrap();
        assert_eq!(first.calls(), vec![Outcome::Completed]);
        assert_eq!(second.calls(), vec![Outcome::Failed]);
    }

    /// Publishing after the dispatcher stopped fails the batch instead of leaking it
    #[tokio::test]
    async fn test_e2e_publish_after_shutdown() {
        let (publisher, rx) = channel(1);
        let task = Dispatcher::with_handles(Vec::new(), rx).spawn();

        let (ack, ack_rx) = AckSignal::channel();
        publisher
            .publish(batch(1, 1), vec![Some(Arc::new(ack) as SignalerRef)])
            .await
            .unwrap();
        assert_eq!(ack_rx.wait().await, Some(Outcome::Completed));

        // Stop the dispatcher while the publisher is still alive
        task.abort();
        let _ = task.await;

        let (ack, ack_rx) = AckSignal::channel();
        let result = publisher
            .publish(batch(2, 1), vec![Some(Arc::new(ack) as SignalerRef)])
            .await;
        assert!(result.is_err());
        assert_eq!(ack_rx.wait().await, Some(Outcome::Failed));
    }

    #[test]
    fn test_ack_summary_from_outcomes() {
        let mut agg = observability::AckStatsAggregator::new();
        agg.update(Outcome::Completed, 1.0);
        agg.update(Outcome::Failed, 3.0);
        let summary = agg.summary();
        assert_eq!(summary.total_batches, 2);
        assert!((summary.latency_ms.mean - 2.0).abs() < 1e-10);
    }
}
