// Integration tests for the scheduling disciplines
// Tests cover: observer responsiveness, execution contexts, equivalence,
// cancellation at suspension points, dropped futures

#![cfg(feature = "hash-blake3")]

mod common;

use std::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use common::{ScriptedSource, init_logging, provide, sample_data};
use stepdigest::{
    Blake3Hasher, DigestConfig, DigestError, DigestSession, Discipline, ProgressEvent,
    ProgressLog, WorkerPool,
};
use tokio_test::{assert_pending, task};

fn session(chunk_size: usize, discipline: Discipline) -> DigestSession {
    DigestSession::new(
        DigestConfig::new(chunk_size)
            .unwrap()
            .with_discipline(discipline),
    )
}

// ============================================================================
// Responsiveness
// ============================================================================

#[tokio::test(flavor = "current_thread")]
async fn test_cooperative_lets_other_tasks_run_between_chunks() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let ticker = {
        let ticks = ticks.clone();
        tokio::spawn(async move {
            loop {
                ticks.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
            }
        })
    };

    let mut seen = Vec::new();
    let mut sink = |_event: ProgressEvent| seen.push(ticks.load(Ordering::SeqCst));
    session(1000, Discipline::CooperativeYield)
        .run(
            provide(ScriptedSource::new(sample_data(10_000))),
            Blake3Hasher::new(),
            &mut sink,
        )
        .await
        .unwrap();
    ticker.abort();

    assert_eq!(seen.len(), 10);
    assert!(
        seen.windows(2).all(|w| w[1] > w[0]),
        "the other task must run between every pair of chunks: {:?}",
        seen
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_offload_lets_other_tasks_run_between_chunks() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let ticker = {
        let ticks = ticks.clone();
        tokio::spawn(async move {
            loop {
                ticks.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
            }
        })
    };

    // Single-byte steps on a fast source finish before the caller polls the
    // handle, so the worker alone never forces a suspension.
    let mut seen = Vec::new();
    let mut sink = |_event: ProgressEvent| seen.push(ticks.load(Ordering::SeqCst));
    session(1, Discipline::OffloadAwait)
        .with_worker_pool(WorkerPool::new(1).unwrap())
        .run(
            provide(ScriptedSource::new(sample_data(2000))),
            Blake3Hasher::new(),
            &mut sink,
        )
        .await
        .unwrap();
    ticker.abort();

    assert_eq!(seen.len(), 2000);
    let starved = seen.windows(2).filter(|w| w[1] <= w[0]).count();
    assert_eq!(starved, 0, "chunk pairs without a host turn");
}

#[test]
fn test_cooperative_sessions_interleave_on_one_thread() {
    init_logging();
    let order = RefCell::new(Vec::new());
    let mut sink_a = |event: ProgressEvent| order.borrow_mut().push(('a', event.sequence()));
    let mut sink_b = |event: ProgressEvent| order.borrow_mut().push(('b', event.sequence()));

    let a = session(100, Discipline::CooperativeYield);
    let b = session(100, Discipline::CooperativeYield);
    let (ra, rb) = futures_executor::block_on(futures_util::future::join(
        a.run(
            provide(ScriptedSource::new(sample_data(300))),
            Blake3Hasher::new(),
            &mut sink_a,
        ),
        b.run(
            provide(ScriptedSource::new(sample_data(300))),
            Blake3Hasher::new(),
            &mut sink_b,
        ),
    ));
    assert_eq!(ra.unwrap().digest, rb.unwrap().digest);

    assert_eq!(
        order.into_inner(),
        vec![('a', 0), ('b', 0), ('a', 1), ('b', 1), ('a', 2), ('b', 2)]
    );
}

// ============================================================================
// Execution Contexts
// ============================================================================

#[test]
fn test_offload_reads_off_thread_and_reports_on_caller() {
    let source = ScriptedSource::new(sample_data(4096));
    let probe = source.probe();
    let caller = thread::current().id();

    let mut report_threads = Vec::new();
    let mut sink = |_event: ProgressEvent| report_threads.push(thread::current().id());
    session(1024, Discipline::OffloadAwait)
        .run_blocking(provide(source), Blake3Hasher::new(), &mut sink)
        .unwrap();

    let reads = probe.read_threads();
    assert_eq!(reads.len(), 5);
    assert!(reads.iter().all(|id| *id != caller));
    assert_eq!(report_threads.len(), 4);
    assert!(report_threads.iter().all(|id| *id == caller));
}

#[test]
fn test_cooperative_reads_on_caller() {
    let source = ScriptedSource::new(sample_data(4096));
    let probe = source.probe();
    let caller = thread::current().id();

    session(1024, Discipline::CooperativeYield)
        .run_blocking(provide(source), Blake3Hasher::new(), &mut ProgressLog::new())
        .unwrap();

    assert!(probe.read_threads().iter().all(|id| *id == caller));
}

#[test]
fn test_shared_pool_serves_sessions() {
    let pool = WorkerPool::new(2).unwrap();
    let data = sample_data(50_000);

    let digests: Vec<_> = (0..4)
        .map(|_| {
            session(4096, Discipline::OffloadAwait)
                .with_worker_pool(pool.clone())
                .run_blocking(
                    provide(ScriptedSource::new(data.clone())),
                    Blake3Hasher::new(),
                    &mut ProgressLog::new(),
                )
                .unwrap()
                .digest
        })
        .collect();

    assert!(digests.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(digests[0].as_bytes(), blake3::hash(&data).as_bytes());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_sessions_are_independent() {
    let mut handles = Vec::new();
    for seed in 0..4usize {
        handles.push(tokio::spawn(async move {
            let data: Vec<u8> = sample_data(20_000 + seed * 1000);
            let mut log = ProgressLog::new();
            let discipline = if seed % 2 == 0 {
                Discipline::CooperativeYield
            } else {
                Discipline::OffloadAwait
            };
            let result = session(1000, discipline)
                .run(
                    provide(ScriptedSource::new(data.clone())),
                    Blake3Hasher::new(),
                    &mut log,
                )
                .await
                .unwrap();
            (data, result, log.len())
        }));
    }

    for handle in handles {
        let (data, result, events) = handle.await.unwrap();
        assert_eq!(result.digest.as_bytes(), blake3::hash(&data).as_bytes());
        assert_eq!(events as u64, result.chunk_count);
    }
}

// ============================================================================
// Discipline Equivalence
// ============================================================================

#[test]
fn test_disciplines_agree() {
    for (len, chunk_size) in [(0, 10), (1, 10), (4095, 256), (65_537, 4096)] {
        let data = sample_data(len);

        let mut cooperative = ProgressLog::new();
        let a = session(chunk_size, Discipline::CooperativeYield)
            .run_blocking(
                provide(ScriptedSource::new(data.clone())),
                Blake3Hasher::new(),
                &mut cooperative,
            )
            .unwrap();

        let mut offloaded = ProgressLog::new();
        let b = session(chunk_size, Discipline::OffloadAwait)
            .run_blocking(
                provide(ScriptedSource::new(data)),
                Blake3Hasher::new(),
                &mut offloaded,
            )
            .unwrap();

        assert_eq!(a.digest, b.digest);
        assert_eq!(a.chunk_count, b.chunk_count);
        assert_eq!(cooperative.events(), offloaded.events());
    }
}

// ============================================================================
// Cancellation
// ============================================================================

#[test]
fn test_cancel_from_sink_stops_at_next_suspension_point() {
    init_logging();
    for discipline in [Discipline::CooperativeYield, Discipline::OffloadAwait] {
        let source = ScriptedSource::new(sample_data(10_000));
        let probe = source.probe();
        let session = session(1000, discipline);
        let token = session.cancel_token();

        let mut events = 0;
        let mut sink = |event: ProgressEvent| {
            events += 1;
            if event.sequence() == 1 {
                token.cancel();
            }
        };
        let result = session.run_blocking(provide(source), Blake3Hasher::new(), &mut sink);

        assert!(matches!(result, Err(DigestError::Cancelled)), "{:?}", discipline);
        assert_eq!(events, 2, "the in-flight chunk completes, nothing after it");
        assert_eq!(probe.closes(), 1);
    }
}

#[test]
fn test_dropped_cooperative_future_closes_source() {
    let source = ScriptedSource::new(sample_data(10_000));
    let probe = source.probe();
    let session = session(1000, Discipline::CooperativeYield);
    let mut log = ProgressLog::new();

    {
        let mut fut = task::spawn(session.run(provide(source), Blake3Hasher::new(), &mut log));
        assert_pending!(fut.poll());
    }

    assert_eq!(log.len(), 1);
    assert_eq!(probe.closes(), 1);
}

#[test]
fn test_dropped_offload_future_closes_source_on_worker() {
    let source = ScriptedSource::new(sample_data(10_000));
    let probe = source.probe();
    let session = session(1000, Discipline::OffloadAwait);
    let mut log = ProgressLog::new();

    {
        let mut fut = task::spawn(session.run(provide(source), Blake3Hasher::new(), &mut log));
        let _ = fut.poll();
    }

    // The in-flight step finishes on the worker, which then drops the state.
    let deadline = Instant::now() + Duration::from_secs(5);
    while probe.closes() == 0 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(probe.closes(), 1);
}
