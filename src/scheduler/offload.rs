//! Offload discipline: each read+hash step on a worker, awaited by the caller.

use super::yield_now::yield_now;
use super::{CancelToken, StepState, WorkerPool};
use crate::error::DigestError;
use crate::hash::Hasher;
use crate::progress::{ProgressSink, Reporter};
use crate::source::ByteSource;

/// Dispatches one step at a time to `pool`, reporting on the calling task.
///
/// Dispatching → AwaitingWorker → Reporting → Yielding, until a zero read.
/// The step state is moved into the job and comes back with its outcome, so
/// the worker and the caller never touch it at the same time.
///
/// A step that finishes before its handle is first polled resolves without
/// suspending, so the loop yields explicitly after every report.
pub(crate) async fn run<S, H, P>(
    state: StepState<S, H>,
    sink: &mut P,
    reporter: &mut Reporter,
    cancel: &CancelToken,
    pool: &WorkerPool,
) -> Result<StepState<S, H>, DigestError>
where
    S: ByteSource + Send + 'static,
    H: Hasher + Send + 'static,
    P: ProgressSink + ?Sized,
{
    let mut state = state;
    loop {
        // A lost worker drops the state on its own thread, which closes the source.
        let (returned, outcome) = pool
            .execute(move || {
                let mut state = state;
                let outcome = state.step();
                (state, outcome)
            })
            .await?;
        state = returned;

        match outcome {
            Ok(Some(summary)) => reporter.report(sink, summary.len, summary.bytes_hashed),
            Ok(None) => return Ok(state),
            Err(e) => return Err(state.fail(e)),
        }

        yield_now().await;

        if cancel.is_cancelled() {
            log::debug!("cancelled after {} chunks", reporter.reported());
            return Err(state.fail(DigestError::Cancelled));
        }
    }
}
