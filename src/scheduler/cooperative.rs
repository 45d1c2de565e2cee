//! Cooperative discipline: every step on the calling task.

use super::yield_now::yield_now;
use super::{CancelToken, StepState};
use crate::error::DigestError;
use crate::hash::Hasher;
use crate::progress::{ProgressSink, Reporter};
use crate::source::ByteSource;

/// Runs every step inline, suspending after each reported chunk.
///
/// Reading → Hashing → Reporting → Yielding, until a zero read. The state is
/// handed back for finalizing; on failure the source is closed first.
pub(crate) async fn run<S, H, P>(
    mut state: StepState<S, H>,
    sink: &mut P,
    reporter: &mut Reporter,
    cancel: &CancelToken,
) -> Result<StepState<S, H>, DigestError>
where
    S: ByteSource,
    H: Hasher,
    P: ProgressSink + ?Sized,
{
    loop {
        let summary = match state.step() {
            Ok(Some(summary)) => summary,
            Ok(None) => return Ok(state),
            Err(e) => return Err(state.fail(e)),
        };

        reporter.report(sink, summary.len, summary.bytes_hashed);

        yield_now().await;

        if cancel.is_cancelled() {
            log::debug!("cancelled after {} chunks", reporter.reported());
            return Err(state.fail(DigestError::Cancelled));
        }
    }
}
