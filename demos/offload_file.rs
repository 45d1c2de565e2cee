//! Offloaded digest of a file with a shared worker pool.
//!
//! Each read+hash step runs on a pool thread while the calling task only
//! reports progress. Pressing Ctrl-C is not wired up; the cancel token is
//! tripped after a byte budget instead to show where cancellation lands.
//!
//! Run with:
//!     RUST_LOG=debug cargo run --example offload_file -- <file> [max-bytes]

use stepdigest::{
    Blake3Hasher, DigestConfig, DigestError, DigestSession, Discipline, FileSource, ProgressEvent,
    ReadPolicy, WorkerPool,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or("usage: offload_file <file> [max-bytes]")?;
    let budget: Option<u64> = args.next().map(|s| s.parse()).transpose()?;

    let config = DigestConfig::default()
        .with_discipline(Discipline::OffloadAwait)
        .with_read_policy(ReadPolicy::Fill)
        .with_progress_labels(true);
    let session = DigestSession::new(config).with_worker_pool(WorkerPool::new(2)?);
    let token = session.cancel_token();

    let mut sink = |event: ProgressEvent| {
        println!("{}", event.label().unwrap_or_default());
        if budget.is_some_and(|max| event.bytes_hashed() >= max) {
            token.cancel();
        }
    };

    match session.run_blocking(FileSource::opener(&path), Blake3Hasher::new(), &mut sink) {
        Ok(result) => {
            println!("{}  {}", result.digest, path);
            println!("{:.3}s", result.elapsed.as_secs_f64());
        }
        Err(DigestError::Cancelled) => println!("stopped after byte budget"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
