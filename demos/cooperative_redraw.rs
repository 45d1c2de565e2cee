//! Cooperative digest with a concurrent "redraw" task.
//!
//! Hashes a file on a single-threaded runtime while a second task keeps
//! repainting a status line. The repaint counter keeps moving because the
//! session yields after every chunk.
//!
//! Run with:
//!     RUST_LOG=debug cargo run --example cooperative_redraw -- <file>

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use stepdigest::{Discipline, FileSource, ProgressEvent, compute_digest};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: cooperative_redraw <file>")?;

    let frames = Arc::new(AtomicU64::new(0));
    let painter = {
        let frames = frames.clone();
        tokio::spawn(async move {
            loop {
                frames.fetch_add(1, Ordering::Relaxed);
                tokio::time::sleep(Duration::from_millis(16)).await;
            }
        })
    };

    let result = compute_digest(
        FileSource::opener(&path),
        1_000_000,
        Discipline::CooperativeYield,
        |event: ProgressEvent| {
            println!(
                "{:>6} MB hashed, {} frames painted",
                event.bytes_hashed() / 1_000_000,
                frames.load(Ordering::Relaxed)
            );
        },
    )
    .await?;
    painter.abort();

    println!("{}  {}", result.digest, path);
    println!(
        "{} chunks in {:.3}s",
        result.chunk_count,
        result.elapsed.as_secs_f64()
    );
    Ok(())
}
