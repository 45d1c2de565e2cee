#![no_main]

use std::io;

use libfuzzer_sys::fuzz_target;
use stepdigest::{
    Blake3Hasher, ByteSource, DigestConfig, DigestSession, Discipline, Opened, ProgressLog,
    ReadPolicy,
};

/// Replays `data` with read sizes taken from `steps`.
struct Jagged {
    data: Vec<u8>,
    pos: usize,
    steps: Vec<u8>,
    turn: usize,
}

impl ByteSource for Jagged {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let step = self.steps.get(self.turn % self.steps.len().max(1)).copied().unwrap_or(255);
        self.turn += 1;
        let n = (step as usize).max(1).min(buf.len()).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

fuzz_target!(|input: (Vec<u8>, Vec<u8>, u16, bool, bool)| {
    let (data, steps, chunk_size, offload, fill) = input;
    let chunk_size = (chunk_size as usize).max(1);
    let expected = blake3::hash(&data);

    let config = DigestConfig::new(chunk_size)
        .unwrap()
        .with_discipline(if offload {
            Discipline::OffloadAwait
        } else {
            Discipline::CooperativeYield
        })
        .with_read_policy(if fill { ReadPolicy::Fill } else { ReadPolicy::Single });

    let source = Jagged {
        data: data.clone(),
        pos: 0,
        steps,
        turn: 0,
    };
    let mut log = ProgressLog::new();
    let result = DigestSession::new(config)
        .run_blocking(Opened(source), Blake3Hasher::new(), &mut log)
        .unwrap();

    // Verify: chunking never changes the digest
    assert_eq!(result.digest.as_bytes(), expected.as_bytes());

    // Verify: every byte hashed once, one event per chunk, in order
    assert_eq!(result.bytes_hashed, data.len() as u64);
    assert_eq!(log.len() as u64, result.chunk_count);
    for (i, event) in log.events().iter().enumerate() {
        assert_eq!(event.sequence(), i as u64);
        assert!(event.chunk_len() > 0 && event.chunk_len() <= chunk_size);
    }

    // Verify: fill policy only leaves the last chunk short
    if fill {
        assert_eq!(log.len(), data.len().div_ceil(chunk_size));
    }
});
