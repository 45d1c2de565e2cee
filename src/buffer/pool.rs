//! Thread-local buffer pool for chunk buffer reuse.

use std::cell::RefCell;

/// Largest capacity a buffer may have and still be returned to the pool.
pub const MAX_POOLED_CAPACITY: usize = 4 * 1024 * 1024; // 4 MiB

/// Maximum number of buffers to keep per thread.
pub const MAX_POOL_SIZE: usize = 4;

/// A reusable, zero-initialized byte buffer of fixed length.
#[derive(Debug)]
pub struct Buffer {
    data: Vec<u8>,
}

impl Buffer {
    /// Takes a buffer of `len` bytes from the thread-local pool, or allocates
    /// one if no pooled buffer is large enough.
    pub fn take(len: usize) -> Self {
        let pooled = THREAD_BUFFER_POOL.with(|pool| {
            let mut pool = pool.borrow_mut();
            let pos = pool.iter().position(|buf| buf.capacity() >= len)?;
            Some(pool.swap_remove(pos))
        });

        let mut data = pooled.unwrap_or_else(|| Vec::with_capacity(len));
        data.clear();
        data.resize(len, 0);
        Self { data }
    }

    /// Returns the buffer length.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns the whole buffer for writing.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Returns the first `len` bytes.
    pub fn filled(&self, len: usize) -> &[u8] {
        &self.data[..len]
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        // Return the buffer to the pool if it's not too large
        if self.data.capacity() <= MAX_POOLED_CAPACITY {
            self.data.clear();
            // The pool may already be gone during thread teardown.
            let _ = THREAD_BUFFER_POOL.try_with(|pool| {
                let mut pool = pool.borrow_mut();
                if pool.len() < MAX_POOL_SIZE {
                    pool.push(std::mem::take(&mut self.data));
                }
            });
        }
    }
}

// Thread-local buffer pool
thread_local! {
    static THREAD_BUFFER_POOL: RefCell<Vec<Vec<u8>>> = const { RefCell::new(Vec::new()) };
}
