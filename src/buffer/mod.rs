//! Internal buffer management.
//!
//! This module provides a thread-local pool of chunk buffers so that
//! back-to-back sessions do not reallocate megabyte-sized buffers. It is an
//! implementation detail and not part of the public API.

mod pool;

pub(crate) use pool::Buffer;
