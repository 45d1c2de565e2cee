//! Byte sources and the providers that open them.
//!
//! - [`ByteSource`] - Sequential reads plus an idempotent `close`
//! - [`OpenSource`] - One-shot provider that opens a source for a session
//! - [`FileSource`] - A regular file on disk
//! - [`ReaderSource`] - Adapter for any [`std::io::Read`]
//! - [`Opened`] - Provider wrapping a source that is already open

mod guard;

pub(crate) use guard::SourceGuard;

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// A sequentially readable stream of bytes.
///
/// `read` returns `Ok(0)` only at true end of stream. `close` must be
/// idempotent; a session calls it exactly once, but a source that is dropped
/// and closed by its owner as well must tolerate a second call.
pub trait ByteSource {
    /// Reads up to `buf.len()` bytes into `buf`.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Releases the underlying resource.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Opens a [`ByteSource`] at the start of a session.
///
/// Implemented for closures returning `io::Result<S>` and for [`Opened`].
///
/// # Example
///
/// ```
/// use stepdigest::{OpenSource, ReaderSource};
///
/// let provider = || Ok(ReaderSource::new(&b"hello"[..]));
/// let source = provider.open()?;
/// # let _ = source;
/// # Ok::<(), std::io::Error>(())
/// ```
pub trait OpenSource {
    /// The source type this provider opens.
    type Source: ByteSource;

    /// Opens the source.
    fn open(self) -> io::Result<Self::Source>;
}

impl<F, S> OpenSource for F
where
    F: FnOnce() -> io::Result<S>,
    S: ByteSource,
{
    type Source = S;

    fn open(self) -> io::Result<S> {
        self()
    }
}

/// A provider for a source that is already open.
#[derive(Debug)]
pub struct Opened<S>(pub S);

impl<S: ByteSource> OpenSource for Opened<S> {
    type Source = S;

    fn open(self) -> io::Result<S> {
        Ok(self.0)
    }
}

/// A byte source backed by a regular file.
#[derive(Debug)]
pub struct FileSource {
    file: Option<File>,
}

impl FileSource {
    /// Opens `path` for reading.
    ///
    /// # Errors
    ///
    /// Fails if the path does not exist, cannot be opened, or is not a
    /// regular file.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;
        if !file.metadata()?.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.as_ref().display()),
            ));
        }
        Ok(Self { file: Some(file) })
    }

    /// Returns a provider that opens `path` when the session starts.
    pub fn opener(path: impl AsRef<Path>) -> impl OpenSource<Source = FileSource> {
        let path = path.as_ref().to_path_buf();
        move || FileSource::open(path)
    }
}

impl ByteSource for FileSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.file.as_mut() {
            Some(file) => file.read(buf),
            None => Err(closed_error()),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        self.file = None;
        Ok(())
    }
}

/// Adapts any [`std::io::Read`] into a [`ByteSource`].
///
/// Closing drops the reader.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: Option<R>,
}

impl<R: Read> ReaderSource<R> {
    /// Wraps `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
        }
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.reader.as_mut() {
            Some(reader) => reader.read(buf),
            None => Err(closed_error()),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        self.reader = None;
        Ok(())
    }
}

fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "source already closed")
}
