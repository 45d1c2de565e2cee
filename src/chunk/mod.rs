//! Chunk types.
//!
//! - [`Chunk`] - One bounded unit of bytes read in a single step
//! - [`ChunkReader`] - Pulls successive chunks from a byte source

mod data;
mod reader;

pub use data::Chunk;
pub use reader::ChunkReader;
