//! wyx-pipeline: per-file bookkeeping and the parallel parse job
//!
//! Sits between the parser and any front end: assigns [`FileId`]s, tracks
//! per-file state in [`SourceFileInfo`], and fans the parse out over a
//! rayon pool with [`parse_files`]. All I/O goes through the
//! [`FileSystem`] trait so tests can run fully in memory.

mod error;
mod parse_job;
mod source_file;
mod vfs;

pub use error::{Error, Result};
pub use parse_job::{parse_files, ParseStats};
pub use source_file::{FileId, SourceFileInfo};
pub use vfs::{FileSystem, MemoryFileSystem, OsFileSystem};
