//! Service context bundling all port trait objects.

use crate::adapters::live::{LiveClock, LiveFileSystem, LiveIdGenerator};
use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;
use crate::ports::id_gen::IdGenerator;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. `live()` wires the
/// real adapters; tests build contexts from in-memory fakes with `new()`.
pub struct ServiceContext {
    /// Clock for obtaining the run date.
    pub clock: Box<dyn Clock>,
    /// Filesystem for workbook I/O.
    pub fs: Box<dyn FileSystem>,
    /// ID generator for manual tasks entered without a key.
    pub id_gen: Box<dyn IdGenerator>,
}

impl ServiceContext {
    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn new(
        clock: Box<dyn Clock>,
        fs: Box<dyn FileSystem>,
        id_gen: Box<dyn IdGenerator>,
    ) -> Self {
        Self { clock, fs, id_gen }
    }

    /// Creates a live context backed by the system calendar, real disk and UUIDs.
    #[must_use]
    pub fn live() -> Self {
        Self::new(Box::new(LiveClock), Box::new(LiveFileSystem), Box::new(LiveIdGenerator))
    }
}
