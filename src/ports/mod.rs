//! Port traits defining external boundaries.
//!
//! Each trait is a boundary between the checker and the outside world
//! (calendar, disk, identifier source). Implementations live in
//! `src/adapters/`; tests substitute in-memory fakes.

pub mod clock;
pub mod filesystem;
pub mod id_gen;

pub use clock::Clock;
pub use filesystem::FileSystem;
pub use id_gen::IdGenerator;
