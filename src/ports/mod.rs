//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the resolver core and an
//! external system (time, filesystem, git). Implementations live in
//! `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod git;

pub use clock::Clock;
pub use filesystem::FileSystem;
pub use git::GitRepo;

/// Error type returned by every fallible port method.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias for port methods.
pub type PortResult<T> = Result<T, PortError>;
