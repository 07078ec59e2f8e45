//! Error types for billow.
//!
//! All crates return `BillowResult<T>` from fallible operations.
//! Numerical degeneracies inside the solver are clamped where they
//! arise and never surface here.

use thiserror::Error;

/// Unified error type for billow.
#[derive(Debug, Error)]
pub enum BillowError {
    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Lattice dimensions or lattice coordinates are invalid.
    #[error("Invalid lattice: {0}")]
    InvalidLattice(String),

    /// A particle id does not belong to the network.
    #[error("Unknown particle {0}")]
    UnknownParticle(u32),

    /// An anchor id does not belong to the anchor set.
    #[error("Unknown anchor {0}")]
    UnknownAnchor(u32),

    /// The world was disposed and can no longer be stepped.
    #[error("Simulation has been disposed")]
    Disposed,

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for `Result<T, BillowError>`.
pub type BillowResult<T> = Result<T, BillowError>;
