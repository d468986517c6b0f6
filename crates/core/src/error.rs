//! Error of ringchord_core

/// A wrap `Result` contains custom errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors collections in ringchord-core.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Id value {0} does not fit in a ring of {1} bits")]
    InvalidId(u64, u8),

    #[error("Bit length {0} is not in [1, 64]")]
    InvalidBitLength(u8),

    #[error("Ids belong to different rings: {0} bits and {1} bits")]
    BitLengthMismatch(u8, u8),

    #[error("Finger index {0} out of range, table has {1} entries")]
    FingerIndexOutOfRange(usize, usize),

    #[error("A node cannot point to itself as a finger")]
    PointToSelf,

    #[error("Bootstrap node has the same id as the joining node")]
    BootstrapIsSelf,

    #[error("Transport error: {0}")]
    Transport(#[from] ringchord_transport::error::Error),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Route failed: {0}")]
    RouteFailed(String),

    #[error("Route resolved to the searching node itself")]
    RouteFailedSelf,

    #[error("Route moved backward on the ring: {0}")]
    RouteFailedBackward(String),

    #[error("Stabilize failed: {0}")]
    StabilizeFailed(String),

    #[error("Join failed: {0}")]
    JoinFailed(String),

    #[error("Successor table is exhausted")]
    SuccessorTableExhausted,

    #[error("Node is dead, no successor left")]
    NodeDead,

    #[error("Chord state lock poisoned")]
    StateLock,

    #[error("Bincode error: {0}")]
    Bincode(#[from] bincode::Error),
}
