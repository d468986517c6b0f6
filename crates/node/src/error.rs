//! A bunch of wrap errors.

/// A wrap `Result` contains custom errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors of the host, the high decs represent the error category.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
#[repr(u32)]
pub enum Error {
    #[error("Invalid logging level: {0}")]
    InvalidLoggingLevel(String) = 100,
    #[error("Create File Error: {0}")]
    CreateFileError(String) = 200,
    #[error("Open File Error: {0}")]
    OpenFileError(String) = 201,
    #[error("Cannot find home directory")]
    HomeDirError = 202,
    #[error("Cannot find parent directory")]
    ParentDirError = 203,
    #[error("Serde json error: {0}")]
    SerdeJsonError(#[from] serde_json::Error) = 300,
    #[error("Serde yaml error: {0}")]
    SerdeYamlError(#[from] serde_yaml::Error) = 301,
    #[error("A ring of {0} bits cannot hold {1} nodes")]
    TooManyNodes(u8, usize) = 400,
    #[error("Duplicated seed id: {0}")]
    DuplicatedSeedId(u64) = 401,
    #[error("Node {0} failed to join: {1}")]
    JoinError(u64, ringchord_core::error::Error) = 402,
    #[error("Core error: {0}")]
    CoreError(#[from] ringchord_core::error::Error) = 500,
}
