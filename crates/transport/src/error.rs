#![allow(missing_docs)]

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Bincode error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("Endpoint {0} already exists")]
    EndpointAlreadyExists(String),

    #[error("Endpoint {0} not found")]
    EndpointNotFound(String),

    #[error("Request to {0} timed out")]
    Timeout(String),

    #[error("Callback of endpoint {0} failed: {1}")]
    Callback(String, String),

    #[error("Endpoint {0} received a message that is not a request")]
    UnexpectedMessage(String),
}
