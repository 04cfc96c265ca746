#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid network: {0}")]
    InvalidNetwork(String),

    #[error("invalid chain id: {0}")]
    InvalidChainId(String),

    #[error("invalid method: {0}")]
    InvalidMethod(String),

    #[error("invalid account: {0}")]
    InvalidAccount(String),
}
