#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("address is empty")]
    Empty,

    #[error("invalid address format")]
    InvalidFormat,

    #[error("invalid character {0:?} in address")]
    InvalidCharacter(char),

    #[error("address mixes upper and lower case")]
    MixedCase,

    #[error("checksum verification failed")]
    ChecksumFailed,

    #[error("invalid version byte {0:#04x}")]
    InvalidVersion(u8),

    #[error("unsupported address type bits {0}")]
    UnsupportedType(u8),

    #[error("hash length {0} does not match the version byte")]
    InvalidLength(usize),

    #[error("cannot encode a hash of {0} bytes")]
    UnsupportedHashSize(usize),

    #[error("invalid padding in payload")]
    InvalidPadding,
}
