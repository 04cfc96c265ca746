use serde_json::Value;

/// `Clone + PartialEq` so last-error values can be kept as state and
/// compared against later outcomes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Failed to receive the proposed value")]
    ReceiveError,

    #[error("SignClient not initialized")]
    NoClient,

    #[error("pairing surface is not initialized")]
    NoModal,

    #[error("Failed to connect to sign client: No URI")]
    NoUri,

    #[error("Failed to connect to sign client: No session")]
    NoSession,

    #[error("No active session")]
    NoActiveSession,

    #[error("No address found in session")]
    NoSessionAddress,

    #[error("No addresses found calling getAddresses: Received an empty array")]
    EmptyAddressList,

    #[error("invalid address in session namespace {address}: {source}")]
    InvalidSessionAddress {
        address: String,
        source: bch_connect_cashaddr::Error,
    },

    #[error(transparent)]
    AddressCodec(#[from] bch_connect_cashaddr::Error),

    #[error("RPC error {0:#?}")]
    Rpc(Value),

    #[error("corrupted payload: {0}")]
    CorruptedPayload(String),

    #[error("failed to initialize sign client: {0}")]
    ClientInit(String),

    #[error("failed to resolve pairing surface: {0}")]
    ModalInit(String),

    #[error("client error: {0}")]
    Client(String),

    #[error("failed to get mutex lock")]
    LockError,
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::CorruptedPayload(value.to_string())
    }
}
