use {
    serde_with::{DeserializeFromStr, SerializeDisplay},
    std::{
        fmt::{self, Display, Formatter},
        str::FromStr,
    },
};

const BCH_MAINNET: &str = "bch:bitcoincash";
const BCH_TESTNET: &str = "bch:bchtest";
const BCH_REGTEST: &str = "bch:bchreg";

/// Target BCH network. Selects the CAIP-2 chain id and the cash
/// address prefix.
#[derive(
    Debug,
    Copy,
    Default,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Ord,
    PartialOrd,
    SerializeDisplay,
    DeserializeFromStr,
)]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Regtest,
}

impl Network {
    #[must_use]
    pub const fn address_prefix(&self) -> &'static str {
        match self {
            Self::Mainnet => "bitcoincash",
            Self::Testnet => "bchtest",
            Self::Regtest => "bchreg",
        }
    }
}

impl FromStr for Network {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "main" | "mainnet" => Ok(Self::Mainnet),
            "test" | "testnet" => Ok(Self::Testnet),
            "regtest" => Ok(Self::Regtest),
            _ => Err(crate::Error::InvalidNetwork(String::from(s))),
        }
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Mainnet => "mainnet",
                Self::Testnet => "testnet",
                Self::Regtest => "regtest",
            }
        )
    }
}

/// CAIP-2 chain identifier, e.g. `bch:bitcoincash`.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, SerializeDisplay, DeserializeFromStr,
)]
pub enum ChainId {
    Bch(Network),
}

impl ChainId {
    #[must_use]
    pub const fn network(&self) -> Network {
        match self {
            Self::Bch(network) => *network,
        }
    }
}

impl Default for ChainId {
    fn default() -> Self {
        Self::Bch(Network::Mainnet)
    }
}

impl From<Network> for ChainId {
    fn from(value: Network) -> Self {
        Self::Bch(value)
    }
}

impl Display for ChainId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let id = match self {
            Self::Bch(Network::Mainnet) => BCH_MAINNET,
            Self::Bch(Network::Testnet) => BCH_TESTNET,
            Self::Bch(Network::Regtest) => BCH_REGTEST,
        };
        write!(f, "{id}")
    }
}

impl FromStr for ChainId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            BCH_MAINNET => Ok(Self::Bch(Network::Mainnet)),
            BCH_TESTNET => Ok(Self::Bch(Network::Testnet)),
            BCH_REGTEST => Ok(Self::Bch(Network::Regtest)),
            _ => Err(crate::Error::InvalidChainId(String::from(s))),
        }
    }
}
