use {
    serde::{Deserialize, Serialize},
    serde_with::{DeserializeFromStr, SerializeDisplay},
    std::{
        collections::BTreeSet,
        fmt::{self, Display, Formatter},
        ops::Deref,
        str::FromStr,
    },
};

/// Wallet-originated session events.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, SerializeDisplay, DeserializeFromStr,
)]
pub enum Event {
    AddressesChanged,
    Other(String),
}

impl Default for Event {
    fn default() -> Self {
        Self::AddressesChanged
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddressesChanged => write!(f, "addressesChanged"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for Event {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "addresseschanged" => Ok(Self::AddressesChanged),
            _ => Ok(Self::Other(String::from(s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Events(pub BTreeSet<Event>);

impl Default for Events {
    fn default() -> Self {
        Self(BTreeSet::from([Event::AddressesChanged]))
    }
}

impl Deref for Events {
    type Target = BTreeSet<Event>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
