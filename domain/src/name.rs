use {
    serde_with::{DeserializeFromStr, SerializeDisplay},
    std::{
        fmt::{self, Display, Formatter},
        str::FromStr,
    },
};

/// Chain family a namespace declaration is keyed under. This stack only
/// drives the `bch` family; anything else is carried opaquely.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, SerializeDisplay, DeserializeFromStr,
)]
pub enum NamespaceName {
    Bch,
    Other(String),
}

impl Default for NamespaceName {
    fn default() -> Self {
        Self::Bch
    }
}

impl Display for NamespaceName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bch => write!(f, "bch"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for NamespaceName {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bch" => Ok(Self::Bch),
            _ => Ok(Self::Other(String::from(s))),
        }
    }
}
