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

/// RPC methods a BCH wallet is expected to serve over a session.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, SerializeDisplay, DeserializeFromStr,
)]
pub enum Method {
    GetAddresses,
    SignTransaction,
    SignMessage,
}

impl Method {
    #[must_use]
    pub fn defaults() -> BTreeSet<Self> {
        BTreeSet::from([Self::GetAddresses, Self::SignTransaction, Self::SignMessage])
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::GetAddresses => write!(f, "bch_getAddresses"),
            Self::SignTransaction => write!(f, "bch_signTransaction"),
            Self::SignMessage => write!(f, "bch_signMessage"),
        }
    }
}

impl FromStr for Method {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bch_getAddresses" => Ok(Self::GetAddresses),
            "bch_signTransaction" => Ok(Self::SignTransaction),
            "bch_signMessage" => Ok(Self::SignMessage),
            _ => Err(crate::Error::InvalidMethod(String::from(s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Methods(pub BTreeSet<Method>);

impl Default for Methods {
    fn default() -> Self {
        Self(Method::defaults())
    }
}

impl Deref for Methods {
    type Target = BTreeSet<Method>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!("bch_getAddresses", Method::GetAddresses.to_string());
        assert_eq!("bch_signTransaction", Method::SignTransaction.to_string());
        assert_eq!("bch_signMessage", Method::SignMessage.to_string());
        assert_eq!(Method::SignMessage, "bch_signMessage".parse().unwrap());
        assert!("bch_burnCoins".parse::<Method>().is_err());
    }

    #[test]
    fn default_set_has_all_three() {
        assert_eq!(3, Methods::default().len());
    }
}
