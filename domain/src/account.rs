use {
    serde::{Deserialize, Serialize},
    serde_with::{DeserializeFromStr, SerializeDisplay},
    std::{
        fmt::{self, Display, Formatter},
        ops::Deref,
        str::FromStr,
    },
};

const FAMILY_PREFIX: &str = "bch:";

/// Account entry of a settled namespace. On the wire the address
/// carries the `bch:` family prefix; the stored form is stripped.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, SerializeDisplay, DeserializeFromStr,
)]
pub struct Account {
    pub address: String,
}

impl Account {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

impl Display for Account {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{FAMILY_PREFIX}{}", self.address)
    }
}

impl FromStr for Account {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let address = s.strip_prefix(FAMILY_PREFIX).unwrap_or(s);
        if address.is_empty() {
            return Err(crate::Error::InvalidAccount(String::from(s)));
        }
        Ok(Self {
            address: String::from(address),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Accounts(pub Vec<Account>);

impl Accounts {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for Accounts {
    type Target = Vec<Account>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_family_prefix() {
        let account: Account = "bch:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2"
            .parse()
            .unwrap();
        assert_eq!("qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2", account.address);
        assert_eq!(
            "bch:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2",
            account.to_string()
        );
    }

    #[test]
    fn keeps_network_prefix() {
        // CAIP-10 style entries keep their cash address prefix intact
        let account: Account = "bch:bitcoincash:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2"
            .parse()
            .unwrap();
        assert_eq!(
            "bitcoincash:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2",
            account.address
        );
    }

    #[test]
    fn rejects_empty() {
        assert!("bch:".parse::<Account>().is_err());
        assert!("".parse::<Account>().is_err());
    }
}
