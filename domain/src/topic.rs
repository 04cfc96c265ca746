use {
    derive_more::{AsRef, From, Into},
    serde::{Deserialize, Serialize},
    std::fmt::{self, Display, Formatter},
};

/// Identifier of a pairing or a settled session.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    Ord,
    PartialOrd,
    AsRef,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Topic(String);

pub type SessionTopic = Topic;

impl Topic {
    #[must_use]
    pub fn generate() -> Self {
        let bytes: [u8; 32] = rand::random();
        Self(data_encoding::HEXLOWER.encode(&bytes))
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Topic {
    fn from(value: &str) -> Self {
        Self(String::from(value))
    }
}

impl Display for Topic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[must_use]
pub fn shorten_topic(id: &Topic) -> String {
    let mut id = format!("{id}");
    if id.len() > 10 {
        id = String::from(&id[0..9]);
    }
    id
}

/// WalletConnect cloud project identifier.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, AsRef, From, Into, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProjectId(String);

impl From<&str> for ProjectId {
    fn from(value: &str) -> Self {
        Self(String::from(value))
    }
}

impl Display for ProjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
