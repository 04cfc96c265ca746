use {
    crate::{Account, NamespaceName, Namespaces, SessionTopic},
    serde::{Deserialize, Serialize},
};

/// Settled session handed back by the connect handshake or a live
/// client event. Owned by the protocol client; this is the dapp-side
/// view of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub topic: SessionTopic,
    pub namespaces: Namespaces,
    /// Unix timestamp.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expiry: Option<i64>,
}

impl Session {
    /// First account of the `bch` namespace. Multi-account sessions are
    /// read through their first entry only.
    #[must_use]
    pub fn first_account(&self) -> Option<&Account> {
        self.namespaces
            .get(&NamespaceName::Bch)
            .and_then(|ns| ns.accounts.first())
    }
}
