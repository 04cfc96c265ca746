use {
    crate::{Accounts, ChainId, Events, Methods, NamespaceName, Network},
    serde::{Deserialize, Serialize},
    std::{
        collections::BTreeMap,
        fmt::{Debug, Display, Formatter},
        ops::{Deref, DerefMut},
    },
};

/// Namespace declaration sent with a session proposal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposeNamespace {
    pub chains: Vec<ChainId>,
    pub methods: Methods,
    pub events: Events,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposeNamespaces(pub BTreeMap<NamespaceName, ProposeNamespace>);

impl Deref for ProposeNamespaces {
    type Target = BTreeMap<NamespaceName, ProposeNamespace>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ProposeNamespaces {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Network> for ProposeNamespaces {
    fn from(value: Network) -> Self {
        Self(BTreeMap::from([(NamespaceName::Bch, ProposeNamespace {
            chains: vec![ChainId::from(value)],
            methods: Methods::default(),
            events: Events::default(),
        })]))
    }
}

/// Namespace settled by the remote wallet's approval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettledNamespace {
    #[serde(skip_serializing_if = "Accounts::is_empty", default)]
    pub accounts: Accounts,
    #[serde(default)]
    pub methods: Methods,
    #[serde(default)]
    pub events: Events,
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespaces(pub BTreeMap<NamespaceName, SettledNamespace>);

impl Namespaces {
    #[must_use]
    pub fn names(&self) -> String {
        self.keys()
            .map(std::string::ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Debug for Namespaces {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.names())
    }
}

impl Display for Namespaces {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.names())
    }
}

impl Deref for Namespaces {
    type Target = BTreeMap<NamespaceName, SettledNamespace>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Namespaces {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::Account};

    #[test]
    fn propose_namespaces_from_network() {
        let namespaces = ProposeNamespaces::from(Network::Testnet);
        let ns = namespaces.get(&NamespaceName::Bch).unwrap();
        assert_eq!(vec![ChainId::Bch(Network::Testnet)], ns.chains);
        assert_eq!(3, ns.methods.len());
        assert_eq!(1, ns.events.len());
    }

    #[test]
    fn settled_namespace_wire_format() {
        let json = serde_json::json!({
            "bch": {
                "accounts": ["bch:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2"],
                "methods": ["bch_getAddresses", "bch_signMessage", "bch_signTransaction"],
                "events": ["addressesChanged"],
            }
        });
        let namespaces: Namespaces = serde_json::from_value(json).unwrap();
        let ns = namespaces.get(&NamespaceName::Bch).unwrap();
        assert_eq!(
            Some(&Account::new("qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2")),
            ns.accounts.first()
        );
    }

    #[test]
    fn propose_namespaces_wire_format() {
        let value = serde_json::to_value(ProposeNamespaces::from(Network::Mainnet)).unwrap();
        assert_eq!(
            serde_json::json!(["bch:bitcoincash"]),
            value["bch"]["chains"]
        );
        assert_eq!(serde_json::json!(["addressesChanged"]), value["bch"]["events"]);
    }
}
