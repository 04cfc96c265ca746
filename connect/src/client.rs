use {
    crate::{ProposeFuture, Result},
    async_trait::async_trait,
    bch_connect_domain::{
        ChainId,
        Metadata,
        Method,
        ProjectId,
        ProposeNamespaces,
        Session,
        SessionTopic,
    },
    serde::{Deserialize, Serialize},
    serde_json::Value,
    std::{
        fmt::{self, Display, Formatter},
        sync::Arc,
    },
    tokio::sync::broadcast,
};

/// The two incompatible major versions of the protocol client found in
/// the field. Older wallets only understand `requiredNamespaces`;
/// newer clients accept `optionalNamespaces`. Decided once at
/// initialization, never per call.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ClientVariant {
    Legacy,
    Modern,
}

impl Display for ClientVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "older (required namespaces)"),
            Self::Modern => write!(f, "latest (optional namespaces)"),
        }
    }
}

/// Namespace declaration sent to `connect`. Exactly one of the two
/// fields is populated, keyed by the client variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub required_namespaces: Option<ProposeNamespaces>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub optional_namespaces: Option<ProposeNamespaces>,
}

impl ConnectRequest {
    #[must_use]
    pub fn new(variant: ClientVariant, namespaces: ProposeNamespaces) -> Self {
        match variant {
            ClientVariant::Legacy => Self {
                required_namespaces: Some(namespaces),
                ..Default::default()
            },
            ClientVariant::Modern => Self {
                optional_namespaces: Some(namespaces),
                ..Default::default()
            },
        }
    }

    #[must_use]
    pub fn namespaces(&self) -> Option<&ProposeNamespaces> {
        self.required_namespaces
            .as_ref()
            .or(self.optional_namespaces.as_ref())
    }
}

/// Result of a `connect` call: the pairing URI to present and the
/// pending wallet approval.
pub struct ClientHandshake {
    pub uri: Option<String>,
    pub approval: ProposeFuture<Result<Option<Session>>>,
}

/// One-shot RPC request published over a settled session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcRequest {
    pub chain_id: ChainId,
    pub topic: SessionTopic,
    pub method: Method,
    pub params: Value,
    /// Seconds until the wallet may drop the request.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expiry: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectReason {
    pub code: i64,
    pub message: String,
}

impl Default for DisconnectReason {
    fn default() -> Self {
        Self {
            code: 6000,
            message: String::from("User disconnected"),
        }
    }
}

/// Events emitted by the protocol client, in emission order.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    SessionProposal(Value),
    SessionEvent(Value),
    SessionConnect(Option<Session>),
    SessionDelete(SessionTopic),
    SessionExpire(SessionTopic),
    SessionUpdate(SessionTopic),
    ProposalExpire,
    AddressesChanged,
}

impl Display for ClientEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SessionProposal(_) => "session_proposal",
            Self::SessionEvent(_) => "session_event",
            Self::SessionConnect(_) => "session_connect",
            Self::SessionDelete(_) => "session_delete",
            Self::SessionExpire(_) => "session_expire",
            Self::SessionUpdate(_) => "session_update",
            Self::ProposalExpire => "proposal_expire",
            Self::AddressesChanged => "addressesChanged",
        };
        write!(f, "{name}")
    }
}

/// Arguments forwarded to the protocol client constructor.
#[derive(Debug, Clone)]
pub struct ClientInitOptions {
    pub project_id: ProjectId,
    pub relay_url: String,
    pub metadata: Metadata,
    pub log_level: tracing::Level,
}

/// Opaque capability over the underlying relay/session protocol
/// client. Implementations own the relay connection and session
/// persistence; this layer only drives them.
#[async_trait]
pub trait SignClient: Send + Sync + 'static {
    async fn connect(&self, request: ConnectRequest) -> Result<ClientHandshake>;

    async fn disconnect(&self, topic: SessionTopic, reason: DisconnectReason) -> Result<()>;

    /// Publishes an RPC request and awaits the wallet's response. An
    /// RPC-level rejection surfaces as [`crate::Error::Rpc`] carrying
    /// the raw rejection value.
    async fn request(&self, request: RpcRequest) -> Result<Value>;

    /// Sessions persisted by the client, most recent first.
    fn sessions(&self) -> Vec<Session>;

    fn subscribe(&self) -> broadcast::Receiver<ClientEvent>;
}

#[async_trait]
pub trait SignClientFactory: Send + Sync + 'static {
    async fn create(
        &self,
        variant: ClientVariant,
        options: ClientInitOptions,
    ) -> Result<Arc<dyn SignClient>>;
}

#[cfg(test)]
mod tests {
    use {super::*, bch_connect_domain::Network};

    #[test]
    fn legacy_request_uses_required_namespaces() {
        let request = ConnectRequest::new(
            ClientVariant::Legacy,
            ProposeNamespaces::from(Network::Mainnet),
        );
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("requiredNamespaces").is_some());
        assert!(value.get("optionalNamespaces").is_none());
    }

    #[test]
    fn modern_request_uses_optional_namespaces() {
        let request = ConnectRequest::new(
            ClientVariant::Modern,
            ProposeNamespaces::from(Network::Mainnet),
        );
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("requiredNamespaces").is_none());
        assert!(value.get("optionalNamespaces").is_some());
    }

    #[test]
    fn default_disconnect_reason() {
        let reason = DisconnectReason::default();
        assert_eq!(6000, reason.code);
        assert_eq!("User disconnected", reason.message);
    }

    #[test]
    fn rpc_request_wire_format() {
        let request = RpcRequest {
            chain_id: ChainId::Bch(Network::Regtest),
            topic: "t1".into(),
            method: Method::GetAddresses,
            params: serde_json::json!({"token": true}),
            expiry: Some(300),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(serde_json::json!("bch:bchreg"), value["chainId"]);
        assert_eq!(serde_json::json!("bch_getAddresses"), value["method"]);
        assert_eq!(serde_json::json!(300), value["expiry"]);
    }
}
